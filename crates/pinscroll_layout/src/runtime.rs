//! Multi-section runtime
//!
//! A page may carry several horizontal sections. [`PinRuntime`] owns one
//! controller per section, shares a single animation scheduler between
//! them and routes host events to the right controller.

use std::sync::{Arc, Mutex, PoisonError};

use pinscroll_animation::AnimationScheduler;
use pinscroll_core::events::event_types;
use pinscroll_core::{Event, EventData};
use pinscroll_platform::{PlatformProfile, SectionHost};
use slotmap::{new_key_type, SlotMap};

use crate::config::PinScrollConfig;
use crate::controller::ScrollPinController;

new_key_type! {
    /// Handle to a mounted section
    pub struct SectionId;
}

/// Owns every mounted section controller on a page
pub struct PinRuntime {
    config: PinScrollConfig,
    profile: PlatformProfile,
    scheduler: Arc<Mutex<AnimationScheduler>>,
    sections: SlotMap<SectionId, ScrollPinController>,
}

impl PinRuntime {
    pub fn new(config: PinScrollConfig, profile: PlatformProfile) -> Self {
        Self::with_scheduler(config, profile, Arc::new(Mutex::new(AnimationScheduler::new())))
    }

    /// Share an existing scheduler (e.g. one the host already ticks)
    pub fn with_scheduler(
        config: PinScrollConfig,
        profile: PlatformProfile,
        scheduler: Arc<Mutex<AnimationScheduler>>,
    ) -> Self {
        Self {
            config,
            profile,
            scheduler,
            sections: SlotMap::with_key(),
        }
    }

    pub fn scheduler(&self) -> &Arc<Mutex<AnimationScheduler>> {
        &self.scheduler
    }

    pub fn profile(&self) -> &PlatformProfile {
        &self.profile
    }

    pub fn config(&self) -> &PinScrollConfig {
        &self.config
    }

    /// Mount a section; a section that cannot be measured is skipped
    pub fn mount<H: SectionHost + ?Sized>(&mut self, host: &mut H) -> Option<SectionId> {
        match ScrollPinController::mount_with_scheduler(
            self.config.clone(),
            self.profile,
            &self.scheduler,
            host,
        ) {
            Ok(controller) => Some(self.sections.insert(controller)),
            Err(err) => {
                tracing::warn!(%err, "horizontal section not mounted");
                None
            }
        }
    }

    /// Route a host event to a section
    ///
    /// Returns false when the section is unknown or the event is not one a
    /// section handles.
    pub fn dispatch<H: SectionHost + ?Sized>(&mut self, id: SectionId, event: &Event, host: &mut H) -> bool {
        if event.event_type == event_types::UNMOUNT {
            return self.unmount(id, host).is_some();
        }

        let Some(controller) = self.sections.get_mut(id) else {
            return false;
        };
        let now = event.timestamp_ms;

        match (event.event_type, &event.data) {
            (event_types::SCROLL, EventData::Scroll { offset }) => controller.queue_scroll(*offset),
            (event_types::RESIZE, EventData::Resize { width, height }) => {
                controller.on_viewport_change(*width, *height, now)
            }
            (event_types::ORIENTATION_CHANGE, _) => controller.on_orientation_change(now),
            (event_types::VISIBILITY_CHANGE, EventData::Visibility { hidden }) => {
                controller.on_visibility_change(*hidden, now, host)
            }
            (event_types::DOT_CLICK, EventData::DotClick { index }) => {
                controller.seek_to_panel(*index, host)
            }
            _ => {
                tracing::trace!(event_type = event.event_type, "event ignored");
                return false;
            }
        }
        true
    }

    /// Advance the shared scheduler to host time `now_ms`
    ///
    /// Call once per frame before running section frames.
    pub fn tick(&self, now_ms: f64) {
        self.scheduler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tick_at(now_ms);
    }

    /// Run one frame for a section
    pub fn frame<H: SectionHost + ?Sized>(&mut self, id: SectionId, now_ms: f64, host: &mut H) {
        if let Some(controller) = self.sections.get_mut(id) {
            controller.on_frame(now_ms, host);
        }
    }

    /// Release a section and drop its controller
    pub fn unmount<H: SectionHost + ?Sized>(
        &mut self,
        id: SectionId,
        host: &mut H,
    ) -> Option<ScrollPinController> {
        let mut controller = self.sections.remove(id)?;
        controller.unmount(host);
        Some(controller)
    }

    pub fn get(&self, id: SectionId) -> Option<&ScrollPinController> {
        self.sections.get(id)
    }

    pub fn get_mut(&mut self, id: SectionId) -> Option<&mut ScrollPinController> {
        self.sections.get_mut(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = SectionId> + '_ {
        self.sections.keys()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PinState;
    use pinscroll_platform::{HeadlessPage, HeadlessSection};

    fn page() -> (HeadlessPage, usize, usize) {
        let mut page = HeadlessPage::new(300.0, 600.0);
        let first = page.add_section(HeadlessSection::new(600.0, 4));
        let second = page.add_section(HeadlessSection::new(2400.0, 3));
        (page, first, second)
    }

    fn scroll_all(
        runtime: &mut PinRuntime,
        page: &mut HeadlessPage,
        ids: &[(SectionId, usize)],
        offset: f32,
        now: f64,
    ) {
        page.set_scroll_offset(offset);
        runtime.tick(now);
        for &(id, index) in ids {
            let mut host = page.section(index).unwrap();
            runtime.dispatch(id, &Event::scroll(offset, now), &mut host);
            runtime.frame(id, now, &mut host);
        }
    }

    #[test]
    fn test_sections_are_independent() {
        let (mut page, first, second) = page();
        let mut runtime = PinRuntime::new(PinScrollConfig::default(), PlatformProfile::desktop());
        let a = runtime.mount(&mut page.section(first).unwrap()).unwrap();
        let b = runtime.mount(&mut page.section(second).unwrap()).unwrap();
        assert_eq!(runtime.len(), 2);
        let ids = [(a, first), (b, second)];

        scroll_all(&mut runtime, &mut page, &ids, 1050.0, 16.0);
        assert_eq!(runtime.get(a).unwrap().pin_state(), PinState::Pinning);
        assert_eq!(runtime.get(a).unwrap().active_panel(), 2);
        assert_eq!(runtime.get(b).unwrap().pin_state(), PinState::Unpinned);

        scroll_all(&mut runtime, &mut page, &ids, 2700.0, 32.0);
        assert_eq!(runtime.get(a).unwrap().pin_state(), PinState::Unpinning);
        assert_eq!(runtime.get(a).unwrap().active_panel(), 3);
        assert_eq!(runtime.get(b).unwrap().pin_state(), PinState::Pinning);
        assert_eq!(runtime.get(b).unwrap().active_panel(), 1);
    }

    #[test]
    fn test_missing_section_is_skipped() {
        let mut page = HeadlessPage::new(300.0, 600.0);
        let index = page.add_section(HeadlessSection::new(0.0, 3).missing());
        let mut runtime = PinRuntime::new(PinScrollConfig::default(), PlatformProfile::desktop());
        assert!(runtime.mount(&mut page.section(index).unwrap()).is_none());
        assert!(runtime.is_empty());
    }

    #[test]
    fn test_dot_click_seeks_through_shared_scheduler() {
        let (mut page, first, _) = page();
        let mut runtime = PinRuntime::new(PinScrollConfig::default(), PlatformProfile::desktop());
        let id = runtime.mount(&mut page.section(first).unwrap()).unwrap();

        runtime.tick(0.0);
        let handled = runtime.dispatch(id, &Event::dot_click(3, 0.0), &mut page.section(first).unwrap());
        assert!(handled);
        assert!(runtime.get(id).unwrap().is_seeking());

        let mut now = 0.0;
        while now < 900.0 {
            now += 16.0;
            runtime.tick(now);
            runtime.frame(id, now, &mut page.section(first).unwrap());
        }
        assert_eq!(page.scroll_offset(), 1500.0);
        assert_eq!(runtime.get(id).unwrap().active_panel(), 3);
    }

    #[test]
    fn test_unmount_event_removes_section() {
        let (mut page, first, _) = page();
        let mut runtime = PinRuntime::new(PinScrollConfig::default(), PlatformProfile::ios());
        let id = runtime.mount(&mut page.section(first).unwrap()).unwrap();

        assert!(runtime.dispatch(id, &Event::unmount(10.0), &mut page.section(first).unwrap()));
        assert!(runtime.get(id).is_none());
        assert!(!runtime.dispatch(id, &Event::scroll(0.0, 20.0), &mut page.section(first).unwrap()));
    }

    #[test]
    fn test_resize_and_visibility_routed() {
        let (mut page, first, _) = page();
        let mut runtime = PinRuntime::new(PinScrollConfig::default(), PlatformProfile::desktop());
        let id = runtime.mount(&mut page.section(first).unwrap()).unwrap();

        page.set_viewport(400.0, 600.0);
        assert!(runtime.dispatch(id, &Event::resize(400.0, 600.0, 0.0), &mut page.section(first).unwrap()));
        assert!(runtime.get(id).unwrap().has_pending_resize());
        runtime.frame(id, 300.0, &mut page.section(first).unwrap());
        assert_eq!(runtime.get(id).unwrap().scrollable_width(), 1200.0);

        assert!(runtime.dispatch(id, &Event::visibility(true, 310.0), &mut page.section(first).unwrap()));
        assert!(runtime.get(id).unwrap().is_hidden());
    }
}
