//! Horizontal-scroll section controller
//!
//! One [`ScrollPinController`] per section. It turns document scroll
//! offsets into a pin lifecycle, a horizontal translation and an active
//! indicator dot, and writes those through the host's [`SectionHost`]
//! seams. Everything time-dependent runs off the clock the host passes to
//! [`ScrollPinController::on_frame`].
//!
//! # Frame model
//!
//! Hosts may call [`ScrollPinController::on_scroll`] directly for every
//! scroll event, or [`ScrollPinController::queue_scroll`] and let the next
//! frame apply only the latest offset. Each frame then:
//!
//! 1. fires a debounced re-measure if one is due
//! 2. settles `Pinning`/`Unpinning` entered on an earlier frame
//! 3. advances an in-flight seek
//! 4. applies the queued scroll offset
//! 5. samples the stuck guard while pinned

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use pinscroll_animation::{AnimationScheduler, Debounce, ScrollTween, TweenId};
use pinscroll_core::events::event_types::{ENTER_RANGE, FORCE_RELEASE, LEAVE_RANGE, SETTLE};
use pinscroll_core::fsm::HistoryEntry;
use pinscroll_core::{Fsm, ProgressMapper, ProgressSample, SectionLayout};
use pinscroll_platform::{PinStrategy, PlatformProfile, SectionHost};

use crate::config::PinScrollConfig;
use crate::error::MountError;
use crate::pin_state::PinState;
use crate::stuck_guard::StuckGuard;

/// A dot-navigation seek in flight
#[derive(Debug, Clone, Copy)]
struct ActiveSeek {
    tween: TweenId,
    target: f32,
    panel: usize,
    /// Offset this seek wrote on the last frame
    last_written: f32,
}

fn lock(scheduler: &Mutex<AnimationScheduler>) -> MutexGuard<'_, AnimationScheduler> {
    scheduler.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Pin, scrub and navigation controller for one horizontal section
pub struct ScrollPinController {
    config: PinScrollConfig,
    profile: PlatformProfile,
    strategy: PinStrategy,
    layout: SectionLayout,
    fsm: Fsm<PinState>,
    sample: ProgressSample,
    published_dot: Option<usize>,
    /// Last offset applied through `on_scroll`
    last_offset: f32,
    pending_scroll: Option<f32>,
    resize: Debounce,
    /// Viewport size last accepted as a real resize
    viewport: (f32, f32),
    guard: StuckGuard,
    /// Weak reference to the animation scheduler driving seeks
    scheduler: Weak<Mutex<AnimationScheduler>>,
    seek: Option<ActiveSeek>,
    clock_ms: f64,
    hidden: bool,
    recoveries: u32,
}

impl ScrollPinController {
    /// Measure the section and take control of it
    ///
    /// Without a scheduler, seeks jump straight to their target.
    pub fn mount<H: SectionHost + ?Sized>(
        config: PinScrollConfig,
        profile: PlatformProfile,
        host: &mut H,
    ) -> Result<Self, MountError> {
        Self::mount_inner(config, profile, Weak::new(), host)
    }

    /// Mount with an animation scheduler for smooth seeks
    pub fn mount_with_scheduler<H: SectionHost + ?Sized>(
        config: PinScrollConfig,
        profile: PlatformProfile,
        scheduler: &Arc<Mutex<AnimationScheduler>>,
        host: &mut H,
    ) -> Result<Self, MountError> {
        Self::mount_inner(config, profile, Arc::downgrade(scheduler), host)
    }

    fn mount_inner<H: SectionHost + ?Sized>(
        config: PinScrollConfig,
        profile: PlatformProfile,
        scheduler: Weak<Mutex<AnimationScheduler>>,
        host: &mut H,
    ) -> Result<Self, MountError> {
        let layout = host.measure()?;
        if layout.panel_count == 0 {
            return Err(MountError::NoPanels);
        }

        let strategy = config.strategy_for(&profile);
        let guard = StuckGuard::new(
            config.stuck_guard.clone(),
            strategy.pins() && config.stuck_guard.is_enabled(&profile),
        );
        let resize = Debounce::new(config.resize_quiet_for(&profile));

        let mut controller = Self {
            config,
            profile,
            strategy,
            layout,
            fsm: Fsm::new(PinState::Unpinned),
            sample: ProgressSample::START,
            published_dot: None,
            last_offset: 0.0,
            pending_scroll: None,
            resize,
            viewport: (layout.viewport_width, layout.viewport_height),
            guard,
            scheduler,
            seek: None,
            clock_ms: 0.0,
            hidden: false,
            recoveries: 0,
        };

        if !layout.can_pin() {
            tracing::info!(
                content_width = layout.content_width,
                viewport_width = layout.viewport_width,
                "content fits the viewport; pinning disabled"
            );
        }

        let offset = host.scroll_offset();
        controller.last_offset = offset;
        controller.update_pin(offset, host);
        let sample = controller.sample_at(offset);
        controller.publish(sample, host);

        tracing::info!(
            strategy = %strategy,
            panels = layout.panel_count,
            scrollable_width = layout.scrollable_width(),
            stuck_guard = controller.guard.is_enabled(),
            "section mounted"
        );
        Ok(controller)
    }

    /// Set the animation scheduler used for seeks
    pub fn set_scheduler(&mut self, scheduler: &Arc<Mutex<AnimationScheduler>>) {
        self.scheduler = Arc::downgrade(scheduler);
    }

    // =========================================================================
    // Scroll
    // =========================================================================

    /// Apply a document scroll offset immediately
    ///
    /// An offset away from what an in-flight seek last wrote is the user
    /// taking over, and cancels the seek.
    pub fn on_scroll<H: SectionHost + ?Sized>(&mut self, offset: f32, host: &mut H) {
        if let Some(seek) = self.seek {
            if (offset - seek.last_written).abs() > self.config.user_scroll_tolerance_px {
                tracing::debug!(offset, "user scroll interrupted seek");
                self.cancel_seek();
            }
        }
        self.apply_scroll(offset, host);
    }

    fn apply_scroll<H: SectionHost + ?Sized>(&mut self, offset: f32, host: &mut H) {
        self.last_offset = offset;
        self.update_pin(offset, host);

        let sample = self.sample_at(offset);
        if sample != self.sample {
            self.publish(sample, host);
        }
    }

    /// Record a scroll offset to apply on the next frame
    ///
    /// Only the latest queued offset is applied.
    pub fn queue_scroll(&mut self, offset: f32) {
        self.pending_scroll = Some(offset);
    }

    /// Run one frame at host time `now_ms`
    pub fn on_frame<H: SectionHost + ?Sized>(&mut self, now_ms: f64, host: &mut H) {
        self.clock_ms = now_ms;

        if self.resize.poll(now_ms) {
            self.on_resize(host);
        }

        self.settle(host);
        self.step_seek(host);

        if let Some(offset) = self.pending_scroll.take() {
            self.on_scroll(offset, host);
        }

        if self.fsm.is_in(PinState::Pinned) {
            let offset = host.scroll_offset();
            if let Some(reason) = self.guard.poll(now_ms, offset, &self.layout) {
                tracing::warn!(?reason, offset, "pin out of sync with scroll position");
                self.recover_from_stuck(host);
            }
        }
    }

    fn sample_at(&self, offset: f32) -> ProgressSample {
        ProgressMapper::sample(
            self.layout.relative(offset),
            self.layout.scrollable_width(),
            self.layout.panel_count,
        )
    }

    /// Drive the pin lifecycle from an offset
    fn update_pin<H: SectionHost + ?Sized>(&mut self, offset: f32, host: &mut H) {
        if !self.strategy.pins() || !self.layout.can_pin() {
            return;
        }

        let relative = self.layout.relative(offset);
        let event = if (0.0..=self.layout.scrollable_width()).contains(&relative) {
            ENTER_RANGE
        } else {
            LEAVE_RANGE
        };

        if let Some((from, to)) = self.fsm.send(event) {
            self.apply_transition(from, to, host);
        }
    }

    fn settle<H: SectionHost + ?Sized>(&mut self, host: &mut H) {
        if !self.fsm.current().is_transitional() {
            return;
        }
        if let Some((from, to)) = self.fsm.send(SETTLE) {
            self.apply_transition(from, to, host);
        }
    }

    fn apply_transition<H: SectionHost + ?Sized>(&mut self, from: PinState, to: PinState, host: &mut H) {
        tracing::debug!(%from, %to, offset = self.last_offset, "pin transition");

        match to {
            PinState::Pinning => host.set_pinned(self.strategy, true),
            PinState::Pinned => self.guard.on_pinned(self.clock_ms, host.scroll_offset()),
            PinState::Unpinning => self.guard.on_released(),
            PinState::Unpinned => self.release(host),
        }
    }

    /// Drop the pinned presentation and any inline positioning it left
    fn release<H: SectionHost + ?Sized>(&mut self, host: &mut H) {
        host.set_pinned(self.strategy, false);
        host.clear_pin_override();
        self.guard.on_released();
    }

    /// Write a sample to the view: content translation and active dot
    fn publish<H: SectionHost + ?Sized>(&mut self, sample: ProgressSample, host: &mut H) {
        self.sample = sample;

        if self.strategy.drives_transform() {
            let travel = ProgressMapper::offset_for(sample.progress, self.layout.scrollable_width());
            host.translate_content(-travel);
        }

        if self.layout.dot_count > 0 {
            let dot = sample.active_panel.min(self.layout.dot_count - 1);
            if self.published_dot != Some(dot) {
                host.set_active_dot(dot);
                self.published_dot = Some(dot);
            }
        }

        tracing::trace!(
            progress = sample.progress,
            panel = sample.active_panel,
            "published progress"
        );
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    /// Viewport size changed; re-measures once the quiet period passes
    pub fn on_viewport_change(&mut self, width: f32, height: f32, now_ms: f64) {
        self.clock_ms = now_ms;

        let (last_width, last_height) = self.viewport;
        if self.profile.ignore_address_bar_resize
            && (width - last_width).abs() < 0.5
            && (height - last_height).abs() < self.config.address_bar_threshold_px
        {
            tracing::trace!(width, height, "ignoring address bar resize");
            return;
        }

        self.viewport = (width, height);
        self.resize.schedule(now_ms);
    }

    /// Device rotated; re-measures after the layout has settled
    pub fn on_orientation_change(&mut self, now_ms: f64) {
        self.clock_ms = now_ms;
        let delay = self.config.orientation_settle_ms + self.resize.quiet_ms();
        self.resize.schedule_after(now_ms, delay);
        tracing::debug!(delay_ms = delay, "orientation change");
    }

    /// Re-measure now, keeping the visible progress where it was
    pub fn on_resize<H: SectionHost + ?Sized>(&mut self, host: &mut H) {
        let layout = match host.measure() {
            Ok(layout) => layout,
            Err(err) => {
                tracing::warn!(%err, "re-measure failed; keeping previous layout");
                return;
            }
        };

        let old = self.layout;
        let offset = host.scroll_offset();
        let old_relative = old.relative(offset);
        let was_inside =
            old.can_pin() && (0.0..=old.scrollable_width()).contains(&old_relative);
        let progress = ProgressMapper::progress(old_relative, old.scrollable_width());

        self.layout = layout;
        self.viewport = (layout.viewport_width, layout.viewport_height);
        self.cancel_seek();
        self.pending_scroll = None;

        if !layout.can_pin() && self.fsm.current().is_held() {
            self.fsm.force(FORCE_RELEASE, PinState::Unpinned);
            self.release(host);
            tracing::info!("content fits the viewport after resize; unpinned");
        }

        let mut offset = offset;
        if was_inside && layout.can_pin() {
            let target = layout.start + ProgressMapper::offset_for(progress, layout.scrollable_width());
            if (target - offset).abs() > self.config.snap_epsilon_px {
                host.scroll_to(target);
            }
            offset = target;
        }

        self.last_offset = offset;
        self.update_pin(offset, host);
        let sample = self.sample_at(offset);
        self.publish(sample, host);

        tracing::debug!(
            scrollable_width = layout.scrollable_width(),
            progress = sample.progress,
            "section re-measured"
        );
    }

    /// Page hidden or shown; the stuck guard's clocks only run while visible
    ///
    /// On return the guard restarts from the host's real offset, since the
    /// document may have moved while hidden.
    pub fn on_visibility_change<H: SectionHost + ?Sized>(
        &mut self,
        hidden: bool,
        now_ms: f64,
        host: &mut H,
    ) {
        self.clock_ms = now_ms;
        if hidden == self.hidden {
            return;
        }
        self.hidden = hidden;

        if hidden {
            self.guard.pause();
        } else {
            let pinned = self.fsm.is_in(PinState::Pinned);
            self.guard.resume(now_ms, pinned, host.scroll_offset());
        }
        tracing::debug!(hidden, "visibility changed");
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Scroll the document so panel `index` is in view
    ///
    /// Out-of-range indices are clamped. With a scheduler the document is
    /// tweened over `seek_duration_ms`; otherwise (or when already within
    /// half a pixel) it jumps to the exact panel boundary.
    pub fn seek_to_panel<H: SectionHost + ?Sized>(&mut self, index: usize, host: &mut H) {
        let panel_count = self.layout.panel_count;
        let panel = ProgressMapper::clamp_panel(index, panel_count);
        if panel != index {
            tracing::debug!(requested = index, panel, "seek index clamped");
        }

        let target = ProgressMapper::seek_offset(
            self.layout.start,
            self.layout.scrollable_width(),
            panel,
            panel_count,
        );

        self.cancel_seek();

        let current = host.scroll_offset();
        let scheduler = if (current - target).abs() > self.config.snap_epsilon_px {
            self.scheduler.upgrade()
        } else {
            None
        };

        // No scheduler or already there - snap to the boundary
        let Some(scheduler) = scheduler else {
            if current != target {
                host.scroll_to(target);
            }
            self.pending_scroll = None;
            self.apply_scroll(target, host);
            return;
        };

        let tween = ScrollTween::new(
            current,
            target,
            self.config.seek_duration_ms,
            self.config.seek_easing,
        );
        let id = lock(&scheduler).add_tween(tween);
        self.seek = Some(ActiveSeek {
            tween: id,
            target,
            panel,
            last_written: current,
        });

        tracing::debug!(panel, from = current, to = target, "seek started");
    }

    /// Abandon an in-flight seek, leaving the document where it is
    pub fn cancel_seek(&mut self) {
        let Some(seek) = self.seek.take() else {
            return;
        };
        if let Some(scheduler) = self.scheduler.upgrade() {
            lock(&scheduler).remove_tween(seek.tween);
        }
        tracing::debug!(panel = seek.panel, "seek cancelled");
    }

    fn step_seek<H: SectionHost + ?Sized>(&mut self, host: &mut H) {
        let Some(seek) = self.seek else {
            return;
        };

        // A queued offset that isn't our own write is the user taking over
        if let Some(pending) = self.pending_scroll {
            if (pending - seek.last_written).abs() > self.config.user_scroll_tolerance_px {
                tracing::debug!(offset = pending, "user scroll interrupted seek");
                self.cancel_seek();
                return;
            }
        }

        let Some(scheduler_arc) = self.scheduler.upgrade() else {
            // Scheduler went away mid-seek
            self.seek = None;
            host.scroll_to(seek.target);
            self.pending_scroll = Some(seek.target);
            return;
        };

        let mut scheduler = lock(&scheduler_arc);
        let (value, finished) = match scheduler.get_tween(seek.tween) {
            Some(tween) => (tween.value(), tween.is_finished()),
            None => (seek.target, true),
        };
        if finished {
            scheduler.remove_tween(seek.tween);
        }
        drop(scheduler);

        host.scroll_to(value);
        self.pending_scroll = Some(value);

        if finished {
            self.seek = None;
            tracing::debug!(panel = seek.panel, offset = value, "seek complete");
        } else if let Some(active) = self.seek.as_mut() {
            active.last_written = value;
        }
    }

    // =========================================================================
    // Recovery & teardown
    // =========================================================================

    /// Force the section out of a pin that no longer matches the document
    ///
    /// Progress is recomputed from the host's actual offset so the content
    /// lands on the panel that offset implies.
    pub fn recover_from_stuck<H: SectionHost + ?Sized>(&mut self, host: &mut H) {
        self.recoveries += 1;
        self.cancel_seek();
        self.pending_scroll = None;

        self.fsm.force(FORCE_RELEASE, PinState::Unpinned);
        self.release(host);

        let offset = host.scroll_offset();
        self.last_offset = offset;
        let sample = self.sample_at(offset);
        self.publish(sample, host);

        tracing::info!(
            recoveries = self.recoveries,
            offset,
            progress = sample.progress,
            "released stuck pin"
        );
    }

    /// Release the section and stop all timers
    pub fn unmount<H: SectionHost + ?Sized>(&mut self, host: &mut H) {
        self.cancel_seek();
        self.resize.cancel();
        self.pending_scroll = None;

        if self.fsm.current().is_held() {
            self.fsm.force(FORCE_RELEASE, PinState::Unpinned);
            host.set_pinned(self.strategy, false);
        }
        host.clear_pin_override();
        self.guard.on_released();

        tracing::debug!("section unmounted");
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn pin_state(&self) -> PinState {
        self.fsm.current()
    }

    pub fn pin_history(&self) -> &[HistoryEntry<PinState>] {
        self.fsm.history()
    }

    pub fn progress(&self) -> f32 {
        self.sample.progress
    }

    pub fn active_panel(&self) -> usize {
        self.sample.active_panel
    }

    pub fn scrollable_width(&self) -> f32 {
        self.layout.scrollable_width()
    }

    pub fn layout(&self) -> &SectionLayout {
        &self.layout
    }

    pub fn strategy(&self) -> PinStrategy {
        self.strategy
    }

    pub fn profile(&self) -> &PlatformProfile {
        &self.profile
    }

    pub fn config(&self) -> &PinScrollConfig {
        &self.config
    }

    /// Number of stuck-pin recoveries so far
    pub fn recoveries(&self) -> u32 {
        self.recoveries
    }

    pub fn is_seeking(&self) -> bool {
        self.seek.is_some()
    }

    /// Target document offset of the seek in flight
    pub fn seek_target(&self) -> Option<f32> {
        self.seek.map(|seek| seek.target)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn has_pending_resize(&self) -> bool {
        self.resize.is_pending()
    }
}
