//! In-memory page host
//!
//! Models one document scroller, a viewport and any number of horizontal
//! sections. Visual side effects are recorded instead of painted so runs can
//! be asserted on and replayed.

use pinscroll_core::SectionLayout;

use crate::error::{PlatformError, Result};
use crate::host::{LayoutProbe, ScrollHost, SectionView};
use crate::profile::PinStrategy;

/// A visual side effect issued to a section
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewCommand {
    Translate(f32),
    Pin { strategy: PinStrategy, pinned: bool },
    ClearOverride,
    ActiveDot(usize),
}

/// One horizontal-scroll section on a headless page
#[derive(Debug, Clone)]
pub struct HeadlessSection {
    /// Document offset of the section's top edge
    pub start: f32,
    pub panel_count: usize,
    /// Panel width; `None` means each panel is one viewport wide
    pub panel_width: Option<f32>,
    pub dot_count: usize,
    /// False when the section's elements are absent from the document
    pub present: bool,

    // Recorded visual state
    pub translate_x: f32,
    pub pinned: bool,
    pub pin_strategy: Option<PinStrategy>,
    /// Inline positioning still applied from a pin
    pub has_pin_override: bool,
    pub active_dot: Option<usize>,
    pub commands: Vec<ViewCommand>,
}

impl HeadlessSection {
    /// A section of full-viewport panels with one dot per panel
    pub fn new(start: f32, panel_count: usize) -> Self {
        Self {
            start,
            panel_count,
            panel_width: None,
            dot_count: panel_count,
            present: true,
            translate_x: 0.0,
            pinned: false,
            pin_strategy: None,
            has_pin_override: false,
            active_dot: None,
            commands: Vec::new(),
        }
    }

    pub fn with_panel_width(mut self, width: f32) -> Self {
        self.panel_width = Some(width);
        self
    }

    pub fn with_dots(mut self, dot_count: usize) -> Self {
        self.dot_count = dot_count;
        self
    }

    /// A section whose elements are not in the document
    pub fn missing(mut self) -> Self {
        self.present = false;
        self
    }

    fn layout(&self, viewport_width: f32, viewport_height: f32) -> Result<SectionLayout> {
        if !self.present {
            return Err(PlatformError::MissingElement(
                ".horizontal-scroll-section".to_string(),
            ));
        }
        if self.panel_count == 0 {
            return Err(PlatformError::MissingElement(".horizontal-panel".to_string()));
        }
        let panel_width = self.panel_width.unwrap_or(viewport_width);
        if !(viewport_width > 0.0) || !(panel_width >= 0.0) {
            return Err(PlatformError::Measurement(format!(
                "degenerate viewport {viewport_width}x{viewport_height}"
            )));
        }
        Ok(SectionLayout {
            start: self.start,
            content_width: panel_width * self.panel_count as f32,
            viewport_width,
            viewport_height,
            panel_count: self.panel_count,
            dot_count: self.dot_count,
        })
    }
}

/// A headless document with a single vertical scroller
#[derive(Debug, Clone)]
pub struct HeadlessPage {
    viewport_width: f32,
    viewport_height: f32,
    scroll_offset: f32,
    /// Number of programmatic `scroll_to` writes
    scroll_writes: usize,
    sections: Vec<HeadlessSection>,
}

impl HeadlessPage {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            viewport_width,
            viewport_height,
            scroll_offset: 0.0,
            scroll_writes: 0,
            sections: Vec::new(),
        }
    }

    /// Add a section, returning its index
    pub fn add_section(&mut self, section: HeadlessSection) -> usize {
        self.sections.push(section);
        self.sections.len() - 1
    }

    /// Borrow a section as a controller host
    pub fn section(&mut self, index: usize) -> Result<HeadlessSectionHost<'_>> {
        if index >= self.sections.len() {
            return Err(PlatformError::UnknownSection(index));
        }
        Ok(HeadlessSectionHost { page: self, index })
    }

    pub fn section_state(&self, index: usize) -> Option<&HeadlessSection> {
        self.sections.get(index)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Resize the viewport (panels sized to the viewport follow along)
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.viewport_width, self.viewport_height)
    }

    /// Move the document as a user would (no controller involvement)
    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll_offset = offset.max(0.0);
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn scroll_writes(&self) -> usize {
        self.scroll_writes
    }
}

/// Borrowed view of one section of a [`HeadlessPage`]
pub struct HeadlessSectionHost<'a> {
    page: &'a mut HeadlessPage,
    index: usize,
}

impl HeadlessSectionHost<'_> {
    fn state(&mut self) -> &mut HeadlessSection {
        &mut self.page.sections[self.index]
    }
}

impl LayoutProbe for HeadlessSectionHost<'_> {
    fn measure(&self) -> Result<SectionLayout> {
        self.page.sections[self.index].layout(self.page.viewport_width, self.page.viewport_height)
    }
}

impl ScrollHost for HeadlessSectionHost<'_> {
    fn scroll_offset(&self) -> f32 {
        self.page.scroll_offset
    }

    fn scroll_to(&mut self, offset: f32) {
        self.page.scroll_offset = offset.max(0.0);
        self.page.scroll_writes += 1;
    }
}

impl SectionView for HeadlessSectionHost<'_> {
    fn translate_content(&mut self, x: f32) {
        let state = self.state();
        state.translate_x = x;
        state.commands.push(ViewCommand::Translate(x));
    }

    fn set_pinned(&mut self, strategy: PinStrategy, pinned: bool) {
        let state = self.state();
        state.pinned = pinned;
        state.pin_strategy = pinned.then_some(strategy);
        if pinned {
            state.has_pin_override = true;
        }
        state.commands.push(ViewCommand::Pin { strategy, pinned });
    }

    fn clear_pin_override(&mut self) {
        let state = self.state();
        state.has_pin_override = false;
        state.commands.push(ViewCommand::ClearOverride);
    }

    fn set_active_dot(&mut self, index: usize) {
        let state = self.state();
        state.active_dot = Some(index);
        state.commands.push(ViewCommand::ActiveDot(index));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SectionHost;

    fn assert_host<H: SectionHost>(_: &H) {}

    #[test]
    fn test_layout_follows_viewport() {
        let mut page = HeadlessPage::new(500.0, 800.0);
        let idx = page.add_section(HeadlessSection::new(1000.0, 3));

        let layout = page.section(idx).unwrap().measure().unwrap();
        assert_eq!(layout.scrollable_width(), 1000.0);
        assert_eq!(layout.start, 1000.0);

        page.set_viewport(600.0, 800.0);
        let layout = page.section(idx).unwrap().measure().unwrap();
        assert_eq!(layout.scrollable_width(), 1200.0);
    }

    #[test]
    fn test_fixed_panel_width() {
        let mut page = HeadlessPage::new(1280.0, 720.0);
        let idx = page.add_section(HeadlessSection::new(0.0, 2).with_panel_width(400.0));
        let layout = page.section(idx).unwrap().measure().unwrap();
        assert_eq!(layout.scrollable_width(), 0.0);
    }

    #[test]
    fn test_missing_elements_fail_measurement() {
        let mut page = HeadlessPage::new(800.0, 600.0);
        let gone = page.add_section(HeadlessSection::new(0.0, 3).missing());
        let empty = page.add_section(HeadlessSection::new(0.0, 0));

        assert!(matches!(
            page.section(gone).unwrap().measure(),
            Err(PlatformError::MissingElement(_))
        ));
        assert!(matches!(
            page.section(empty).unwrap().measure(),
            Err(PlatformError::MissingElement(_))
        ));
        assert!(matches!(
            page.section(9),
            Err(PlatformError::UnknownSection(9))
        ));
    }

    #[test]
    fn test_view_commands_recorded() {
        let mut page = HeadlessPage::new(800.0, 600.0);
        let idx = page.add_section(HeadlessSection::new(0.0, 3));
        {
            let mut host = page.section(idx).unwrap();
            assert_host(&host);
            host.set_pinned(PinStrategy::Fixed, true);
            host.translate_content(-120.0);
            host.set_active_dot(1);
            host.set_pinned(PinStrategy::Fixed, false);
            host.clear_pin_override();
            host.scroll_to(-5.0);
        }

        let state = page.section_state(idx).unwrap();
        assert!(!state.pinned);
        assert!(!state.has_pin_override);
        assert_eq!(state.translate_x, -120.0);
        assert_eq!(state.active_dot, Some(1));
        assert_eq!(state.commands.len(), 5);
        assert_eq!(page.scroll_offset(), 0.0);
        assert_eq!(page.scroll_writes(), 1);
    }
}
