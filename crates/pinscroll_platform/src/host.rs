//! Host seams a pin controller talks through
//!
//! A browser bridge implements these against the DOM; [`crate::HeadlessPage`]
//! implements them in memory. Controllers only ever see the traits.

use pinscroll_core::SectionLayout;

use crate::error::Result;
use crate::profile::PinStrategy;

/// Measures the section, its wrapper and panels
pub trait LayoutProbe {
    /// Current layout, or an error when the section's elements are missing
    fn measure(&self) -> Result<SectionLayout>;
}

/// The document scroller
pub trait ScrollHost {
    /// Current absolute document scroll offset
    fn scroll_offset(&self) -> f32;

    /// Jump the document to `offset` (no browser-side smoothing)
    fn scroll_to(&mut self, offset: f32);
}

/// Visual side effects of a section
///
/// Implementations only write what they are told; they never read back
/// controller state.
pub trait SectionView {
    /// Horizontal translation of the wrapper in pixels (0 or negative)
    fn translate_content(&mut self, x: f32);

    /// Toggle the pinned presentation (the `is-pinned` class plus whatever
    /// the strategy needs to hold the section in place)
    fn set_pinned(&mut self, strategy: PinStrategy, pinned: bool);

    /// Remove any inline positioning left behind by a pin (`position`,
    /// `top`, `left`, `width`, `height`, `transform`)
    fn clear_pin_override(&mut self);

    /// Mark indicator dot `index` active and every other dot inactive
    fn set_active_dot(&mut self, index: usize);
}

/// Everything a controller needs from its host
pub trait SectionHost: LayoutProbe + ScrollHost + SectionView {}

impl<T: LayoutProbe + ScrollHost + SectionView> SectionHost for T {}
