//! Measured geometry of a horizontal-scroll section

use serde::{Deserialize, Serialize};

/// Layout of one section as measured by the host
///
/// All lengths are logical pixels. `start` is the document scroll offset at
/// which the section's top meets the viewport top (the pin boundary).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionLayout {
    /// Document offset of the section's top edge
    pub start: f32,
    /// Full width of the horizontal wrapper (all panels side by side)
    pub content_width: f32,
    /// Visible viewport width
    pub viewport_width: f32,
    /// Visible viewport height
    pub viewport_height: f32,
    /// Number of panels inside the wrapper (>= 1 for a mountable section)
    pub panel_count: usize,
    /// Number of progress indicator dots (may be 0)
    pub dot_count: usize,
}

impl SectionLayout {
    /// Horizontal distance the wrapper travels while pinned
    ///
    /// Never negative: content narrower than the viewport has nothing to
    /// scroll.
    pub fn scrollable_width(&self) -> f32 {
        let distance = self.content_width - self.viewport_width;
        if distance > 0.0 {
            distance
        } else {
            0.0
        }
    }

    /// Document offset where the pin releases at the far end
    pub fn end(&self) -> f32 {
        self.start + self.scrollable_width()
    }

    /// Whether pinning makes sense at all for this layout
    pub fn can_pin(&self) -> bool {
        self.scrollable_width() > 0.0
    }

    /// Offset relative to the section start (negative above the section)
    pub fn relative(&self, document_offset: f32) -> f32 {
        document_offset - self.start
    }
}
