//! Section event vocabulary
//!
//! Platform signals a pinned section consumes, normalized so that every
//! host (browser bridge, headless page, tests) speaks the same language.

use serde::{Deserialize, Serialize};

/// Event type identifier
pub type EventType = u32;

/// Event types understood by a pin controller
pub mod event_types {
    use super::EventType;

    /// Document scroll position changed
    pub const SCROLL: EventType = 30;
    /// Viewport resized (width and/or height)
    pub const RESIZE: EventType = 40;
    /// Device orientation flipped
    pub const ORIENTATION_CHANGE: EventType = 41;
    /// Page visibility toggled (tab hidden / shown)
    pub const VISIBILITY_CHANGE: EventType = 50;
    /// Progress indicator dot activated
    pub const DOT_CLICK: EventType = 55;

    /// Section torn down
    pub const UNMOUNT: EventType = 61;

    // Pin state machine inputs
    /// Scroll offset is inside the pinned range
    pub const ENTER_RANGE: EventType = 70;
    /// Scroll offset left the pinned range
    pub const LEAVE_RANGE: EventType = 71;
    /// A frame elapsed after a pin/unpin was requested
    pub const SETTLE: EventType = 72;
    /// Desynchronized pin forcibly released
    pub const FORCE_RELEASE: EventType = 73;
}

/// A section event with associated data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_type: EventType,
    pub data: EventData,
    /// Host clock in milliseconds
    pub timestamp_ms: f64,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventData {
    /// Absolute document scroll offset in pixels
    Scroll { offset: f32 },
    /// New viewport size in logical pixels
    Resize { width: f32, height: f32 },
    Visibility { hidden: bool },
    DotClick { index: usize },
    None,
}

impl Event {
    pub fn scroll(offset: f32, timestamp_ms: f64) -> Self {
        Self {
            event_type: event_types::SCROLL,
            data: EventData::Scroll { offset },
            timestamp_ms,
        }
    }

    pub fn resize(width: f32, height: f32, timestamp_ms: f64) -> Self {
        Self {
            event_type: event_types::RESIZE,
            data: EventData::Resize { width, height },
            timestamp_ms,
        }
    }

    pub fn orientation_change(timestamp_ms: f64) -> Self {
        Self {
            event_type: event_types::ORIENTATION_CHANGE,
            data: EventData::None,
            timestamp_ms,
        }
    }

    pub fn visibility(hidden: bool, timestamp_ms: f64) -> Self {
        Self {
            event_type: event_types::VISIBILITY_CHANGE,
            data: EventData::Visibility { hidden },
            timestamp_ms,
        }
    }

    pub fn dot_click(index: usize, timestamp_ms: f64) -> Self {
        Self {
            event_type: event_types::DOT_CLICK,
            data: EventData::DotClick { index },
            timestamp_ms,
        }
    }

    pub fn unmount(timestamp_ms: f64) -> Self {
        Self {
            event_type: event_types::UNMOUNT,
            data: EventData::None,
            timestamp_ms,
        }
    }
}
