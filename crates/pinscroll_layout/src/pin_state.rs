//! Pin lifecycle states

use pinscroll_core::events::event_types::{ENTER_RANGE, FORCE_RELEASE, LEAVE_RANGE, SETTLE};
use pinscroll_core::{EventType, StateTransitions};
use serde::{Deserialize, Serialize};

/// Where a section is in its pin lifecycle
///
/// `Pinning` and `Unpinning` last exactly one frame: the controller sends
/// `SETTLE` on the frame after entering them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinState {
    /// Section scrolls with the document
    #[default]
    Unpinned,
    /// Entered the range this frame
    Pinning,
    /// Held in place; scroll drives horizontal travel
    Pinned,
    /// Left the range this frame
    Unpinning,
}

impl PinState {
    /// Whether the section is presented as pinned
    pub fn is_held(&self) -> bool {
        matches!(self, PinState::Pinning | PinState::Pinned | PinState::Unpinning)
    }

    pub fn is_transitional(&self) -> bool {
        matches!(self, PinState::Pinning | PinState::Unpinning)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PinState::Unpinned => "unpinned",
            PinState::Pinning => "pinning",
            PinState::Pinned => "pinned",
            PinState::Unpinning => "unpinning",
        }
    }
}

impl std::fmt::Display for PinState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateTransitions for PinState {
    fn on_event(&self, event: EventType) -> Option<Self> {
        use PinState::*;

        match (self, event) {
            (Unpinned, ENTER_RANGE) => Some(Pinning),
            (Pinning, SETTLE) => Some(Pinned),
            (Pinning, LEAVE_RANGE) => Some(Unpinned),
            (Pinned, LEAVE_RANGE) => Some(Unpinning),
            (Unpinning, SETTLE) => Some(Unpinned),
            (Unpinning, ENTER_RANGE) => Some(Pinned),

            // Recovery from any held state
            (Pinning | Pinned | Unpinning, FORCE_RELEASE) => Some(Unpinned),

            _ => None,
        }
    }
}
