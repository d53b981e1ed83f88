//! Pinscroll Core
//!
//! Foundational primitives for pinned horizontal-scroll sections:
//!
//! - **Events**: the platform signals a section reacts to (scroll, resize,
//!   orientation, visibility, dot clicks)
//! - **State Machines**: typed transition tables with recorded history
//! - **Geometry**: measured section layout and its scrollable distance
//! - **Progress Mapping**: the pure offset → progress → panel mapping
//!
//! # Example
//!
//! ```rust
//! use pinscroll_core::ProgressMapper;
//!
//! // 4 panels, 900px of horizontal travel
//! let sample = ProgressMapper::sample(300.0, 900.0, 4);
//! assert_eq!(sample.active_panel, 1);
//! assert!((sample.progress - 1.0 / 3.0).abs() < 1e-6);
//!
//! // Dot 2 seeks to two thirds of the travel
//! assert_eq!(ProgressMapper::seek_offset(0.0, 900.0, 2, 4), 600.0);
//! ```

pub mod events;
pub mod fsm;
pub mod layout;
pub mod progress;

pub use events::{Event, EventData, EventType};
pub use fsm::{Fsm, StateTransitions};
pub use layout::SectionLayout;
pub use progress::{ProgressMapper, ProgressSample};
