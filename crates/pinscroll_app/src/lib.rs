//! Pinscroll Headless Runner
//!
//! Drives pinned horizontal sections on a simulated page from a JSON
//! scenario: user scrolls (delivered or lost), viewport changes, dot
//! clicks and waits, interleaved with assertions on the resulting state.
//!
//! ```rust
//! use pinscroll_app::{run_scenario, RunConfig};
//! use pinscroll_layout::PinScrollConfig;
//!
//! let outcome = run_scenario(
//!     r#"{
//!         "viewport": { "width": 300, "height": 600 },
//!         "sections": [{ "name": "work", "start": 0, "panels": 4 }],
//!         "steps": [
//!             { "type": "scroll", "to": 600 },
//!             { "type": "assert_panel", "section": "work", "panel": 2 }
//!         ]
//!     }"#,
//!     RunConfig::default(),
//!     &PinScrollConfig::default(),
//! )
//! .unwrap();
//! assert!(!outcome.is_failed());
//! ```

pub mod assert;
pub mod report;
pub mod runner;
pub mod runtime;
pub mod scenario;

pub use report::{ReportStatus, ScenarioReport};
pub use runner::{run_loaded_scenario, run_scenario, RunOutcome};
pub use runtime::{FrameContext, FrameLoop, RunConfig};
pub use scenario::{PinScenario, ScenarioStep, SectionSpec};
