//! Pinscroll Section Controller
//!
//! Owns the pin/scrub lifecycle of a horizontal-scroll section:
//!
//! - pins the section while the document scrolls through its range
//! - maps the scroll offset 1:1 onto horizontal content travel
//! - publishes the active panel to indicator dots
//! - recovers from pins that desynchronize from the native scroller
//! - serves click-to-seek navigation
//!
//! # Example
//!
//! ```rust
//! use pinscroll_layout::{PinRuntime, PinScrollConfig, PinState};
//! use pinscroll_platform::{HeadlessPage, HeadlessSection, PlatformProfile};
//!
//! let mut page = HeadlessPage::new(300.0, 800.0);
//! let index = page.add_section(HeadlessSection::new(0.0, 4));
//!
//! let mut runtime = PinRuntime::new(PinScrollConfig::default(), PlatformProfile::desktop());
//! let id = runtime.mount(&mut page.section(index).unwrap()).unwrap();
//!
//! let controller = runtime.get_mut(id).unwrap();
//! controller.on_scroll(300.0, &mut page.section(index).unwrap());
//! assert_eq!(controller.active_panel(), 1);
//! assert_eq!(controller.pin_state(), PinState::Pinning);
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod pin_state;
pub mod runtime;
pub mod stuck_guard;

pub use config::{PinScrollConfig, StuckGuardConfig};
pub use controller::ScrollPinController;
pub use error::MountError;
pub use pin_state::PinState;
pub use runtime::{PinRuntime, SectionId};
pub use stuck_guard::{StuckGuard, StuckReason};
