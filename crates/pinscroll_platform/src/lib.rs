//! Pinscroll Platform Abstraction
//!
//! The boundary between a pin controller and whatever hosts it:
//!
//! - [`PlatformProfile`]: capabilities detected once per page (pin strategy,
//!   stuck-state guarding, address-bar resize filtering, timing defaults)
//! - [`LayoutProbe`], [`ScrollHost`], [`SectionView`]: the measurement, scroll
//!   and visual-update seams, combined as [`SectionHost`]
//! - [`HeadlessPage`]: an in-memory host used by the scenario runner and tests

pub mod error;
pub mod headless;
pub mod host;
pub mod profile;

pub use error::{PlatformError, Result};
pub use headless::{HeadlessPage, HeadlessSection, HeadlessSectionHost, ViewCommand};
pub use host::{LayoutProbe, ScrollHost, SectionHost, SectionView};
pub use profile::{PinStrategy, PlatformProfile};
