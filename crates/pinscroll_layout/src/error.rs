//! Mount errors

use pinscroll_platform::PlatformError;
use thiserror::Error;

/// Why a section could not be brought under control
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MountError {
    /// The host could not measure the section (elements missing, bad viewport)
    #[error("section layout unavailable: {0}")]
    Layout(#[from] PlatformError),

    /// The section has no panels to scroll through
    #[error("section has no panels")]
    NoPanels,
}
