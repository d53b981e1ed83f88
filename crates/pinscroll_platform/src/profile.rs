//! Platform capability detection
//!
//! User-agent sniffing happens exactly once, in [`PlatformProfile::detect`].
//! The resulting profile is immutable and injected into controllers, which
//! never branch on the platform themselves.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

/// How a section is held in place while its content scrolls sideways
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinStrategy {
    /// `position: fixed` while pinned (desktop browsers)
    #[default]
    Fixed,
    /// Counter-translate the section while pinned (mobile browsers, where
    /// fixed positioning fights the native scroller)
    Transform,
    /// No pinning; the wrapper is a natively scrolling horizontal container
    NativeScrollContainer,
}

impl PinStrategy {
    /// Whether this strategy pins the section at all
    pub fn pins(&self) -> bool {
        !matches!(self, PinStrategy::NativeScrollContainer)
    }

    /// Whether the controller drives the wrapper's horizontal transform
    pub fn drives_transform(&self) -> bool {
        self.pins()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PinStrategy::Fixed => "fixed",
            PinStrategy::Transform => "transform",
            PinStrategy::NativeScrollContainer => "native_scroll_container",
        }
    }
}

impl fmt::Display for PinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PinStrategy {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fixed" => Ok(PinStrategy::Fixed),
            "transform" => Ok(PinStrategy::Transform),
            "native" | "native_scroll_container" => Ok(PinStrategy::NativeScrollContainer),
            _ => Err(PlatformError::UnsupportedStrategy(s.to_string())),
        }
    }
}

/// Capabilities of the page hosting a section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformProfile {
    pub strategy: PinStrategy,
    /// iPhone / iPad / iPod
    pub is_ios: bool,
    /// Any phone or tablet browser
    pub is_mobile: bool,
    /// Pin state can desynchronize from the native scroll position, so the
    /// stuck-state guard must run
    pub stuck_guard: bool,
    /// Height-only viewport changes below the address-bar threshold are
    /// browser chrome moving, not real resizes
    pub ignore_address_bar_resize: bool,
    /// Default resize quiet period for this platform
    pub resize_quiet_ms: f64,
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self::desktop()
    }
}

fn ios_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"iPad|iPhone|iPod").expect("static regex"))
}

fn mobile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)iPhone|iPad|iPod|Android").expect("static regex"))
}

impl PlatformProfile {
    /// Desktop browser: fixed pinning, no workarounds
    pub fn desktop() -> Self {
        Self {
            strategy: PinStrategy::Fixed,
            is_ios: false,
            is_mobile: false,
            stuck_guard: false,
            ignore_address_bar_resize: false,
            resize_quiet_ms: 250.0,
        }
    }

    /// Non-iOS mobile browser: transform pinning, faster resize response
    pub fn mobile() -> Self {
        Self {
            strategy: PinStrategy::Transform,
            is_ios: false,
            is_mobile: true,
            stuck_guard: false,
            ignore_address_bar_resize: false,
            resize_quiet_ms: 150.0,
        }
    }

    /// iOS browser: transform pinning plus every desync workaround
    pub fn ios() -> Self {
        Self {
            strategy: PinStrategy::Transform,
            is_ios: true,
            is_mobile: true,
            stuck_guard: true,
            ignore_address_bar_resize: true,
            resize_quiet_ms: 150.0,
        }
    }

    /// Detect capabilities from a user-agent string
    pub fn detect(user_agent: &str) -> Self {
        let profile = if ios_pattern().is_match(user_agent) {
            Self::ios()
        } else if mobile_pattern().is_match(user_agent) {
            Self::mobile()
        } else {
            Self::desktop()
        };
        tracing::debug!(
            strategy = %profile.strategy,
            ios = profile.is_ios,
            mobile = profile.is_mobile,
            "detected platform profile"
        );
        profile
    }

    /// Same profile with a different pin strategy
    pub fn with_strategy(mut self, strategy: PinStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
    const PIXEL: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Mobile Safari/537.36";
    const MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15";

    #[test]
    fn test_detect_ios() {
        let p = PlatformProfile::detect(IPHONE);
        assert_eq!(p.strategy, PinStrategy::Transform);
        assert!(p.is_ios && p.is_mobile);
        assert!(p.stuck_guard);
        assert!(p.ignore_address_bar_resize);
    }

    #[test]
    fn test_detect_android() {
        let p = PlatformProfile::detect(PIXEL);
        assert_eq!(p.strategy, PinStrategy::Transform);
        assert!(p.is_mobile);
        assert!(!p.is_ios);
        assert!(!p.stuck_guard);
    }

    #[test]
    fn test_detect_desktop() {
        let p = PlatformProfile::detect(MAC);
        assert_eq!(p, PlatformProfile::desktop());
        assert_eq!(PlatformProfile::detect(""), PlatformProfile::desktop());
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("fixed".parse::<PinStrategy>().unwrap(), PinStrategy::Fixed);
        assert_eq!(
            "Native-Scroll-Container".parse::<PinStrategy>().unwrap(),
            PinStrategy::NativeScrollContainer
        );
        assert!(matches!(
            "sticky".parse::<PinStrategy>(),
            Err(PlatformError::UnsupportedStrategy(_))
        ));
    }

    #[test]
    fn test_strategy_serde_names() {
        let json = serde_json::to_string(&PinStrategy::NativeScrollContainer).unwrap();
        assert_eq!(json, "\"native_scroll_container\"");
        let back: PinStrategy = serde_json::from_str("\"transform\"").unwrap();
        assert_eq!(back, PinStrategy::Transform);
    }

    #[test]
    fn test_native_container_never_pins() {
        assert!(!PinStrategy::NativeScrollContainer.pins());
        assert!(PinStrategy::Fixed.pins());
        assert!(PinStrategy::Transform.drives_transform());
    }
}
