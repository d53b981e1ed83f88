//! Section controller configuration
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides. Values left as `None` defer to the detected
//! [`PlatformProfile`](pinscroll_platform::PlatformProfile).

use pinscroll_animation::Easing;
use pinscroll_platform::{PinStrategy, PlatformProfile};
use serde::{Deserialize, Serialize};

/// Stuck-state guard tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StuckGuardConfig {
    /// Force the guard on or off; `None` follows the platform profile
    pub enabled: Option<bool>,
    /// How often the host's scroll offset is sampled while pinned
    pub sample_interval_ms: f64,
    /// Consecutive exit-bound samples that count as stuck
    pub consecutive_samples: u32,
    /// Hard ceiling on one continuous pin
    pub pinned_timeout_ms: f64,
}

impl Default for StuckGuardConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            sample_interval_ms: 16.0,
            consecutive_samples: 3,
            pinned_timeout_ms: 5000.0,
        }
    }
}

impl StuckGuardConfig {
    pub fn is_enabled(&self, profile: &PlatformProfile) -> bool {
        self.enabled.unwrap_or(profile.stuck_guard)
    }
}

/// Configuration for one pinned horizontal section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinScrollConfig {
    /// Override the profile's pin strategy
    pub strategy: Option<PinStrategy>,
    /// Resize debounce; `None` uses the profile's quiet period
    pub resize_quiet_ms: Option<f64>,
    /// Extra wait after an orientation change before re-measuring
    pub orientation_settle_ms: f64,
    /// Height-only changes below this are treated as address-bar movement
    pub address_bar_threshold_px: f32,
    /// Duration of a dot-click seek
    pub seek_duration_ms: f32,
    pub seek_easing: Easing,
    /// Seeks shorter than this snap instead of animating
    pub snap_epsilon_px: f32,
    /// A scroll this far from the seek's last write is a user scroll
    pub user_scroll_tolerance_px: f32,
    pub stuck_guard: StuckGuardConfig,
}

impl Default for PinScrollConfig {
    fn default() -> Self {
        Self {
            strategy: None,
            resize_quiet_ms: None,
            orientation_settle_ms: 200.0,
            address_bar_threshold_px: 100.0,
            seek_duration_ms: 800.0,
            seek_easing: Easing::EaseOutCubic,
            snap_epsilon_px: 0.5,
            user_scroll_tolerance_px: 1.0,
            stuck_guard: StuckGuardConfig::default(),
        }
    }
}

impl PinScrollConfig {
    pub fn strategy_for(&self, profile: &PlatformProfile) -> PinStrategy {
        self.strategy.unwrap_or(profile.strategy)
    }

    pub fn resize_quiet_for(&self, profile: &PlatformProfile) -> f64 {
        self.resize_quiet_ms.unwrap_or(profile.resize_quiet_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PinScrollConfig::default();
        assert_eq!(config.seek_duration_ms, 800.0);
        assert_eq!(config.seek_easing, Easing::EaseOutCubic);
        assert_eq!(config.stuck_guard.consecutive_samples, 3);
        assert_eq!(config.stuck_guard.pinned_timeout_ms, 5000.0);
    }

    #[test]
    fn test_profile_fallbacks() {
        let config = PinScrollConfig::default();
        let ios = PlatformProfile::ios();
        assert_eq!(config.strategy_for(&ios), PinStrategy::Transform);
        assert_eq!(config.resize_quiet_for(&ios), 150.0);
        assert!(config.stuck_guard.is_enabled(&ios));
        assert!(!config.stuck_guard.is_enabled(&PlatformProfile::desktop()));

        let config = PinScrollConfig {
            strategy: Some(PinStrategy::NativeScrollContainer),
            resize_quiet_ms: Some(200.0),
            stuck_guard: StuckGuardConfig {
                enabled: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        let desktop = PlatformProfile::desktop();
        assert_eq!(config.strategy_for(&desktop), PinStrategy::NativeScrollContainer);
        assert_eq!(config.resize_quiet_for(&desktop), 200.0);
        assert!(config.stuck_guard.is_enabled(&desktop));
    }

    #[test]
    fn test_partial_toml() {
        let config: PinScrollConfig = toml::from_str(
            r#"
            strategy = "transform"
            seek_duration_ms = 400.0

            [stuck_guard]
            enabled = true
            "#,
        )
        .unwrap();
        assert_eq!(config.strategy, Some(PinStrategy::Transform));
        assert_eq!(config.seek_duration_ms, 400.0);
        assert_eq!(config.stuck_guard.enabled, Some(true));
        assert_eq!(config.stuck_guard.sample_interval_ms, 16.0);
        assert_eq!(config.orientation_settle_ms, 200.0);
    }
}
