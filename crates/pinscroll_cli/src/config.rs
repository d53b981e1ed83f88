//! Pinscroll configuration file handling

use anyhow::{Context, Result};
use pinscroll_app::RunConfig;
use pinscroll_layout::PinScrollConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "pinscroll.toml";

/// Top-level configuration (pinscroll.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PinscrollConfig {
    /// Section controller tuning
    #[serde(default)]
    pub section: PinScrollConfig,
    #[serde(default)]
    pub run: RunSettings,
}

/// Headless run settings
#[derive(Debug, Deserialize, Serialize)]
pub struct RunSettings {
    /// Logical milliseconds between frames
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Trace sampling interval in frames (0 disables the trace)
    #[serde(default = "default_probe_every")]
    pub probe_every_frames: u32,
    /// Where `pinscroll run` writes its report when `--report` is absent
    #[serde(default)]
    pub report: Option<String>,
}

fn default_tick_ms() -> u64 {
    16
}

fn default_probe_every() -> u32 {
    4
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            probe_every_frames: default_probe_every(),
            report: None,
        }
    }
}

impl RunSettings {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            tick_ms: self.tick_ms,
            probe_every_frames: self.probe_every_frames,
            ..RunConfig::default()
        }
    }
}

impl PinscrollConfig {
    /// Load configuration from a file or a directory containing pinscroll.toml
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            anyhow::bail!(
                "No {CONFIG_FILE} found in {}. Run `pinscroll init` to create one.",
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Load from the current directory when a config exists, defaults otherwise
    pub fn discover(dir: &Path) -> Result<Self> {
        if dir.join(CONFIG_FILE).exists() {
            Self::load_from_dir(dir)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Create a configuration with every default spelled out
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinscroll_platform::PinStrategy;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = PinscrollConfig::from_toml("").unwrap();
        assert_eq!(config.section, PinScrollConfig::default());
        assert_eq!(config.run.tick_ms, 16);
        assert!(config.run.report.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = PinscrollConfig::from_toml(
            r#"
            [section]
            strategy = "fixed"
            resize_quiet_ms = 200.0

            [section.stuck_guard]
            consecutive_samples = 5

            [run]
            tick_ms = 8
            report = "reports/latest.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.section.strategy, Some(PinStrategy::Fixed));
        assert_eq!(config.section.resize_quiet_ms, Some(200.0));
        assert_eq!(config.section.stuck_guard.consecutive_samples, 5);
        assert_eq!(config.run.run_config().tick_ms, 8);
        assert_eq!(config.run.report.as_deref(), Some("reports/latest.json"));
    }

    #[test]
    fn test_generated_config_parses() {
        let text = PinscrollConfig::new().to_toml().unwrap();
        assert!(text.contains("[section]"));
        let parsed = PinscrollConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.section.seek_duration_ms, 800.0);
    }

    #[test]
    fn test_missing_config_suggests_init() {
        let dir = std::env::temp_dir().join("pinscroll-config-missing");
        let err = PinscrollConfig::load_from_dir(&dir).unwrap_err();
        assert!(err.to_string().contains("pinscroll init"));
    }
}
