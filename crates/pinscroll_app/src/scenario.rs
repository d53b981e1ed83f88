//! Scenario definition for headless section runs.

use anyhow::{bail, Context, Result};
use pinscroll_layout::PinState;
use pinscroll_platform::PinStrategy;
use serde::Deserialize;
use std::path::Path;

/// A simulated page plus the steps to run against it.
#[derive(Debug, Clone, Deserialize)]
pub struct PinScenario {
    /// User agent used to detect the platform profile (desktop when absent).
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Override the detected pin strategy.
    #[serde(default)]
    pub strategy: Option<PinStrategy>,
    pub viewport: Viewport,
    pub sections: Vec<SectionSpec>,
    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// One horizontal section on the simulated page.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionSpec {
    pub name: String,
    /// Document offset of the section's top edge.
    pub start: f32,
    pub panels: usize,
    /// Fixed panel width; panels are one viewport wide when absent.
    #[serde(default)]
    pub panel_width: Option<f32>,
    /// Indicator dot count; one per panel when absent.
    #[serde(default)]
    pub dots: Option<usize>,
    /// Leave the section's elements out of the document.
    #[serde(default)]
    pub missing: bool,
}

impl PinScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        let scenario: Self = serde_json::from_str(input).context("invalid scenario JSON")?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw)
    }

    fn validate(&self) -> Result<()> {
        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            bail!("scenario viewport must be non-zero");
        }
        for (i, section) in self.sections.iter().enumerate() {
            if self.sections[..i].iter().any(|s| s.name == section.name) {
                bail!("duplicate section name '{}'", section.name);
            }
        }
        for step in &self.steps {
            if let Some(name) = step.section() {
                if !self.sections.iter().any(|s| s.name == name) {
                    bail!("step refers to unknown section '{name}'");
                }
            }
        }
        Ok(())
    }
}

fn default_tolerance() -> f32 {
    1e-3
}

fn default_offset_tolerance() -> f32 {
    0.5
}

/// Scenario steps.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// User scroll with events delivered; `step` spreads it over frames.
    Scroll {
        to: f32,
        #[serde(default)]
        step: Option<f32>,
    },
    /// User scroll whose events never reach the sections.
    SilentScroll { to: f32 },
    Resize { width: f32, height: f32 },
    /// Device rotation to the given viewport.
    Orientation { width: f32, height: f32 },
    Visibility { hidden: bool },
    /// Click indicator dot `panel`.
    Seek { section: String, panel: usize },
    Wait { ms: u64 },
    Tick { frames: u32 },
    Unmount { section: String },
    AssertProgress {
        section: String,
        value: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    AssertPanel { section: String, panel: usize },
    AssertPinState { section: String, state: PinState },
    AssertScrollOffset {
        value: f32,
        #[serde(default = "default_offset_tolerance")]
        tolerance: f32,
    },
    AssertRecoveries { section: String, count: u32 },
    AssertActiveDot { section: String, dot: usize },
}

impl ScenarioStep {
    /// Section this step targets, if any.
    pub fn section(&self) -> Option<&str> {
        match self {
            ScenarioStep::Seek { section, .. }
            | ScenarioStep::Unmount { section }
            | ScenarioStep::AssertProgress { section, .. }
            | ScenarioStep::AssertPanel { section, .. }
            | ScenarioStep::AssertPinState { section, .. }
            | ScenarioStep::AssertRecoveries { section, .. }
            | ScenarioStep::AssertActiveDot { section, .. } => Some(section),
            _ => None,
        }
    }

    /// Assertion name used in reports.
    pub fn assertion_name(&self) -> Option<&'static str> {
        Some(match self {
            ScenarioStep::AssertProgress { .. } => "assert_progress",
            ScenarioStep::AssertPanel { .. } => "assert_panel",
            ScenarioStep::AssertPinState { .. } => "assert_pin_state",
            ScenarioStep::AssertScrollOffset { .. } => "assert_scroll_offset",
            ScenarioStep::AssertRecoveries { .. } => "assert_recoveries",
            ScenarioStep::AssertActiveDot { .. } => "assert_active_dot",
            _ => return None,
        })
    }
}
