//! Report output model for headless section runs.

use anyhow::{bail, Result};
use pinscroll_layout::PinState;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path};

/// Report status for a headless run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// Final state of one section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSummary {
    pub name: String,
    pub mounted: bool,
    pub pin_state: PinState,
    pub progress: f32,
    pub active_panel: usize,
    pub recoveries: u32,
}

/// One sampled frame of the run trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSample {
    pub frame: u64,
    pub elapsed_ms: u64,
    pub scroll_offset: f32,
    pub sections: Vec<SectionSummary>,
}

/// Machine-readable result of a headless run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub message: Option<String>,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    pub profile: String,
    pub sections: Vec<SectionSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trace: Vec<FrameSample>,
}

impl ScenarioReport {
    pub fn passed(elapsed_frames: u64, elapsed_ms: u64) -> Self {
        Self {
            status: ReportStatus::Passed,
            failed_step_index: None,
            assertion: None,
            message: None,
            elapsed_frames,
            elapsed_ms,
            profile: String::new(),
            sections: Vec::new(),
            trace: Vec::new(),
        }
    }

    pub fn failed(
        assertion: &str,
        failed_step_index: usize,
        message: String,
        elapsed_frames: u64,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            failed_step_index: Some(failed_step_index),
            assertion: Some(assertion.to_string()),
            message: Some(message),
            ..Self::passed(elapsed_frames, elapsed_ms)
        }
    }

    /// Total stuck-pin recoveries across all sections.
    pub fn total_recoveries(&self) -> u32 {
        self.sections.iter().map(|s| s.recoveries).sum()
    }

    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        if path.is_absolute() || path.has_root() {
            bail!("report path must be relative and must not start with a separator");
        }
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            bail!("report path cannot contain '..' or drive prefixes");
        }
        let payload = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        let payload = serde_json::to_string_pretty(self)?;
        writer.write_all(payload.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_report_json() {
        let report = ScenarioReport::failed("assert_panel", 3, "work: expected panel 1".into(), 10, 160);
        let mut out = Vec::new();
        report.write_to_writer(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["failed_step_index"], 3);
        assert_eq!(value["assertion"], "assert_panel");
        assert!(value.get("trace").is_none());
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let report = ScenarioReport::passed(0, 0);
        assert!(report.write_to_path(Path::new("/tmp/report.json")).is_err());
        assert!(report.write_to_path(Path::new("../report.json")).is_err());
    }
}
