//! Assertion helpers for headless section runs.

use pinscroll_layout::PinState;
use rustc_hash::FxHashMap;

/// Observable state of one section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSnapshot {
    pub mounted: bool,
    pub pin_state: PinState,
    pub progress: f32,
    pub active_panel: usize,
    pub active_dot: Option<usize>,
    pub recoveries: u32,
}

/// Snapshot of page state used for assertions.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    pub scroll_offset: f32,
    pub sections: FxHashMap<String, SectionSnapshot>,
}

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    fn failed(code: &str, message: String) -> Self {
        AssertionResult::Failed {
            code: code.to_string(),
            message,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, AssertionResult::Passed)
    }
}

fn mounted_section<'a>(
    name: &str,
    snapshot: &'a PageSnapshot,
) -> Result<&'a SectionSnapshot, AssertionResult> {
    match snapshot.sections.get(name) {
        None => Err(AssertionResult::failed(
            "missing_section",
            format!("{name}: section not found"),
        )),
        Some(section) if !section.mounted => Err(AssertionResult::failed(
            "section_unmounted",
            format!("{name}: section is not mounted"),
        )),
        Some(section) => Ok(section),
    }
}

pub fn evaluate_assert_progress(
    name: &str,
    expected: f32,
    tolerance: f32,
    snapshot: &PageSnapshot,
) -> AssertionResult {
    let section = match mounted_section(name, snapshot) {
        Ok(section) => section,
        Err(result) => return result,
    };
    if (section.progress - expected).abs() <= tolerance {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "progress_mismatch",
            format!("{name}: expected progress {expected} (±{tolerance}), got {}", section.progress),
        )
    }
}

pub fn evaluate_assert_panel(name: &str, expected: usize, snapshot: &PageSnapshot) -> AssertionResult {
    let section = match mounted_section(name, snapshot) {
        Ok(section) => section,
        Err(result) => return result,
    };
    if section.active_panel == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "panel_mismatch",
            format!("{name}: expected panel {expected}, got {}", section.active_panel),
        )
    }
}

pub fn evaluate_assert_pin_state(
    name: &str,
    expected: PinState,
    snapshot: &PageSnapshot,
) -> AssertionResult {
    // An unmounted section is by definition released
    let state = match snapshot.sections.get(name) {
        Some(section) if section.mounted => section.pin_state,
        Some(_) => PinState::Unpinned,
        None => {
            return AssertionResult::failed("missing_section", format!("{name}: section not found"))
        }
    };
    if state == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "pin_state_mismatch",
            format!("{name}: expected {expected}, got {state}"),
        )
    }
}

pub fn evaluate_assert_scroll_offset(
    expected: f32,
    tolerance: f32,
    snapshot: &PageSnapshot,
) -> AssertionResult {
    if (snapshot.scroll_offset - expected).abs() <= tolerance {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "scroll_offset_mismatch",
            format!("expected scroll offset {expected}, got {}", snapshot.scroll_offset),
        )
    }
}

pub fn evaluate_assert_recoveries(name: &str, expected: u32, snapshot: &PageSnapshot) -> AssertionResult {
    let Some(section) = snapshot.sections.get(name) else {
        return AssertionResult::failed("missing_section", format!("{name}: section not found"));
    };
    if section.recoveries == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "recoveries_mismatch",
            format!("{name}: expected {expected} recoveries, got {}", section.recoveries),
        )
    }
}

pub fn evaluate_assert_active_dot(name: &str, expected: usize, snapshot: &PageSnapshot) -> AssertionResult {
    let Some(section) = snapshot.sections.get(name) else {
        return AssertionResult::failed("missing_section", format!("{name}: section not found"));
    };
    match section.active_dot {
        Some(dot) if dot == expected => AssertionResult::Passed,
        Some(dot) => AssertionResult::failed(
            "active_dot_mismatch",
            format!("{name}: expected dot {expected}, got {dot}"),
        ),
        None => AssertionResult::failed("missing_dot", format!("{name}: no active dot")),
    }
}
