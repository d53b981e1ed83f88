use pinscroll_app::{run_scenario, PinScenario, ReportStatus, RunConfig, RunOutcome};
use pinscroll_layout::{PinScrollConfig, PinState};

fn run(json: &str) -> RunOutcome {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    run_scenario(json, RunConfig::default(), &PinScrollConfig::default()).unwrap()
}

fn assert_passes(json: &str) {
    let outcome = run(json);
    let report = outcome.report();
    assert_eq!(
        report.status,
        ReportStatus::Passed,
        "step {:?} ({:?}): {:?}",
        report.failed_step_index,
        report.assertion,
        report.message
    );
}

#[test]
fn desktop_walkthrough() {
    assert_passes(include_str!("scenarios/desktop_walkthrough.json"));
}

#[test]
fn ios_stuck_recovery() {
    assert_passes(include_str!("scenarios/ios_stuck_recovery.json"));
}

#[test]
fn resize_keeps_progress() {
    assert_passes(include_str!("scenarios/resize_keeps_progress.json"));
}

#[test]
fn dot_navigation() {
    assert_passes(include_str!("scenarios/dot_navigation.json"));
}

#[test]
fn ios_address_bar() {
    assert_passes(include_str!("scenarios/ios_address_bar.json"));
}

#[test]
fn ios_recovery_is_reported() {
    let outcome = run(include_str!("scenarios/ios_stuck_recovery.json"));
    let report = outcome.report();
    assert_eq!(report.profile, "ios/transform");
    assert_eq!(report.total_recoveries(), 1);
    assert_eq!(report.sections[0].pin_state, PinState::Unpinned);
}

#[test]
fn desktop_has_no_recovery_for_lost_events() {
    let mut scenario =
        PinScenario::from_json(include_str!("scenarios/ios_stuck_recovery.json")).unwrap();
    scenario.user_agent = None;
    scenario.steps.truncate(6);

    let outcome = pinscroll_app::run_loaded_scenario(
        &scenario,
        RunConfig::default(),
        &PinScrollConfig::default(),
    )
    .unwrap();
    let report = outcome.report();
    assert_eq!(report.status, ReportStatus::Passed);
    assert_eq!(report.total_recoveries(), 0);
    assert_eq!(report.sections[0].pin_state, PinState::Pinned);
}

#[test]
fn missing_section_is_reported_unmounted() {
    let outcome = run(r#"{
        "viewport": { "width": 300, "height": 600 },
        "sections": [
            { "name": "ghost", "start": 0, "panels": 3, "missing": true },
            { "name": "work", "start": 0, "panels": 3 }
        ],
        "steps": [
            { "type": "scroll", "to": 300 },
            { "type": "assert_panel", "section": "work", "panel": 1 },
            { "type": "assert_panel", "section": "ghost", "panel": 0 }
        ]
    }"#);
    let report = outcome.report();
    assert_eq!(report.status, ReportStatus::Failed);
    assert_eq!(report.failed_step_index, Some(2));
    assert!(report.message.as_deref().unwrap_or("").contains("not mounted"));
    assert!(!report.sections[0].mounted);
    assert!(report.sections[1].mounted);
}

#[test]
fn report_round_trips_through_json() {
    let outcome = run(include_str!("scenarios/dot_navigation.json"));
    let mut out = Vec::new();
    outcome.report().write_to_writer(&mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["status"], "passed");
    assert_eq!(value["sections"][1]["name"], "work");
    assert!(value["trace"].as_array().map_or(false, |t| !t.is_empty()));
}
