//! Scenario runner that drives sections on a headless page.

use crate::assert::{
    evaluate_assert_active_dot, evaluate_assert_panel, evaluate_assert_pin_state,
    evaluate_assert_progress, evaluate_assert_recoveries, evaluate_assert_scroll_offset,
    AssertionResult, PageSnapshot, SectionSnapshot,
};
use crate::report::{FrameSample, ScenarioReport, SectionSummary};
use crate::runtime::{FrameContext, FrameLoop, RunConfig};
use crate::scenario::{PinScenario, ScenarioStep, SectionSpec};
use anyhow::{bail, Context, Result};
use pinscroll_core::Event;
use pinscroll_layout::{PinRuntime, PinScrollConfig, PinState, ScrollPinController, SectionId};
use pinscroll_platform::{HeadlessPage, HeadlessSection, PlatformProfile};
use rustc_hash::FxHashMap;

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: ScenarioReport },
    Failed { report: ScenarioReport },
}

impl RunOutcome {
    pub fn report(&self) -> &ScenarioReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn into_report(self) -> ScenarioReport {
        match self {
            RunOutcome::Passed { report } | RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON.
pub fn run_scenario(input: &str, cfg: RunConfig, config: &PinScrollConfig) -> Result<RunOutcome> {
    let scenario = PinScenario::from_json(input)?;
    run_loaded_scenario(&scenario, cfg, config)
}

/// Execute a pre-loaded scenario.
pub fn run_loaded_scenario(
    scenario: &PinScenario,
    cfg: RunConfig,
    config: &PinScrollConfig,
) -> Result<RunOutcome> {
    let mut run = Run {
        probe_every: cfg.probe_every_frames as u64,
        frames: FrameLoop::new(cfg)?,
        stage: Stage::new(scenario, config),
        trace: Vec::new(),
    };

    tracing::info!(
        sections = scenario.sections.len(),
        steps = scenario.steps.len(),
        profile = %run.stage.profile_label(),
        "running scenario"
    );

    for (step_index, step) in scenario.steps.iter().enumerate() {
        tracing::debug!(step_index, ?step, "step");

        if let Some(assertion) = step.assertion_name() {
            let snapshot = run.stage.snapshot();
            if let AssertionResult::Failed { message, .. } = evaluate(step, &snapshot) {
                tracing::info!(step_index, assertion, %message, "assertion failed");
                let report = ScenarioReport::failed(
                    assertion,
                    step_index,
                    message,
                    run.frames.elapsed_frames(),
                    run.frames.elapsed_ms(),
                );
                return Ok(RunOutcome::Failed {
                    report: run.finish(report),
                });
            }
            continue;
        }

        run.apply(step)
            .with_context(|| format!("step {step_index} failed"))?;
    }

    let report = ScenarioReport::passed(run.frames.elapsed_frames(), run.frames.elapsed_ms());
    Ok(RunOutcome::Passed {
        report: run.finish(report),
    })
}

fn evaluate(step: &ScenarioStep, snapshot: &PageSnapshot) -> AssertionResult {
    match step {
        ScenarioStep::AssertProgress {
            section,
            value,
            tolerance,
        } => evaluate_assert_progress(section, *value, *tolerance, snapshot),
        ScenarioStep::AssertPanel { section, panel } => evaluate_assert_panel(section, *panel, snapshot),
        ScenarioStep::AssertPinState { section, state } => {
            evaluate_assert_pin_state(section, *state, snapshot)
        }
        ScenarioStep::AssertScrollOffset { value, tolerance } => {
            evaluate_assert_scroll_offset(*value, *tolerance, snapshot)
        }
        ScenarioStep::AssertRecoveries { section, count } => {
            evaluate_assert_recoveries(section, *count, snapshot)
        }
        ScenarioStep::AssertActiveDot { section, dot } => {
            evaluate_assert_active_dot(section, *dot, snapshot)
        }
        _ => AssertionResult::Passed,
    }
}

struct Run {
    probe_every: u64,
    frames: FrameLoop,
    stage: Stage,
    trace: Vec<FrameSample>,
}

impl Run {
    fn advance(&mut self, count: u32) -> Result<()> {
        let probe_every = self.probe_every;
        let stage = &mut self.stage;
        let trace = &mut self.trace;
        self.frames.run(count, |ctx| {
            stage.frame(ctx.now_ms);
            if probe_every > 0 && ctx.frame_index % probe_every == 0 {
                trace.push(stage.sample(ctx));
            }
        })
    }

    fn apply(&mut self, step: &ScenarioStep) -> Result<()> {
        let now = self.frames.now_ms();
        match step {
            ScenarioStep::Scroll { to, step } => match step {
                Some(step) if *step > 0.0 => self.drag(*to, *step)?,
                _ => {
                    self.stage.user_scroll(*to, now);
                    self.advance(1)?;
                }
            },
            ScenarioStep::SilentScroll { to } => self.stage.page.set_scroll_offset(*to),
            ScenarioStep::Resize { width, height } => {
                self.stage.page.set_viewport(*width, *height);
                self.stage.broadcast(&Event::resize(*width, *height, now));
            }
            ScenarioStep::Orientation { width, height } => {
                self.stage.page.set_viewport(*width, *height);
                self.stage.broadcast(&Event::orientation_change(now));
            }
            ScenarioStep::Visibility { hidden } => {
                self.stage.broadcast(&Event::visibility(*hidden, now));
            }
            ScenarioStep::Seek { section, panel } => {
                self.stage.send(section, &Event::dot_click(*panel, now))?;
            }
            ScenarioStep::Wait { ms } => {
                let frames = self.frames.config().frames_for(*ms);
                self.advance(frames)?;
            }
            ScenarioStep::Tick { frames } => self.advance(*frames)?,
            ScenarioStep::Unmount { section } => self.stage.unmount(section)?,
            _ => {}
        }
        Ok(())
    }

    /// Scroll to `to` in `step`-sized increments, one event per frame.
    fn drag(&mut self, to: f32, step: f32) -> Result<()> {
        let mut offset = self.stage.page.scroll_offset();
        let increments = ((to - offset).abs() / step).ceil();
        if increments > self.frames.config().max_frames_per_step as f32 {
            bail!("scroll to {to} in steps of {step} needs too many frames");
        }
        while offset != to {
            offset = if to > offset {
                (offset + step).min(to)
            } else {
                (offset - step).max(to)
            };
            self.stage.user_scroll(offset, self.frames.now_ms());
            self.advance(1)?;
        }
        Ok(())
    }

    fn finish(self, mut report: ScenarioReport) -> ScenarioReport {
        report.profile = self.stage.profile_label();
        report.sections = self.stage.summaries();
        report.trace = self.trace;
        report
    }
}

struct StageSection {
    name: String,
    page_index: usize,
    id: Option<SectionId>,
    /// Final state captured at unmount
    retired: Option<SectionSummary>,
}

/// A headless page with its mounted sections.
struct Stage {
    page: HeadlessPage,
    runtime: PinRuntime,
    sections: Vec<StageSection>,
    by_name: FxHashMap<String, usize>,
}

impl Stage {
    fn new(scenario: &PinScenario, config: &PinScrollConfig) -> Self {
        let mut profile = PlatformProfile::detect(scenario.user_agent.as_deref().unwrap_or(""));
        if let Some(strategy) = scenario.strategy {
            profile = profile.with_strategy(strategy);
        }

        let mut page = HeadlessPage::new(scenario.viewport.width, scenario.viewport.height);
        let mut runtime = PinRuntime::new(config.clone(), profile);
        let mut sections = Vec::with_capacity(scenario.sections.len());
        let mut by_name = FxHashMap::default();

        for spec in &scenario.sections {
            let page_index = page.add_section(headless_section(spec));
            let id = match page.section(page_index) {
                Ok(mut host) => runtime.mount(&mut host),
                Err(_) => None,
            };
            by_name.insert(spec.name.clone(), sections.len());
            sections.push(StageSection {
                name: spec.name.clone(),
                page_index,
                id,
                retired: None,
            });
        }
        runtime.tick(0.0);

        Self {
            page,
            runtime,
            sections,
            by_name,
        }
    }

    fn profile_label(&self) -> String {
        let profile = self.runtime.profile();
        let platform = if profile.is_ios {
            "ios"
        } else if profile.is_mobile {
            "mobile"
        } else {
            "desktop"
        };
        format!("{platform}/{}", profile.strategy)
    }

    fn frame(&mut self, now_ms: f64) {
        self.runtime.tick(now_ms);
        for section in &self.sections {
            let Some(id) = section.id else {
                continue;
            };
            if let Ok(mut host) = self.page.section(section.page_index) {
                self.runtime.frame(id, now_ms, &mut host);
            }
        }
    }

    fn user_scroll(&mut self, offset: f32, now_ms: f64) {
        self.page.set_scroll_offset(offset);
        let offset = self.page.scroll_offset();
        self.broadcast(&Event::scroll(offset, now_ms));
    }

    fn broadcast(&mut self, event: &Event) {
        for section in &self.sections {
            let Some(id) = section.id else {
                continue;
            };
            if let Ok(mut host) = self.page.section(section.page_index) {
                self.runtime.dispatch(id, event, &mut host);
            }
        }
    }

    fn lookup(&self, name: &str) -> Result<&StageSection> {
        self.by_name
            .get(name)
            .map(|&i| &self.sections[i])
            .with_context(|| format!("unknown section '{name}'"))
    }

    fn send(&mut self, name: &str, event: &Event) -> Result<()> {
        let section = self.lookup(name)?;
        let (page_index, id) = (section.page_index, section.id);
        let Some(id) = id else {
            tracing::debug!(section = name, "event for unmounted section dropped");
            return Ok(());
        };
        let mut host = self.page.section(page_index)?;
        self.runtime.dispatch(id, event, &mut host);
        Ok(())
    }

    fn unmount(&mut self, name: &str) -> Result<()> {
        let index = *self
            .by_name
            .get(name)
            .with_context(|| format!("unknown section '{name}'"))?;
        let section = &mut self.sections[index];
        let Some(id) = section.id.take() else {
            return Ok(());
        };
        let mut host = self.page.section(section.page_index)?;
        if let Some(controller) = self.runtime.unmount(id, &mut host) {
            section.retired = Some(summary(&section.name, false, &controller));
        }
        Ok(())
    }

    fn summaries(&self) -> Vec<SectionSummary> {
        self.sections
            .iter()
            .map(|section| {
                match section.id.and_then(|id| self.runtime.get(id)) {
                    Some(controller) => summary(&section.name, true, controller),
                    None => section.retired.clone().unwrap_or_else(|| SectionSummary {
                        name: section.name.clone(),
                        mounted: false,
                        pin_state: PinState::Unpinned,
                        progress: 0.0,
                        active_panel: 0,
                        recoveries: 0,
                    }),
                }
            })
            .collect()
    }

    fn snapshot(&self) -> PageSnapshot {
        let mut snapshot = PageSnapshot {
            scroll_offset: self.page.scroll_offset(),
            ..Default::default()
        };
        for (section, summary) in self.sections.iter().zip(self.summaries()) {
            let active_dot = self
                .page
                .section_state(section.page_index)
                .and_then(|state| state.active_dot);
            snapshot.sections.insert(
                summary.name,
                SectionSnapshot {
                    mounted: summary.mounted,
                    pin_state: summary.pin_state,
                    progress: summary.progress,
                    active_panel: summary.active_panel,
                    active_dot,
                    recoveries: summary.recoveries,
                },
            );
        }
        snapshot
    }

    fn sample(&self, ctx: &FrameContext) -> FrameSample {
        FrameSample {
            frame: ctx.frame_index,
            elapsed_ms: ctx.now_ms as u64,
            scroll_offset: self.page.scroll_offset(),
            sections: self.summaries(),
        }
    }
}

fn headless_section(spec: &SectionSpec) -> HeadlessSection {
    let mut section = HeadlessSection::new(spec.start, spec.panels);
    if let Some(width) = spec.panel_width {
        section = section.with_panel_width(width);
    }
    if let Some(dots) = spec.dots {
        section = section.with_dots(dots);
    }
    if spec.missing {
        section = section.missing();
    }
    section
}

fn summary(name: &str, mounted: bool, controller: &ScrollPinController) -> SectionSummary {
    SectionSummary {
        name: name.to_string(),
        mounted,
        pin_state: controller.pin_state(),
        progress: controller.progress(),
        active_panel: controller.active_panel(),
        recoveries: controller.recoveries(),
    }
}
