//! Pinscroll CLI
//!
//! Run headless section scenarios and inspect platform profiles.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pinscroll_app::{run_loaded_scenario, PinScenario, ReportStatus};
use pinscroll_platform::{PinStrategy, PlatformProfile};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{PinscrollConfig, CONFIG_FILE};

const EXAMPLE_SCENARIO: &str = include_str!("../templates/example_scenario.json");

#[derive(Parser)]
#[command(name = "pinscroll")]
#[command(author, version, about = "Pinned horizontal-scroll section toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario against a headless page
    Run {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Config file or directory containing pinscroll.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the JSON report to this (relative) path instead of stdout
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Override the logical frame interval
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Force a pin strategy (fixed, transform, native)
        #[arg(long)]
        strategy: Option<PinStrategy>,
    },

    /// Write a pinscroll.toml and an example scenario
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Show the platform profile detected for a user agent
    Inspect {
        /// User-agent string
        #[arg(long)]
        user_agent: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Respects RUST_LOG; --verbose raises the default to debug
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            config,
            report,
            tick_ms,
            strategy,
        } => cmd_run(&scenario, config.as_deref(), report, tick_ms, strategy),
        Commands::Init { path } => {
            cmd_init(&path)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Inspect { user_agent } => {
            cmd_inspect(&user_agent)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_run(
    scenario_path: &Path,
    config_path: Option<&Path>,
    report_path: Option<PathBuf>,
    tick_ms: Option<u64>,
    strategy: Option<PinStrategy>,
) -> Result<ExitCode> {
    let config = match config_path {
        Some(path) => PinscrollConfig::load_from_dir(path)?,
        None => PinscrollConfig::discover(Path::new("."))?,
    };

    let mut scenario = PinScenario::from_path(scenario_path)?;
    if strategy.is_some() {
        scenario.strategy = strategy;
    }

    let mut run_config = config.run.run_config();
    if let Some(tick_ms) = tick_ms {
        run_config.tick_ms = tick_ms;
    }

    info!("Running {}", scenario_path.display());
    let outcome = run_loaded_scenario(&scenario, run_config, &config.section)?;
    let report = outcome.report();

    match report_path.or_else(|| config.run.report.as_ref().map(PathBuf::from)) {
        Some(path) => {
            report
                .write_to_path(&path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => report.write_to_writer(&mut std::io::stdout().lock())?,
    }

    match report.status {
        ReportStatus::Passed => {
            info!(
                frames = report.elapsed_frames,
                recoveries = report.total_recoveries(),
                "scenario passed"
            );
            Ok(ExitCode::SUCCESS)
        }
        ReportStatus::Failed => {
            tracing::error!(
                step = report.failed_step_index,
                assertion = report.assertion.as_deref(),
                message = report.message.as_deref(),
                "scenario failed"
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_init(path: &Path) -> Result<()> {
    let config_path = path.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    fs::create_dir_all(path.join("scenarios"))
        .with_context(|| format!("Failed to create {}", path.display()))?;
    fs::write(&config_path, PinscrollConfig::new().to_toml()?)?;
    fs::write(path.join("scenarios/example.json"), EXAMPLE_SCENARIO)?;

    info!("Created {}", config_path.display());
    info!("Try: pinscroll run scenarios/example.json");
    Ok(())
}

fn cmd_inspect(user_agent: &str) -> Result<()> {
    let profile = PlatformProfile::detect(user_agent);
    let config = PinscrollConfig::discover(Path::new("."))?;
    let section = &config.section;

    let summary = serde_json::json!({
        "profile": profile,
        "effective": {
            "strategy": section.strategy_for(&profile),
            "resize_quiet_ms": section.resize_quiet_for(&profile),
            "stuck_guard": section.stuck_guard.is_enabled(&profile),
            "seek_duration_ms": section.seek_duration_ms,
        },
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
