//! # Hoist Simulator
//!
//! Headless host for the hoist engine. Loads plant parameters from a
//! `HoistConfig` TOML (defaults when omitted), replays a scenario script and
//! prints one JSON line per sampled `PlantState` to stdout. Logs go to stderr.

use clap::Parser;
use hoist_common::config::{ConfigError, HoistConfig, LogLevel};
use hoist_common::consts::DEFAULT_CONFIG_PATH;
use hoist_common::state::PlantState;
use hoist_sim::scenario::{self, Scenario};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Hoist Simulator: deterministic hoist plant replay
#[derive(Parser, Debug)]
#[command(name = "hoist_sim")]
#[command(version)]
#[command(about = "Replay a hoist scenario and print sampled plant state as JSON lines")]
struct Args {
    /// Path to hoist configuration TOML. Falls back to `config/hoist.toml`,
    /// then to built-in defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to scenario TOML.
    #[arg(long, value_name = "FILE")]
    scenario: PathBuf,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // Config first: its log level seeds the subscriber.
    let source = config_source(&args);
    let config = match load_config(source.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            setup_tracing(&args, LogLevel::default());
            error!("FATAL: config: {e}");
            process::exit(1);
        }
    };
    setup_tracing(&args, config.shared.log_level);

    info!("Hoist Simulator v{} starting...", env!("CARGO_PKG_VERSION"));
    match &source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => info!("No config found, using plant defaults"),
    }

    if let Err(e) = run(&args, &config) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

/// `--config`, else the default path when present.
fn config_source(args: &Args) -> Option<PathBuf> {
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    match &args.config {
        Some(path) => Some(path.clone()),
        None if default_path.exists() => Some(default_path.to_path_buf()),
        None => None,
    }
}

fn load_config(source: Option<&Path>) -> Result<HoistConfig, ConfigError> {
    match source {
        Some(path) => HoistConfig::load_validated(path),
        None => Ok(HoistConfig::default()),
    }
}

fn run(args: &Args, config: &HoistConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Config OK: service={}, step={} ms, sample every {} steps",
        config.shared.service_name, config.stepping.step_ms, config.stepping.sample_every_steps
    );

    let script = Scenario::load_validated(&args.scenario)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut write_err: Option<io::Error> = None;

    let summary = scenario::run(config.plant, config.stepping, &script, |state| {
        if write_err.is_none() {
            if let Err(e) = write_sample(&mut out, state) {
                write_err = Some(e);
            }
        }
    })?;

    if let Some(e) = write_err {
        return Err(e.into());
    }
    out.flush()?;

    info!(
        "Done: {} steps, {} samples, final trip {:?}",
        summary.steps, summary.samples, summary.final_state.trip
    );
    Ok(())
}

/// One JSON line per snapshot.
fn write_sample(out: &mut impl Write, state: &PlantState) -> io::Result<()> {
    serde_json::to_writer(&mut *out, state)?;
    writeln!(out)
}

/// Filter used when `RUST_LOG` is unset: the configured level, raised to
/// DEBUG by `--verbose`.
fn default_directive(verbose: bool, level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        _ if verbose => "debug",
        other => other.as_directive(),
    }
}

fn setup_tracing(args: &Args, level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(args.verbose, level)));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}
