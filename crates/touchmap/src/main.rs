//! touchmap entry point.
//!
//! Maps touch digitizers onto the touch monitor of a multi-monitor X11
//! desktop.  With no subcommand, a full detect-and-map pass is run.
//!
//! # Usage
//!
//! ```text
//! touchmap [OPTIONS] [COMMAND]
//!
//! Commands:
//!   apply    Detect and map touch devices (default)
//!   detect   Print what would be mapped, without writing anything
//!   matrix   Print the transform for a given geometry, offline
//!
//! Options:
//!   --config    <PATH>   Config file [default: $XDG_CONFIG_HOME/touchmap/config.toml]
//!   --log-level <LEVEL>  Log level when RUST_LOG is unset
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable          | Description                              |
//! |-------------------|------------------------------------------|
//! | `TOUCHMAP_CONFIG` | Same as `--config`                       |
//! | `TOUCHMAP_LOG`    | Same as `--log-level`                    |
//! | `RUST_LOG`        | Full `tracing` filter; wins over both    |
//!
//! # Exit status
//!
//! `0` when every touch device was mapped, `1` otherwise.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use touchmap::application::detect::{detect, DetectionOptions};
use touchmap::application::gateway::{CommandGateway, DeviceProperty};
use touchmap::application::map_touch::{MapTouchUseCase, MappingReport};
use touchmap::infrastructure::gateway::{DryRunGateway, ShellCommandGateway};
use touchmap::infrastructure::storage::config::{load_config, load_config_from, AppConfig};
use touchmap_core::{parse_geometry, DeviceFilter, DisplayRecord, Geometry, VirtualScreen};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Confine X11 touchscreen digitizers to their own monitor.
#[derive(Debug, Parser)]
#[command(name = "touchmap", version)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, env = "TOUCHMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (`error`, `warn`, `info`, `debug`, `trace`).
    ///
    /// Ignored when `RUST_LOG` is set.
    #[arg(long, global = true, env = "TOUCHMAP_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Detect displays and touch devices, then map the devices.
    Apply(ApplyArgs),

    /// Detect displays and touch devices without writing anything.
    Detect {
        /// Print the detection result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Compute the transform for a display inside a virtual screen.
    Matrix {
        /// Target display geometry, e.g. `1920x1080+1080+0`.
        #[arg(long, value_parser = parse_geometry_arg)]
        display: Geometry,

        /// Virtual screen size, e.g. `3000x1920`.
        #[arg(long, value_parser = parse_screen_arg)]
        screen: VirtualScreen,
    },
}

#[derive(Debug, Default, Args)]
struct ApplyArgs {
    /// Map onto this output instead of the first landscape display.
    #[arg(long)]
    output: Option<String>,

    /// Map only the device with exactly this name.
    #[arg(long)]
    device: Option<String>,

    /// Log the property writes instead of performing them.
    #[arg(long)]
    dry_run: bool,
}

fn parse_geometry_arg(s: &str) -> Result<Geometry, String> {
    parse_geometry(s).map_err(|e| e.to_string())
}

fn parse_screen_arg(s: &str) -> Result<VirtualScreen, String> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let width = w.parse().map_err(|_| format!("invalid width {w:?}"))?;
    let height = h.parse().map_err(|_| format!("invalid height {h:?}"))?;
    Ok(VirtualScreen::new(width, height))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => load_config().context("failed to load config")?,
    };

    // `RUST_LOG` wins; otherwise --log-level, then the config file.
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.general.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Command::Apply(ApplyArgs::default())) {
        Command::Apply(args) => apply(&config, args).await,
        Command::Detect { json } => detect_only(&config, json).await,
        Command::Matrix { display, screen } => {
            let target = DisplayRecord::new("target", display);
            let matrix = screen
                .transform_for(&target)
                .context("cannot compute transform")?;
            println!("{matrix}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

async fn apply(config: &AppConfig, args: ApplyArgs) -> anyhow::Result<ExitCode> {
    let mut options = config.detection_options();
    apply_overrides(&mut options, &args);

    let shell = ShellCommandGateway::new(config.tool_paths());
    let dry_run = args.dry_run.then(|| Arc::new(DryRunGateway::new(shell.clone())));
    let gateway: Arc<dyn CommandGateway> = match &dry_run {
        Some(planner) => {
            info!("dry run: no device properties will be written");
            planner.clone()
        }
        None => Arc::new(shell),
    };

    let timeout = config.general.pass_timeout_secs.map(Duration::from_secs);
    let outcome = run_blocking(timeout, move || {
        let mut use_case = MapTouchUseCase::new(gateway, options);
        use_case.run()
    })
    .await?;

    match outcome {
        Ok(report) => {
            print_report(&report);
            if let Some(planner) = &dry_run {
                print_plan(&planner.planned());
            }
            if report.all_succeeded() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        // Already logged by the use case.
        Err(e) => {
            eprintln!("{}", e.notification());
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn detect_only(config: &AppConfig, json: bool) -> anyhow::Result<ExitCode> {
    let options = config.detection_options();
    let gateway = ShellCommandGateway::new(config.tool_paths());

    let timeout = config.general.pass_timeout_secs.map(Duration::from_secs);
    let outcome = run_blocking(timeout, move || detect(&gateway, &options)).await?;

    let detection = match outcome {
        Ok(detection) => detection,
        Err(e) => {
            error!(phase = ?e.phase(), "{}", e.notification());
            eprintln!("{}", e.notification());
            return Ok(ExitCode::FAILURE);
        }
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&detection).context("failed to encode detection")?
        );
        return Ok(ExitCode::SUCCESS);
    }

    println!("Displays:");
    for display in &detection.displays.displays {
        let marker = if display.port == detection.displays.target.port {
            "*"
        } else {
            " "
        };
        println!("  {marker} {display}");
    }
    println!(
        "Virtual screen: {} ({})",
        detection.displays.screen, detection.displays.screen_source
    );
    println!("Touch devices:");
    for device in &detection.devices {
        let main = if device.is_main { ", main" } else { "" };
        println!("    {device} [{}{main}]", device.role.as_report_word());
    }
    Ok(ExitCode::SUCCESS)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn apply_overrides(options: &mut DetectionOptions, args: &ApplyArgs) {
    if let Some(output) = &args.output {
        options.target_output = Some(output.clone());
    }
    if let Some(name) = &args.device {
        options.device_filter = DeviceFilter::Named(name.clone());
    }
}

/// Runs a blocking pass on the blocking thread pool, racing it against Ctrl+C
/// and the optional timeout.
///
/// A blocking task cannot be cancelled, so on timeout or interrupt the process
/// exits directly instead of waiting for the runtime to drain.
async fn run_blocking<T, F>(timeout: Option<Duration>, pass: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let task = tokio::task::spawn_blocking(pass);
    let finished = async {
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined.context("mapping pass panicked"),
                Err(_) => bail!("mapping pass timed out after {}s", limit.as_secs()),
            },
            None => task.await.context("mapping pass panicked"),
        }
    };

    tokio::select! {
        result = finished => match result {
            Ok(value) => Ok(value),
            Err(e) => {
                error!("{e:#}");
                std::process::exit(1);
            }
        },
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted; abandoning mapping pass");
            std::process::exit(130);
        }
    }
}

fn print_report(report: &MappingReport) {
    println!("Touch display: {} (screen {})", report.target, report.screen);
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(matrix) => println!("  mapped   {} [{matrix}]", outcome.device),
            Err(e) => println!("  FAILED   {}: {e}", outcome.device),
        }
    }
}

fn print_plan(planned: &[(u32, DeviceProperty)]) {
    println!("Planned writes (not performed):");
    for (device_id, property) in planned {
        println!("  device {device_id}: {} = {}", property.name(), property.value());
    }
}
