//! `rovos-cli` – RovOS drive binary.
//!
//! This binary is the ignition switch for the vehicle stack.  It:
//!
//! 1. Checks for `~/.rovos/config.toml`; writes the tuned defaults on first
//!    run.
//! 2. Loads and validates the trained network description (a fatal
//!    `InvalidTopology` aborts here, before the tick loop ever starts).
//! 3. Opens the serial link to the motor controller and connects to the
//!    telemetry peer.
//! 4. Intercepts **Ctrl-C** to stop the tick loop between ticks and release
//!    both transports.

mod config;

use std::fs;
use std::io::BufReader;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use tracing::{error, info, warn};

use rovos_link::{LineLink, TcpTelemetry};
use rovos_net::{NetworkDescription, NetworkModel};
use rovos_runtime::TickLoop;
use rovos_types::RoverError;

fn main() -> ExitCode {
    // ── Structured logging ────────────────────────────────────────────────
    // Initialise tracing-subscriber using RUST_LOG (defaults to "info").
    // Set ROVOS_LOG_FORMAT=json to emit newline-delimited JSON logs suitable
    // for log aggregators.  User-facing output still uses println! for UX
    // consistency.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("ROVOS_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let cfg = config::Config::default();
            match config::save(&cfg) {
                Ok(()) => println!(
                    "  First run: defaults written to {}",
                    config::config_path().display().to_string().bold()
                ),
                Err(e) => warn!(error = %e, "could not persist default config"),
            }
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            return ExitCode::FAILURE;
        }
    };

    // ── Shared shutdown flag ──────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!(
            "{}",
            "⚠  Ctrl-C received – stopping after the current tick …"
                .yellow()
                .bold()
        );
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; graceful shutdown on Ctrl-C will not be available");
    }

    match drive(&cfg, &shutdown) {
        Ok(()) => {
            println!("{}", "  ✓ Transports released. Exiting RovOS.".green());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "drive loop aborted");
            println!("{}: {}", "Fatal".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Wire the transports and run the tick loop until shutdown.
fn drive(cfg: &config::Config, shutdown: &AtomicBool) -> Result<(), RoverError> {
    // Fatal before the loop: a malformed network must never drive motors.
    let model = load_network(&cfg.network_path)?;
    println!(
        "  Network: {} neurons ({} inputs, {} outputs)",
        model.len().to_string().bold(),
        model.input_count(),
        model.output_count()
    );

    // The serial device node is opened once, read+write; the handle is
    // split into a frame-reading half and a command-writing half.
    let device = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(&cfg.serial_device)
        .map_err(|e| RoverError::LinkFault {
            endpoint: cfg.serial_device.clone(),
            details: format!("open failed: {e}"),
        })?;
    let write_half = device.try_clone().map_err(|e| RoverError::LinkFault {
        endpoint: cfg.serial_device.clone(),
        details: format!("handle clone failed: {e}"),
    })?;
    let frames_in = LineLink::new(
        BufReader::new(device),
        std::io::sink(),
        cfg.serial_device.clone(),
    );
    let commands_out = LineLink::new(
        BufReader::new(std::io::empty()),
        write_half,
        cfg.serial_device.clone(),
    );
    info!(device = %cfg.serial_device, "serial link open");

    let telemetry = TcpTelemetry::connect(&cfg.telemetry_addr)?;

    let mut tick_loop = TickLoop::new(
        model,
        &cfg.drive,
        Box::new(frames_in),
        Box::new(commands_out),
        Box::new(telemetry),
    )?;

    println!("{}", "  ▶ Drive loop running (Ctrl-C to stop).".green());
    tick_loop.run(shutdown)
}

/// Load and validate the trained network description.
fn load_network(path: &str) -> Result<Arc<NetworkModel>, RoverError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| RoverError::Config(format!("cannot read network file {path}: {e}")))?;
    let description: NetworkDescription = serde_json::from_str(&raw)
        .map_err(|e| RoverError::Config(format!("cannot parse network file {path}: {e}")))?;
    Ok(Arc::new(NetworkModel::new(description)?))
}

fn print_banner() {
    println!();
    println!("{}", "  RovOS – neural drive core".bold());
    println!("  {}", "sense → filter → evaluate → decide → act".dimmed());
    println!();
}
