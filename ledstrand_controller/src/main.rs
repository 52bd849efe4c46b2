//! # ledstrand Binary
//!
//! Loads and validates the LED strand configuration, then replays
//! message-bus traffic read from stdin against the channel controller.
//!
//! # Usage
//!
//! ```bash
//! # Validate a configuration and print the topic map
//! ledstrand --config config/ledstrand.toml --check
//!
//! # Same, as JSON
//! ledstrand --config config/ledstrand.toml --check --json
//!
//! # Replay messages: one "<topic> <payload>" per line
//! echo "home/topic_name/set ON" | ledstrand -c config/ledstrand.toml -v
//! ```

#![deny(warnings)]

use clap::Parser;
use ledstrand_common::prelude::*;
use ledstrand_controller::controller::Controller;
use std::io::BufRead;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Interval between duty snapshots while a fade settles after input ends.
const SETTLE_INTERVAL: Duration = Duration::from_millis(250);

/// ledstrand - MQTT N-channel LED strand controller
#[derive(Parser, Debug)]
#[command(name = "ledstrand")]
#[command(version)]
#[command(about = "MQTT N-channel LED strand controller")]
#[command(long_about = None)]
struct Args {
    /// Path to the settings file (ledstrand.toml). Built-in sample
    /// settings are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Validate the configuration, print the topic map and exit
    #[arg(long)]
    check: bool,

    /// Enable verbose logging (overrides shared.log_level)
    #[arg(short, long)]
    verbose: bool,

    /// Output logs (and the --check topic map) in JSON format
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(e) = run() {
        error!("ledstrand failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let loaded = match args.config {
        Some(ref path) => load_settings(path),
        None => SettingsFile::default().validate(),
    };

    let configured_level = loaded
        .as_ref()
        .map(|settings| settings.shared().log_level)
        .unwrap_or_default();
    setup_tracing(&args, configured_level);

    let settings = loaded?;

    info!(
        "{} v{} starting ({})",
        settings.shared().service_name,
        env!("CARGO_PKG_VERSION"),
        match args.config {
            Some(ref path) => path.display().to_string(),
            None => "built-in sample settings".to_string(),
        }
    );
    info!(
        "WiFi '{}', broker {} ({})",
        settings.wifi().ssid,
        settings.broker().address(),
        if settings.broker().is_anonymous() {
            "anonymous"
        } else {
            settings.broker().username()
        }
    );

    let controller = Controller::new(&settings);

    if args.check {
        print_topic_map(&controller, &settings, args.json)?;
        return Ok(());
    }

    replay_stdin(controller)
}

/// Log (or print as JSON) every state/command topic pair.
fn print_topic_map(
    controller: &Controller<'_>,
    settings: &LedSettings,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let entries = controller.topics().entries(settings);
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    for entry in &entries {
        match (entry.channel, entry.pin) {
            (Some(channel), Some(pin)) => info!(
                "channel {channel} (GPIO{pin}): state '{}', command '{}'",
                entry.state, entry.command
            ),
            _ => info!("root: state '{}', command '{}'", entry.state, entry.command),
        }
    }
    info!(
        "ramp coefficient {}, default transition {} ms, commands '{}'/'{}'",
        settings.transition().ramp_coefficient(),
        settings.transition().default_transition_ms(),
        settings.commands().on,
        settings.commands().off,
    );
    Ok(())
}

/// Apply "<topic> <payload>" lines from stdin until EOF, then let running
/// fades settle.
fn replay_stdin(mut controller: Controller<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let now_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    info!("Subscribed to {:?}", controller.topics().subscriptions());
    for publication in controller.state_publications() {
        info!("publish {} {}", publication.topic, publication.payload);
    }

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((topic, payload)) = line.split_once(char::is_whitespace) else {
            warn!("Ignoring line without payload: '{line}'");
            continue;
        };

        let now = now_ms();
        match controller.handle(topic, payload, now) {
            Ok(publications) => {
                for publication in publications {
                    info!("publish {} {}", publication.topic, publication.payload);
                }
                debug!("duty {:?}", controller.render(now));
            }
            Err(e) => warn!("Ignoring message on '{topic}': {e}"),
        }
    }

    while controller.is_animating(now_ms()) {
        std::thread::sleep(SETTLE_INTERVAL);
        debug!("duty {:?}", controller.render(now_ms()));
    }
    info!("Settled, duty {:?}", controller.render(now_ms()));
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and configured level.
/// Logs go to stderr so `--check --json` output stays parseable.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::from(configured)
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
