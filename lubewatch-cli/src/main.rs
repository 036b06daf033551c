// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! LubeWatch CLI - LubeLogger vehicle maintenance monitoring from the
//! command line.
//!
//! # Examples
//!
//! ```bash
//! # List vehicles with their cost totals
//! lubewatch --url http://lube.local --username me --password secret vehicles
//!
//! # Project all sensors for one vehicle, labelled in kilometers
//! lubewatch sensors --vehicle 3 --distance-unit km
//!
//! # Keep a live view, refreshing every 30 minutes
//! lubewatch watch
//!
//! # Record a fill-up and refresh the snapshot
//! lubewatch add-fuel --vehicle 3 --date 2026-08-30 --odometer 50210 \
//!     --fuel-consumed 11.2 --cost 42.00
//!
//! # Verify connectivity and credentials
//! lubewatch check
//! ```

mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lubewatch_core::BridgeConfig;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{check, records, sensors, vehicles, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// LubeWatch CLI - LubeLogger vehicle maintenance monitoring.
#[derive(Parser)]
#[command(name = "lubewatch")]
#[command(about = "LubeLogger vehicle maintenance monitoring CLI")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'vehicles' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the LubeLogger instance (or LUBEWATCH_URL).
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Username for Basic auth (or LUBEWATCH_USERNAME).
    #[arg(long, short, global = true)]
    pub username: Option<String>,

    /// Password for Basic auth (or LUBEWATCH_PASSWORD).
    #[arg(long, short, global = true)]
    pub password: Option<String>,

    /// Path to a JSON bridge configuration file.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Distance unit label for odometer values (miles, km).
    #[arg(long, global = true)]
    pub distance_unit: Option<lubewatch_core::DistanceUnit>,

    /// Currency label for cost values.
    #[arg(long, global = true)]
    pub currency: Option<String>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List vehicles from a fresh snapshot (default if no command given).
    #[command(visible_alias = "v")]
    Vehicles,

    /// Project sensor values for one vehicle.
    #[command(visible_alias = "s")]
    Sensors(sensors::SensorsArgs),

    /// Watch the fleet, refreshing on a fixed interval.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// Add an odometer record.
    AddOdometer(records::AddOdometerArgs),

    /// Add a fuel purchase record.
    AddFuel(records::AddFuelArgs),

    /// Add a maintenance reminder.
    AddReminder(records::AddReminderArgs),

    /// Check connectivity and credentials.
    Check,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// Credentials rejected; re-entry required.
    AuthRequired = 2,
    /// Instance unreachable.
    Unreachable = 3,
}

// ============================================================================
// Configuration Resolution
// ============================================================================

impl Cli {
    /// Resolves the bridge configuration: flags win over environment
    /// variables, which win over the configuration file.
    pub fn bridge_config(&self) -> Result<BridgeConfig> {
        let url = self
            .url
            .clone()
            .or_else(|| std::env::var("LUBEWATCH_URL").ok());
        let username = self
            .username
            .clone()
            .or_else(|| std::env::var("LUBEWATCH_USERNAME").ok());
        let password = self
            .password
            .clone()
            .or_else(|| std::env::var("LUBEWATCH_PASSWORD").ok());

        let mut config = match &self.config {
            Some(path) => {
                let mut config = BridgeConfig::load_from(path)
                    .with_context(|| format!("failed to load config from {}", path.display()))?;
                // Flags and env still win over file contents.
                if let Some(url) = url {
                    config.base_url = url;
                }
                if let Some(username) = username {
                    config.username = username;
                }
                if let Some(password) = password {
                    config.password = password;
                }
                config
            }
            None => {
                let url =
                    url.context("no base URL: pass --url, set LUBEWATCH_URL, or use --config")?;
                BridgeConfig::new(
                    url,
                    username.unwrap_or_default(),
                    password.unwrap_or_default(),
                )
            }
        };

        if let Some(unit) = self.distance_unit {
            config.distance_unit = unit;
        }
        if let Some(currency) = &self.currency {
            config.currency = currency.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

/// Builds the log filter. Library crates are separate targets
/// (`lubewatch_core`, `lubewatch_fetch`, `lubewatch_sensors`) and need
/// their own directives; a `lubewatch=` prefix alone never matches them.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(
            "lubewatch=debug,lubewatch_core=debug,lubewatch_fetch=debug,lubewatch_sensors=debug,info",
        )
    } else {
        EnvFilter::new(
            "lubewatch=warn,lubewatch_core=warn,lubewatch_fetch=warn,lubewatch_sensors=warn",
        )
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(log_filter(verbose))
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Vehicles) | None => vehicles::run(&cli).await,
        Some(Commands::Sensors(args)) => sensors::run(args, &cli).await,
        Some(Commands::Watch(args)) => watch::run(args, &cli).await,
        Some(Commands::AddOdometer(args)) => records::run_add_odometer(args, &cli).await,
        Some(Commands::AddFuel(args)) => records::run_add_fuel(args, &cli).await,
        Some(Commands::AddReminder(args)) => records::run_add_reminder(args, &cli).await,
        Some(Commands::Check) => check::run(&cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        let code = e
            .downcast_ref::<lubewatch_fetch::FetchError>()
            .map_or(ExitCode::Error, |err| match err {
                lubewatch_fetch::FetchError::Auth(_) => ExitCode::AuthRequired,
                lubewatch_fetch::FetchError::Connection(_) => ExitCode::Unreachable,
                _ => ExitCode::Error,
            });
        std::process::exit(code as i32);
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("lubewatch-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_flags_override_config_file() {
        let path = temp_config(
            "flags-win.json",
            r#"{"base_url":"http://from-file.local","username":"fileuser","password":"filepass"}"#,
        );

        let cli = Cli::parse_from([
            "lubewatch",
            "--config",
            path.to_str().unwrap(),
            "--url",
            "http://from-flag.local",
            "--password",
            "flagpass",
            "vehicles",
        ]);
        let config = cli.bridge_config().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.base_url, "http://from-flag.local");
        assert_eq!(config.password, "flagpass");
        // Fields without a flag keep their file values.
        assert_eq!(config.username, "fileuser");
    }

    #[test]
    fn test_config_file_alone_is_sufficient() {
        let path = temp_config(
            "file-only.json",
            r#"{"base_url":"http://lube.local","username":"u","password":"p","currency":"EUR"}"#,
        );

        let cli = Cli::parse_from(["lubewatch", "--config", path.to_str().unwrap(), "vehicles"]);
        let config = cli.bridge_config().unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.base_url, "http://lube.local");
        assert_eq!(config.currency, "EUR");
    }

    #[test]
    fn test_log_filter_covers_library_crates() {
        let filter = log_filter(false).to_string();
        assert!(filter.contains("lubewatch_core=warn"));
        assert!(filter.contains("lubewatch_fetch=warn"));
        assert!(filter.contains("lubewatch_sensors=warn"));

        let verbose = log_filter(true).to_string();
        assert!(verbose.contains("lubewatch_fetch=debug"));
    }
}
