//! Watch command - live fleet view over a running coordinator.

use anyhow::{Context, Result};
use clap::Args;
use lubewatch_fetch::Coordinator;
use lubewatch_sensors::InstanceRegistry;
use std::io::{stdout, Write};
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::info;

use crate::output::TextFormatter;
use crate::Cli;

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Refresh interval in seconds (defaults to the configured scan
    /// interval, 30 minutes).
    #[arg(long, short)]
    pub interval: Option<u64>,

    /// Redraw interval in seconds.
    #[arg(long, default_value = "10")]
    pub redraw: u64,
}

/// Runs the watch command.
pub async fn run(args: &WatchArgs, cli: &Cli) -> Result<()> {
    let config = cli.bridge_config()?;
    let scan_interval = args
        .interval
        .map_or_else(|| config.scan_interval(), Duration::from_secs);

    info!(interval_secs = scan_interval.as_secs(), "Starting watch mode");

    let client = lubewatch_fetch::LubeLoggerClient::new(&config)?;
    let coordinator = Arc::new(Coordinator::new(client, scan_interval));
    coordinator
        .initialize()
        .await
        .context("initial refresh failed")?;

    InstanceRegistry::global().register(coordinator.clone());
    tokio::spawn(coordinator.clone().run());

    let formatter = TextFormatter::new(!cli.no_color);
    let mut redraw = interval(Duration::from_secs(args.redraw.max(1)));

    loop {
        redraw.tick().await;

        // Clear screen
        print!("\x1b[2J\x1b[H");

        let now = chrono::Local::now();
        println!(
            "LubeWatch - {} (refresh: {}s)",
            now.format("%H:%M:%S"),
            scan_interval.as_secs()
        );
        println!("{}", "─".repeat(60));

        println!(
            "{}",
            formatter.format_status(coordinator.status(), coordinator.last_error().as_deref())
        );
        for (vehicle_id, warning) in coordinator.warnings() {
            println!("  warning: vehicle {vehicle_id}: {warning}");
        }
        println!();

        if let Some(snapshot) = coordinator.snapshot() {
            print!("{}", formatter.format_fleet(&snapshot));
            println!();
            println!("Snapshot from {}", snapshot.fetched_at.format("%H:%M:%S"));
        }
        println!("Press Ctrl+C to exit");
        stdout().flush()?;
    }
}
