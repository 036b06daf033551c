//! Sensors command - project derived values for one vehicle.

use anyhow::{bail, Result};
use clap::Args;
use lubewatch_core::VehicleId;
use lubewatch_fetch::Aggregator;
use lubewatch_sensors::project;

use crate::output::TextFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the sensors command.
#[derive(Args)]
pub struct SensorsArgs {
    /// Vehicle id to project.
    #[arg(long, short = 'V')]
    pub vehicle: VehicleId,
}

/// Runs the sensors command.
pub async fn run(args: &SensorsArgs, cli: &Cli) -> Result<()> {
    let config = cli.bridge_config()?;
    let units = config.unit_context();
    let aggregator = Aggregator::new(lubewatch_fetch::LubeLoggerClient::new(&config)?);
    let snapshot = super::snapshot_once(&aggregator).await?;

    let Some(entry) = snapshot.get(args.vehicle) else {
        bail!("vehicle {} is not tracked by this instance", args.vehicle);
    };
    let readings = project(entry, &units);

    match cli.format {
        OutputFormat::Json => {
            let json = if cli.pretty {
                serde_json::to_string_pretty(&readings)?
            } else {
                serde_json::to_string(&readings)?
            };
            println!("{json}");
        }
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", entry.display_name());
            print!("{}", formatter.format_readings(&readings));
        }
    }

    Ok(())
}
