//! Vehicles command - list the fleet from a fresh snapshot.

use anyhow::Result;
use lubewatch_fetch::Aggregator;
use tracing::info;

use crate::output::TextFormatter;
use crate::{Cli, OutputFormat};

/// Runs the vehicles command.
pub async fn run(cli: &Cli) -> Result<()> {
    let aggregator = Aggregator::new(super::client(cli)?);
    info!("Fetching fleet snapshot");
    let snapshot = super::snapshot_once(&aggregator).await?;

    match cli.format {
        OutputFormat::Json => {
            let json = if cli.pretty {
                serde_json::to_string_pretty(&snapshot)?
            } else {
                serde_json::to_string(&snapshot)?
            };
            println!("{json}");
        }
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            print!("{}", formatter.format_fleet(&snapshot));
        }
    }

    Ok(())
}
