//! Check command - verify connectivity and credentials.

use anyhow::Result;
use lubewatch_fetch::FetchError;
use serde_json::json;

use crate::{Cli, ExitCode, OutputFormat};

/// Runs the check command.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = cli.bridge_config()?;
    let client = lubewatch_fetch::LubeLoggerClient::new(&config)?;
    let outcome = client.vehicles().await;

    match cli.format {
        OutputFormat::Json => {
            let report = json!({
                "url": config.base_url,
                "reachable": outcome.is_ok(),
                "error": outcome.as_ref().err().map(ToString::to_string),
            });
            println!("{report}");
        }
        OutputFormat::Text => match &outcome {
            Ok(vehicles) => println!(
                "✓ {} is reachable ({} vehicles tracked)",
                config.base_url,
                vehicles.len()
            ),
            Err(err) if err.is_auth() => {
                println!("✗ {} rejected the credentials", config.base_url);
            }
            Err(err) => println!("✗ {} is unreachable: {err}", config.base_url),
        },
    }

    if let Err(err) = outcome {
        std::process::exit(exit_code(&err) as i32);
    }
    Ok(())
}

/// Maps a failed check to its exit code: rejected credentials and an
/// unreachable instance are distinct outcomes for scripts.
fn exit_code(err: &FetchError) -> ExitCode {
    if err.is_auth() {
        ExitCode::AuthRequired
    } else {
        ExitCode::Unreachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_rejection_maps_to_auth_exit_code() {
        let err = FetchError::Auth("credentials rejected".to_string());
        assert_eq!(exit_code(&err), ExitCode::AuthRequired);
    }

    #[test]
    fn test_transport_failures_map_to_unreachable() {
        let connection = FetchError::Connection("connection reset".to_string());
        let api = FetchError::Api("unexpected status: 500".to_string());
        assert_eq!(exit_code(&connection), ExitCode::Unreachable);
        assert_eq!(exit_code(&api), ExitCode::Unreachable);
    }
}
