//! Record commands - write odometer, fuel, and reminder entries.
//!
//! Writes route through the process-wide instance registry: a coordinator
//! is initialized and registered, then the call is dispatched by vehicle
//! id. Each write triggers a follow-up refresh so the published snapshot
//! reflects the new record.

use anyhow::{Context, Result};
use clap::Args;
use lubewatch_core::{NewFuelRecord, NewOdometerRecord, NewReminder, ReminderMetric, VehicleId};
use lubewatch_fetch::Coordinator;
use lubewatch_sensors::{InstanceRegistry, WriteCall};
use std::sync::Arc;
use tracing::info;

use crate::Cli;

/// Arguments for the add-odometer command.
#[derive(Args)]
pub struct AddOdometerArgs {
    /// Target vehicle id.
    #[arg(long, short = 'V')]
    pub vehicle: VehicleId,

    /// Reading date (YYYY-MM-DD).
    #[arg(long, short)]
    pub date: String,

    /// Odometer reading value.
    #[arg(long, short)]
    pub odometer: f64,

    /// Optional notes.
    #[arg(long, default_value = "")]
    pub notes: String,

    /// Optional comma-separated tags.
    #[arg(long, default_value = "")]
    pub tags: String,
}

/// Arguments for the add-fuel command.
#[derive(Args)]
pub struct AddFuelArgs {
    /// Target vehicle id.
    #[arg(long, short = 'V')]
    pub vehicle: VehicleId,

    /// Purchase date (YYYY-MM-DD).
    #[arg(long, short)]
    pub date: String,

    /// Odometer reading at fill-up.
    #[arg(long, short)]
    pub odometer: f64,

    /// Amount of fuel added (gallons, liters, kWh, ...).
    #[arg(long)]
    pub fuel_consumed: f64,

    /// Total cost of the fuel.
    #[arg(long)]
    pub cost: f64,

    /// Mark this as a partial fill-up.
    #[arg(long)]
    pub partial: bool,

    /// Mark a previous fill-up as unrecorded.
    #[arg(long)]
    pub missed_fuel_up: bool,

    /// Optional notes.
    #[arg(long, default_value = "")]
    pub notes: String,

    /// Optional comma-separated tags.
    #[arg(long, default_value = "")]
    pub tags: String,
}

/// Arguments for the add-reminder command.
#[derive(Args)]
pub struct AddReminderArgs {
    /// Target vehicle id.
    #[arg(long, short = 'V')]
    pub vehicle: VehicleId,

    /// Reminder description (e.g. "Oil Change").
    #[arg(long)]
    pub description: String,

    /// Tracking metric (date, odometer, both).
    #[arg(long, default_value = "both")]
    pub metric: ReminderMetric,

    /// Due date (YYYY-MM-DD).
    #[arg(long)]
    pub due_date: Option<String>,

    /// Due odometer reading.
    #[arg(long)]
    pub due_odometer: Option<f64>,

    /// Optional notes.
    #[arg(long, default_value = "")]
    pub notes: String,

    /// Optional comma-separated tags.
    #[arg(long, default_value = "")]
    pub tags: String,
}

/// Runs the add-odometer command.
pub async fn run_add_odometer(args: &AddOdometerArgs, cli: &Cli) -> Result<()> {
    let mut record = NewOdometerRecord::new(args.vehicle, args.date.clone(), args.odometer);
    record.notes.clone_from(&args.notes);
    record.tags.clone_from(&args.tags);

    dispatch(cli, WriteCall::Odometer(record)).await?;
    if !cli.quiet {
        println!(
            "Recorded odometer {} for vehicle {} on {}",
            args.odometer, args.vehicle, args.date
        );
    }
    Ok(())
}

/// Runs the add-fuel command.
pub async fn run_add_fuel(args: &AddFuelArgs, cli: &Cli) -> Result<()> {
    let mut record = NewFuelRecord::new(
        args.vehicle,
        args.date.clone(),
        args.odometer,
        args.fuel_consumed,
        args.cost,
    );
    record.is_fill_to_full = !args.partial;
    record.missed_fuel_up = args.missed_fuel_up;
    record.notes.clone_from(&args.notes);
    record.tags.clone_from(&args.tags);

    dispatch(cli, WriteCall::Fuel(record)).await?;
    if !cli.quiet {
        println!(
            "Recorded fuel purchase ({} @ {}) for vehicle {} on {}",
            args.fuel_consumed, args.cost, args.vehicle, args.date
        );
    }
    Ok(())
}

/// Runs the add-reminder command.
pub async fn run_add_reminder(args: &AddReminderArgs, cli: &Cli) -> Result<()> {
    let mut reminder = NewReminder::new(args.vehicle, args.description.clone());
    reminder.metric = args.metric;
    reminder.due_date.clone_from(&args.due_date);
    reminder.due_odometer = args.due_odometer;
    reminder.notes.clone_from(&args.notes);
    reminder.tags.clone_from(&args.tags);

    dispatch(cli, WriteCall::Reminder(reminder)).await?;
    if !cli.quiet {
        println!(
            "Added reminder \"{}\" for vehicle {}",
            args.description, args.vehicle
        );
    }
    Ok(())
}

/// Initializes a coordinator, registers it, and routes the call by
/// vehicle id through the global registry.
async fn dispatch(cli: &Cli, call: WriteCall) -> Result<()> {
    let config = cli.bridge_config()?;
    let client = lubewatch_fetch::LubeLoggerClient::new(&config)?;
    let coordinator = Arc::new(Coordinator::new(client, config.scan_interval()));
    coordinator
        .initialize()
        .await
        .context("initial refresh failed")?;
    InstanceRegistry::global().register(coordinator);

    info!(
        vehicle_id = call.vehicle_id(),
        operation = call.operation(),
        "Dispatching write"
    );
    InstanceRegistry::global()
        .dispatch(call)
        .await
        .context("write call failed")?;
    Ok(())
}
