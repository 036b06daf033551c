// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `LubeWatch` Core
//!
//! Core types, models, and configuration for the `LubeWatch` bridge.
//!
//! This crate provides the foundational abstractions used across all other
//! `LubeWatch` crates, including:
//!
//! - Domain models (vehicles, fleet snapshots, reminders, fuel records)
//! - Write-operation payloads for the remote API
//! - Bridge status reporting
//! - Configuration types
//!
//! ## Key Types
//!
//! ### Snapshot Types
//! - [`FleetSnapshot`] - Immutable per-cycle view of the whole fleet
//! - [`VehicleEntry`] - Merged summary + detail fields for one vehicle
//! - [`VehicleId`] - Opaque vehicle identifier assigned by the server
//!
//! ### Record Types
//! - [`Reminder`] - Upcoming maintenance reminder parsed from vehicle detail
//! - [`FuelRecord`] - Last fuel purchase parsed from vehicle detail
//! - [`NewOdometerRecord`], [`NewFuelRecord`], [`NewReminder`] - Write payloads
//!
//! ### Status & Config
//! - [`BridgeStatus`] - Coordinator state visible to consumers
//! - [`BridgeConfig`] - Connection and display configuration
//! - [`UnitContext`] - Read-time unit resolution (currency, distance)

pub mod config;
pub mod error;
pub mod models;

// Re-export error type
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Snapshot types
    FleetSnapshot,
    VehicleEntry,
    VehicleId,
    VehicleSummary,
    // Record types
    FuelRecord,
    NewFuelRecord,
    NewOdometerRecord,
    NewReminder,
    Reminder,
    ReminderMetric,
    // Status
    BridgeStatus,
};

// Re-export configuration types
pub use config::{BridgeConfig, DistanceUnit, UnitContext};
