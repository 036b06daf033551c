// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `LubeWatch` Fetch
//!
//! HTTP client, snapshot aggregator, and refresh coordinator for the
//! `LubeWatch` bridge.
//!
//! Data flows one direction per cycle: the [`Coordinator`] triggers the
//! [`Aggregator`], which drives [`VehicleApi`] calls and returns a
//! [`RefreshOutcome`]; the coordinator then publishes the new snapshot or
//! preserves the prior one, and consumers read the published view without
//! ever causing network activity.
//!
//! ## Modules
//!
//! - [`client`] - [`LubeLoggerClient`], the authenticated `reqwest` wrapper
//! - [`api`] - [`VehicleApi`], the seam trait the aggregator is generic over
//! - [`aggregator`] - one refresh cycle: list, fetch details, merge, classify
//! - [`coordinator`] - timing, single-flight, and the published snapshot
//! - [`error`] - the three-way error taxonomy ([`FetchError`])

pub mod aggregator;
pub mod api;
pub mod client;
pub mod coordinator;
pub mod error;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{Aggregator, RefreshOutcome};
pub use api::VehicleApi;
pub use client::LubeLoggerClient;
pub use coordinator::{Coordinator, FleetInstance};
pub use error::FetchError;
