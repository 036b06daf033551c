// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `LubeWatch` Sensors
//!
//! The presentation seam of the `LubeWatch` bridge:
//!
//! - [`descriptor`] - a fixed table of sensor descriptors, each a pure
//!   projection from a vehicle entry to a named value with a read-time
//!   resolved unit. Projection never causes network activity and never
//!   fails: missing source fields yield absent values.
//! - [`registry`] - the process-wide, initialize-once registry of active
//!   bridge instances, used to route write operations to whichever instance
//!   tracks the target vehicle.

pub mod descriptor;
pub mod registry;

pub use descriptor::{project, sensor, SensorDescriptor, SensorReading, UnitKind, SENSORS};
pub use registry::{InstanceRegistry, RegistryError, WriteCall};
