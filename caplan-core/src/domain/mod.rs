//! Domain types for route-level capacity planning.
//!
//! Every record here is immutable reference data handed to the core by the
//! loading layer. Numeric fields are already coerced; the core never
//! re-validates types.

pub mod demand;
pub mod execution;
pub mod flight;
pub mod plan;

pub use demand::{DemandObservation, ForecastRecord};
pub use execution::{ExecutionActual, ExecutionRecord};
pub use flight::FlightProfile;
pub use plan::{BusinessPlanEntry, WeeklyPlanEntry};
