//! Simulation driver that records slitwave engine runs into a frame store.
//!
//! [`SimulationDriver::run`] advances a [`FieldEngine`](slitwave_core::FieldEngine)
//! in fixed increments and writes one snapshot per increment.
//! [`record`] wraps a run with the store lifecycle: recreate the store,
//! run, close, and delete the partial store if anything fails.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod error;
pub mod record;

pub use config::DriverConfig;
pub use driver::{RunReport, SimulationDriver};
pub use error::{RunError, RunStage};
pub use record::record;
