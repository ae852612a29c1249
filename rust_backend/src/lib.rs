//! Offline prescheduling of deep-drilling-field (DDF) observation sequences.
//!
//! Given a per-field visibility grid and a seasonal cadence configuration,
//! the crate chooses the nights each field is observed, the best time within
//! each of those nights, and expands them into per-band visit records for a
//! real-time scheduler.
//!
//! # Example
//!
//! ```no_run
//! use ddf_presched::config::SchedulerConfig;
//! use ddf_presched::io::loaders::GridLoader;
//! use ddf_presched::preprocessing::PreschedPipeline;
//! use std::path::Path;
//!
//! let grid = GridLoader::load_from_file(Path::new("ddf_grid.json")).unwrap();
//! let result = PreschedPipeline::new()
//!     .run(&SchedulerConfig::default_ddfs(), &grid)
//!     .unwrap();
//! println!("{} records", result.records.len());
//! ```

pub mod algorithms;
pub mod astro;
pub mod config;
pub mod core;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod time;

#[cfg(feature = "python")]
pub mod python;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// DDF prescheduler Python module
#[cfg(feature = "python")]
#[pymodule]
fn ddf_presched(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(python::match_cumulative, m)?)?;
    m.add_function(wrap_pyfunction!(python::generate_ddf_scheduled_obs, m)?)?;
    m.add_function(wrap_pyfunction!(python::scheduled_obs_checksum, m)?)?;
    m.add_class::<python::PyObservationRecord>()?;
    Ok(())
}
