//! Python bindings, built with the `python` feature.
//!
//! - [`loaders`]: end-to-end generation from grid and configuration files
//! - [`algorithms`]: the cumulative matcher on plain lists
//! - [`records`]: the `ObservationRecord` class
//!
//! All functions are available in the `ddf_presched` Python module after
//! installation.

pub mod algorithms;
pub mod loaders;
pub mod records;

pub use algorithms::*;
pub use loaders::*;
pub use records::*;
