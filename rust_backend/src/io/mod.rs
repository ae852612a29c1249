//! Loading inputs and writing results.
//!
//! Loaders wrap the parsers with file handling and `anyhow` context; the
//! writer serialises emitted records and fingerprints them.
//!
//! # Example
//!
//! ```no_run
//! use ddf_presched::io::loaders::GridLoader;
//! use std::path::Path;
//!
//! let grid = GridLoader::load_from_file(Path::new("ddf_grid.json"))
//!     .expect("Failed to load");
//! println!("Loaded {} samples", grid.len());
//! ```

pub mod checksum;
pub mod loaders;

#[cfg(test)]
mod loaders_tests;

pub use checksum::{calculate_checksum, record_checksum};
pub use loaders::{generate_from_files, ConfigLoader, GridLoader, RecordWriter};
