//! Parsers for prescheduler input formats.
//!
//! - [`grid_parser`]: columnar JSON visibility grid
//! - [`survey_parser`]: JSON survey table
//!
//! # Example
//!
//! ```no_run
//! use ddf_presched::parsing::grid_parser::parse_grid_str;
//!
//! let json = std::fs::read_to_string("ddf_grid.json").unwrap();
//! let grid = parse_grid_str(&json).expect("Failed to parse grid");
//! println!("{} samples", grid.len());
//! ```

pub mod grid_parser;
pub mod survey_parser;


pub use grid_parser::{parse_grid_str, FieldColumns, VisibilityGrid};
pub use survey_parser::{parse_survey_table, parse_survey_table_str};
