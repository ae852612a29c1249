//! Astronomical collaborators of the prescheduler: the season-fraction model
//! and the catalogue of standard deep-drilling fields.

pub mod catalog;
pub mod season;

pub use catalog::{ddf_location, linked_partner_name, STANDARD_FIELDS};
pub use season::{ReferenceSunSeason, SeasonModel};
