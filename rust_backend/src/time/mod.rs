pub mod mjd;

pub use mjd::{format_mjd, ModifiedJulianDate, DAYS_PER_YEAR};
