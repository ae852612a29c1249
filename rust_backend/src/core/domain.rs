//! Domain models for deep-drilling-field prescheduling.
//!
//! This module provides the data structures shared by every pipeline stage:
//! ephemeris samples, nights, the two distinct notions of "season", sky
//! positions, bands and the emitted observation records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::time::ModifiedJulianDate;

/// One ephemeris sample of the visibility grid for a single field.
///
/// Samples are supplied in time order and are roughly evenly spaced within
/// a night. `sky_brightness` and `depth` are `None` when the ephemeris
/// could not compute them.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStep {
    pub mjd: ModifiedJulianDate,
    pub sun_alt: qtty::Degrees,
    pub airmass: f64,
    pub sky_brightness: Option<f64>,
    pub depth: Option<f64>,
    pub night: i64,
}

impl TimeStep {
    /// Depth value usable for ranking, `None` if missing or non-finite.
    pub fn valid_depth(&self) -> Option<f64> {
        self.depth.filter(|d| d.is_finite())
    }
}

/// A night of the grid: every time step sharing one night index.
///
/// The night is represented by its first time step's timestamp for season
/// and rate purposes.
#[derive(Debug, Clone, PartialEq)]
pub struct Night {
    pub index: i64,
    pub mjd: ModifiedJulianDate,
    /// Positions of this night's steps in the field's step sequence, in
    /// time order.
    pub steps: Vec<usize>,
}

/// Continuous season value of a night, relative to the survey start.
///
/// The integer part is the season index (negative for the partial season in
/// progress when the survey starts); the fractional part runs from 0 (sun in
/// conjunction with the field) to 1 once per year. Only used for rate
/// shaping; never confuse with [`SeasonBucket`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonFraction(pub f64);

impl SeasonFraction {
    /// Season index, `floor` of the value.
    pub fn index(&self) -> i64 {
        self.0.floor() as i64
    }

    /// Position within the annual cycle, in `[0, 1)`.
    pub fn phase(&self) -> f64 {
        self.0.rem_euclid(1.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Gap-detected group of already chosen observation nights (1-based).
///
/// Used only to index visit-count and season-length tables when records are
/// emitted. Computed from chosen times, not from [`SeasonFraction`], so the
/// two may disagree near season boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonBucket(pub u32);

impl SeasonBucket {
    pub const FIRST: SeasonBucket = SeasonBucket(1);

    pub fn next(self) -> SeasonBucket {
        SeasonBucket(self.0 + 1)
    }

    /// Look up the per-bucket entry of `table`, clamping to the last entry.
    /// Returns `None` only for an empty table.
    pub fn lookup<'a, T>(&self, table: &'a [T]) -> Option<&'a T> {
        let position = (self.0.max(1) - 1) as usize;
        table.get(position).or_else(|| table.last())
    }
}

impl fmt::Display for SeasonBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Equatorial sky position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    pub ra: qtty::Degrees,
    pub dec: qtty::Degrees,
}

impl SkyPosition {
    pub fn new(ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            ra: qtty::Degrees::new(ra_deg),
            dec: qtty::Degrees::new(dec_deg),
        }
    }
}

/// Photometric band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    U,
    G,
    R,
    I,
    Z,
    Y,
}

impl Band {
    /// All bands in emission order.
    pub const ALL: [Band; 6] = [Band::U, Band::G, Band::R, Band::I, Band::Z, Band::Y];

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::U => "u",
            Band::G => "g",
            Band::R => "r",
            Band::I => "i",
            Band::Z => "z",
            Band::Y => "y",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Band {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "u" => Ok(Band::U),
            "g" => Ok(Band::G),
            "r" => Ok(Band::R),
            "i" => Ok(Band::I),
            "z" => Ok(Band::Z),
            "y" => Ok(Band::Y),
            other => Err(format!("Unknown band: {}", other)),
        }
    }
}

/// One scheduled visit handed to the real-time scheduler.
///
/// Angles are in radians and tolerances in days, the units the downstream
/// runtime matches against. Records are immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub field: String,
    pub target_name: String,
    pub scheduler_note: String,
    pub science_program: String,
    pub observation_reason: String,
    pub ra: qtty::Radians,
    pub dec: qtty::Radians,
    pub mjd: ModifiedJulianDate,
    pub flush_by_mjd: ModifiedJulianDate,
    pub exptime: qtty::Seconds,
    pub band: Band,
    pub nexp: u32,
    pub mjd_tol: qtty::Days,
    pub dist_tol: qtty::Radians,
    pub ha_min: qtty::HourAngles,
    pub ha_max: qtty::HourAngles,
    pub alt_min: qtty::Radians,
    pub alt_max: qtty::Radians,
    pub sun_alt_max: qtty::Radians,
    pub moon_min_distance: Option<qtty::Radians>,
    pub season_bucket: SeasonBucket,
    pub visit: u32,
}

impl ObservationRecord {
    /// Identity of the record within a run: (field, time, band, visit).
    pub fn key(&self) -> (String, u64, Band, u32) {
        (self.field.clone(), self.mjd.value().to_bits(), self.band, self.visit)
    }
}
