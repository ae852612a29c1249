use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::{Add, Sub};

/// MJD of the Unix epoch (1970-01-01 00:00:00 UTC).
const MJD_UNIX_EPOCH: f64 = 40587.0;

const SECONDS_PER_DAY: f64 = 86400.0;

/// Length of the year used for season arithmetic.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// A point in time expressed as a Modified Julian Date (UTC).
///
/// Every timestamp handled by the prescheduler (grid samples, chosen
/// observation times, flush deadlines) is an MJD. The wrapper keeps them
/// from being mixed with plain durations in days.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifiedJulianDate(qtty::Days);

impl ModifiedJulianDate {
    /// Create a new MJD value.
    pub fn new<V: Into<qtty::Days>>(v: V) -> Self {
        Self(v.into())
    }

    /// Raw MJD value as f64.
    pub fn value(&self) -> f64 {
        self.0.value()
    }

    /// Total ordering, NaN sorts last.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.value().total_cmp(&other.value())
    }

    /// Convert to a UTC datetime. Returns `None` for non-finite or
    /// out-of-range values.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        if !self.value().is_finite() {
            return None;
        }
        let secs = (self.value() - MJD_UNIX_EPOCH) * SECONDS_PER_DAY;
        let whole = secs.floor();
        let nanos = ((secs - whole) * 1e9).round() as u32;
        Utc.timestamp_opt(whole as i64, nanos.min(999_999_999)).single()
    }
}

impl From<f64> for ModifiedJulianDate {
    fn from(v: f64) -> Self {
        ModifiedJulianDate::new(v)
    }
}

impl Add<qtty::Days> for ModifiedJulianDate {
    type Output = ModifiedJulianDate;

    fn add(self, rhs: qtty::Days) -> Self::Output {
        ModifiedJulianDate(self.0 + rhs)
    }
}

impl Sub<qtty::Days> for ModifiedJulianDate {
    type Output = ModifiedJulianDate;

    fn sub(self, rhs: qtty::Days) -> Self::Output {
        ModifiedJulianDate(self.0 - rhs)
    }
}

impl Sub for ModifiedJulianDate {
    type Output = qtty::Days;

    fn sub(self, rhs: ModifiedJulianDate) -> Self::Output {
        self.0 - rhs.0
    }
}

impl std::fmt::Display for ModifiedJulianDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}", self.value())
    }
}

/// Format an MJD as an ISO-8601 UTC string, falling back to the raw value.
pub fn format_mjd(mjd: ModifiedJulianDate) -> String {
    match mjd.to_utc() {
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        None => format!("MJD {}", mjd),
    }
}
