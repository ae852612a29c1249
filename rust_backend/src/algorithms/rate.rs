//! Season rate profile.
//!
//! Maps the continuous season fraction of each night to a demand-rate
//! multiplier: zero outside the observing season, a reduced rate near the
//! season edges and full rate in the middle.

use serde::{Deserialize, Serialize};

use crate::core::domain::SeasonFraction;

/// Thresholds shaping the rate profile across one annual cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonShape {
    /// Fraction of the cycle on each side of conjunction with no observing.
    pub season_unobs_frac: f64,
    /// Fraction of the cycle on each side of conjunction observed at the
    /// reduced rate. Only meaningful when larger than `season_unobs_frac`.
    pub low_season_frac: f64,
    /// Rate used inside the low-season band.
    pub low_season_rate: f64,
}

impl Default for SeasonShape {
    fn default() -> Self {
        Self {
            season_unobs_frac: 0.2,
            low_season_frac: 0.0,
            low_season_rate: 0.3,
        }
    }
}

impl SeasonShape {
    /// True when the reduced-rate band extends past the unobservable band.
    pub fn is_accordion(&self) -> bool {
        self.low_season_frac > self.season_unobs_frac
    }

    /// Rate multiplier for a single season fraction.
    pub fn rate_for(&self, fraction: SeasonFraction) -> f64 {
        let frac = fraction.phase();
        if frac < self.season_unobs_frac || frac > 1.0 - self.season_unobs_frac {
            0.0
        } else if frac < self.low_season_frac || frac > 1.0 - self.low_season_frac {
            self.low_season_rate
        } else {
            1.0
        }
    }
}

/// Rate multiplier per night.
pub fn rate_profile(fractions: &[SeasonFraction], shape: &SeasonShape) -> Vec<f64> {
    fractions.iter().map(|&f| shape.rate_for(f)).collect()
}
