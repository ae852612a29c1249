//! Season-fraction models.
//!
//! The season fraction of a field is an ephemeris quantity: it tracks where
//! the sun's apparent position sits relative to the field's right ascension.
//! The prescheduler only needs the value per night, so the computation lives
//! behind the [`SeasonModel`] trait and callers may plug in their own
//! almanac.

use crate::core::domain::SeasonFraction;
use crate::time::{ModifiedJulianDate, DAYS_PER_YEAR};

/// Source of [`SeasonFraction`] values for a sky position.
pub trait SeasonModel: Send + Sync {
    /// Season fraction of a field at right ascension `ra` at time `mjd`,
    /// counted relative to `survey_start`.
    fn season_fraction(
        &self,
        ra: qtty::Degrees,
        mjd: ModifiedJulianDate,
        survey_start: ModifiedJulianDate,
    ) -> SeasonFraction;

    /// Season fractions for a batch of timestamps.
    fn season_fractions(
        &self,
        ra: qtty::Degrees,
        mjds: &[ModifiedJulianDate],
        survey_start: ModifiedJulianDate,
    ) -> Vec<SeasonFraction> {
        mjds.iter()
            .map(|&mjd| self.season_fraction(ra, mjd, survey_start))
            .collect()
    }
}

/// Season model anchored on a single reference position of the sun.
///
/// The sun is assumed to move uniformly in right ascension, 360 degrees per
/// 365.25 days. A field's season begins when the sun passes its RA. Seasons
/// are numbered so that the first season beginning at or after the survey
/// start is season 0; the season already in progress at the start is -1.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceSunSeason {
    pub ref_mjd: ModifiedJulianDate,
    pub ref_sun_ra: qtty::Degrees,
}

impl Default for ReferenceSunSeason {
    fn default() -> Self {
        Self {
            ref_mjd: ModifiedJulianDate::new(60575.0),
            ref_sun_ra: qtty::Degrees::new(179.20796047239727),
        }
    }
}

impl ReferenceSunSeason {
    /// MJD at which the sun last crossed `ra` on or before the reference
    /// time's annual cycle.
    fn season_began(&self, ra: qtty::Degrees) -> f64 {
        let offset = (ra.value() - self.ref_sun_ra.value()) / 360.0 * DAYS_PER_YEAR;
        self.ref_mjd.value() + offset
    }
}

impl SeasonModel for ReferenceSunSeason {
    fn season_fraction(
        &self,
        ra: qtty::Degrees,
        mjd: ModifiedJulianDate,
        survey_start: ModifiedJulianDate,
    ) -> SeasonFraction {
        let began = self.season_began(ra);
        let raw = (mjd.value() - began) / DAYS_PER_YEAR;
        let first_full = ((survey_start.value() - began) / DAYS_PER_YEAR).ceil();
        SeasonFraction(raw - first_full)
    }
}
