//! Demand curve builder.
//!
//! Turns the per-night rate profile into a cumulative count of desired
//! sequences. Each active season gets an integral target, scaled by how much
//! of a full season it covers and optionally boosted early in the survey; the
//! season's share of the target is then spread over its nights in proportion
//! to the rate profile.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::domain::SeasonFraction;
use crate::time::DAYS_PER_YEAR;

/// Per-field demand parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandSettings {
    /// Target sequence count per active season, earliest first. The last
    /// value is repeated for seasons past the end of the table.
    pub season_seq: Vec<u32>,
    /// Seasons spanning less than this are given no sequences.
    pub min_season_length: qtty::Days,
    /// Boost applied to the partial season -1 and to seasons 0 and 1.
    pub boost_early_factor: Option<f64>,
    /// Boost applied to season 2 when `boost_early_factor` is set.
    pub boost_factor_third: f64,
}

impl Default for DemandSettings {
    fn default() -> Self {
        Self {
            season_seq: vec![30; 10],
            min_season_length: qtty::Days::new(0.0),
            boost_early_factor: None,
            boost_factor_third: 0.0,
        }
    }
}

impl DemandSettings {
    /// Configured target for the `position`-th active season.
    pub fn target_at(&self, position: usize) -> f64 {
        self.season_seq
            .get(position)
            .or_else(|| self.season_seq.last())
            .map_or(0.0, |&n| f64::from(n))
    }
}

/// Target assigned to one season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonDemand {
    /// Integer season index (floor of the season fraction).
    pub index: i64,
    /// Span of the season's active nights, in years.
    pub length: f64,
    /// Rounded number of sequences wanted in the season.
    pub target: f64,
}

/// Cumulative desired sequence count, one value per night.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DemandCurve {
    pub values: Vec<f64>,
    pub seasons: Vec<SeasonDemand>,
}

impl DemandCurve {
    /// Total sequences wanted over the whole run.
    pub fn total(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }
}

/// Span (max - min season fraction) of each season with active nights.
fn season_spans(fractions: &[SeasonFraction], rates: &[f64]) -> BTreeMap<i64, f64> {
    let mut bounds: BTreeMap<i64, (f64, f64)> = BTreeMap::new();
    for (fraction, &rate) in fractions.iter().zip(rates) {
        if rate <= 0.0 {
            continue;
        }
        let value = fraction.value();
        bounds
            .entry(fraction.index())
            .and_modify(|(lo, hi)| {
                *lo = lo.min(value);
                *hi = hi.max(value);
            })
            .or_insert((value, value));
    }
    bounds
        .into_iter()
        .map(|(index, (lo, hi))| (index, hi - lo))
        .collect()
}

/// Rounded per-season targets after length scaling, cutoff and boosts.
pub fn season_targets(
    fractions: &[SeasonFraction],
    rates: &[f64],
    settings: &DemandSettings,
) -> Vec<SeasonDemand> {
    let spans = season_spans(fractions, rates);
    let max_length = spans.values().copied().fold(0.0_f64, f64::max);
    let min_length = settings.min_season_length.value() / DAYS_PER_YEAR;

    spans
        .into_iter()
        .enumerate()
        .map(|(position, (index, length))| {
            let configured = settings.target_at(position);
            let mut target = if max_length > 0.0 {
                configured * length / max_length
            } else {
                0.0
            };

            if length < min_length {
                target = 0.0;
            } else if let Some(boost) = settings.boost_early_factor {
                target = match index {
                    -1 => (length * DAYS_PER_YEAR / 3.0).min(configured * boost),
                    0 | 1 => target * boost,
                    2 => target * settings.boost_factor_third,
                    _ => target,
                };
            }

            SeasonDemand {
                index,
                length,
                target: target.round_ties_even(),
            }
        })
        .collect()
}

/// Build the cumulative demand curve over all nights of a field.
///
/// Within a season the curve is the running sum of the rate profile scaled
/// so it ends at the season's target, offset by everything wanted before the
/// season. Nights outside every active season hold the running total.
pub fn build_demand_curve(
    fractions: &[SeasonFraction],
    rates: &[f64],
    settings: &DemandSettings,
) -> DemandCurve {
    let n = fractions.len().min(rates.len());
    let fractions = &fractions[..n];
    let rates = &rates[..n];

    let seasons = season_targets(fractions, rates, settings);
    let mut values = vec![0.0; n];
    let mut assigned = vec![false; n];
    let mut running = 0.0_f64;

    for season in &seasons {
        let members: Vec<usize> = (0..n)
            .filter(|&i| fractions[i].index() == season.index)
            .collect();
        let total: f64 = members.iter().map(|&i| rates[i]).sum();
        if total <= 0.0 {
            continue;
        }

        let offset = running;
        let mut acc = 0.0;
        for &i in &members {
            acc += rates[i];
            values[i] = acc / total * season.target + offset;
            assigned[i] = true;
            running = running.max(values[i]);
        }
        log::debug!(
            "season {}: length {:.3} yr, target {}",
            season.index,
            season.length,
            season.target
        );
    }

    let mut carry = 0.0_f64;
    for (value, &set) in values.iter_mut().zip(&assigned) {
        if set {
            carry = carry.max(*value);
        } else {
            *value = carry;
        }
    }

    DemandCurve { values, seasons }
}
