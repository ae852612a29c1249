//! Availability mask builder.
//!
//! Combines the per-step physical constraints of a field (sun altitude,
//! airmass, sky brightness, depth) into a per-step mask, extends the sun
//! constraint backwards by one sequence duration so a sequence never runs
//! into twilight, and reduces the result to one flag per night.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::domain::{Night, TimeStep};

/// Physical limits a time step must satisfy to host a sequence start.
///
/// `sky_limit` and `depth_limit` are optional; in TOML, where there is no
/// null, a depth limit of `-inf` has the same effect as no limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityLimits {
    /// Maximum sun altitude.
    pub sun_limit: qtty::Degrees,
    /// Expected duration of one sequence.
    pub sequence_time: qtty::Minutes,
    /// Maximum airmass (exclusive).
    pub airmass_limit: f64,
    /// Maximum sky brightness value, inclusive.
    pub sky_limit: Option<f64>,
    /// Minimum five-sigma depth, inclusive.
    pub depth_limit: Option<f64>,
}

impl Default for VisibilityLimits {
    fn default() -> Self {
        Self {
            sun_limit: qtty::Degrees::new(-18.0),
            sequence_time: qtty::Minutes::new(60.0),
            airmass_limit: 2.5,
            sky_limit: None,
            depth_limit: Some(23.5),
        }
    }
}

/// Per-step and per-night availability of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Availability {
    pub step_mask: Vec<bool>,
    pub nights: Vec<Night>,
    pub night_mask: Vec<bool>,
}

impl Availability {
    /// Number of nights with at least one admissible step.
    pub fn usable_nights(&self) -> usize {
        self.night_mask.iter().filter(|&&ok| ok).count()
    }
}

const SPACING_TOLERANCE: f64 = 1e-6;

/// Number of steps before a sun-forbidden step that are also forbidden:
/// `ceil(sequence_time / step spacing)`, with the spacing taken from the
/// first two steps. Ratios within `1e-6` of an integer count as that
/// integer, absorbing the rounding left by differencing large MJD values.
pub fn shadow_length(steps: &[TimeStep], sequence_time: qtty::Minutes) -> usize {
    if steps.len() < 2 {
        return 0;
    }
    let spacing = (steps[1].mjd - steps[0].mjd).value();
    if !(spacing > 0.0) {
        return 0;
    }
    let sequence_days = sequence_time.to::<qtty::Day>().value();
    if sequence_days <= 0.0 {
        return 0;
    }
    let ratio = sequence_days / spacing;
    let nearest = ratio.round();
    if (ratio - nearest).abs() < SPACING_TOLERANCE {
        nearest as usize
    } else {
        ratio.ceil() as usize
    }
}

/// Sun constraint with the shadow extension applied.
fn sun_mask(steps: &[TimeStep], limits: &VisibilityLimits) -> Vec<bool> {
    let mut mask: Vec<bool> = steps
        .iter()
        .map(|s| s.sun_alt.value() < limits.sun_limit.value())
        .collect();

    let n_back = shadow_length(steps, limits.sequence_time);
    if n_back == 0 {
        return mask;
    }

    let forbidden: Vec<usize> = mask
        .iter()
        .enumerate()
        .filter(|(_, &ok)| !ok)
        .map(|(i, _)| i)
        .collect();
    for i in forbidden {
        for slot in &mut mask[i.saturating_sub(n_back)..i] {
            *slot = false;
        }
    }
    mask
}

fn sky_ok(step: &TimeStep, limit: Option<f64>) -> bool {
    match limit {
        None => true,
        Some(limit) => step
            .sky_brightness
            .map_or(false, |b| b.is_finite() && b <= limit),
    }
}

fn depth_ok(step: &TimeStep, limit: Option<f64>) -> bool {
    match step.valid_depth() {
        None => false,
        Some(depth) => limit.map_or(true, |limit| depth >= limit),
    }
}

/// Per-step admissibility: sun (with shadow), airmass, sky and depth.
pub fn step_mask(steps: &[TimeStep], limits: &VisibilityLimits) -> Vec<bool> {
    let sun = sun_mask(steps, limits);
    steps
        .iter()
        .zip(sun)
        .map(|(step, sun_ok)| {
            sun_ok
                && step.airmass < limits.airmass_limit
                && sky_ok(step, limits.sky_limit)
                && depth_ok(step, limits.depth_limit)
        })
        .collect()
}

/// Group time steps into nights by night index, in night order.
pub fn group_nights(steps: &[TimeStep]) -> Vec<Night> {
    let mut by_night: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, step) in steps.iter().enumerate() {
        by_night.entry(step.night).or_default().push(i);
    }

    by_night
        .into_iter()
        .map(|(index, members)| Night {
            index,
            mjd: steps[members[0]].mjd,
            steps: members,
        })
        .collect()
}

/// A night is usable when any of its steps is admissible.
pub fn night_mask(nights: &[Night], step_mask: &[bool]) -> Vec<bool> {
    nights
        .iter()
        .map(|night| night.steps.iter().any(|&i| step_mask.get(i).copied().unwrap_or(false)))
        .collect()
}

/// Build the full availability picture of one field.
pub fn build_availability(steps: &[TimeStep], limits: &VisibilityLimits) -> Availability {
    let step_mask = step_mask(steps, limits);
    let nights = group_nights(steps);
    let night_mask = night_mask(&nights, &step_mask);
    Availability {
        step_mask,
        nights,
        night_mask,
    }
}
