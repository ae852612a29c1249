//! Cumulative matcher.
//!
//! Greedy left-to-right placement of one-sequence-per-night events so the
//! realised cumulative count follows a desired cumulative curve using only
//! available nights.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Result of matching a desired cumulative curve.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Events per night, 0 or 1.
    pub schedule: Vec<u8>,
    /// Running sum of `schedule`.
    pub cumulative: Vec<u32>,
}

impl MatchOutcome {
    /// Positions of nights that received an event, in order.
    pub fn chosen(&self) -> Vec<usize> {
        self.schedule
            .iter()
            .enumerate()
            .filter(|(_, &n)| n > 0)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn event_count(&self) -> usize {
        self.schedule.iter().filter(|&&n| n > 0).count()
    }
}

/// Positions where the rounded curve steps up.
///
/// Position 0 is never a step; a jump of several units at one position is a
/// single step.
pub fn step_positions(desired: &[f64]) -> Vec<usize> {
    let rounded: Vec<f64> = desired.iter().map(|v| v.round_ties_even()).collect();
    rounded
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[1] > w[0])
        .map(|(i, _)| i + 1)
        .collect()
}

/// Nearest remaining position to `step`, preferring the later side on ties.
fn nearest_available(available: &BTreeSet<usize>, step: usize) -> Option<usize> {
    let before = available.range(..=step).next_back().copied();
    let after = available.range(step..).next().copied();
    match (before, after) {
        (Some(b), Some(a)) => {
            if step - b < a - step {
                Some(b)
            } else {
                Some(a)
            }
        }
        (Some(b), None) => Some(b),
        (None, Some(a)) => Some(a),
        (None, None) => None,
    }
}

/// Match `desired` against the available nights in `mask`.
///
/// Nights beyond the end of `mask` are unavailable. Each step of the rounded
/// curve is assigned to the closest still-available night; that night is
/// then removed from the pool, so no night gets two events.
pub fn match_cumulative(desired: &[f64], mask: &[bool]) -> MatchOutcome {
    let n = desired.len();
    let mut available: BTreeSet<usize> = (0..n)
        .filter(|&i| mask.get(i).copied().unwrap_or(false))
        .collect();
    let mut schedule = vec![0u8; n];

    for step in step_positions(desired) {
        let Some(chosen) = nearest_available(&available, step) else {
            break;
        };
        schedule[chosen] += 1;
        available.remove(&chosen);
    }

    let mut total = 0u32;
    let cumulative = schedule
        .iter()
        .map(|&n| {
            total += u32::from(n);
            total
        })
        .collect();

    MatchOutcome {
        schedule,
        cumulative,
    }
}
