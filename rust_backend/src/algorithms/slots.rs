//! Night slot selector.

use serde::{Deserialize, Serialize};

use crate::core::domain::{Night, TimeStep};
use crate::time::ModifiedJulianDate;

/// The time step picked for a chosen night.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChosenSlot {
    pub night: i64,
    pub step_index: usize,
    pub mjd: ModifiedJulianDate,
    pub depth: f64,
}

/// Deepest admissible step of `night`; ties go to the earliest step.
pub fn best_slot(night: &Night, steps: &[TimeStep], step_mask: &[bool]) -> Option<ChosenSlot> {
    let mut best: Option<ChosenSlot> = None;
    for &i in &night.steps {
        if !step_mask.get(i).copied().unwrap_or(false) {
            continue;
        }
        let Some(step) = steps.get(i) else {
            continue;
        };
        let Some(depth) = step.valid_depth() else {
            continue;
        };
        let better = match &best {
            None => true,
            Some(current) => {
                depth > current.depth
                    || (depth == current.depth && step.mjd.value() < current.mjd.value())
            }
        };
        if better {
            best = Some(ChosenSlot {
                night: night.index,
                step_index: i,
                mjd: step.mjd,
                depth,
            });
        }
    }
    best
}

/// One slot per chosen night, in night order. Nights without any admissible
/// step are skipped.
pub fn select_slots(
    chosen: &[usize],
    nights: &[Night],
    steps: &[TimeStep],
    step_mask: &[bool],
) -> Vec<ChosenSlot> {
    chosen
        .iter()
        .filter_map(|&position| nights.get(position))
        .filter_map(|night| best_slot(night, steps, step_mask))
        .collect()
}
