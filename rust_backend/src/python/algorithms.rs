use pyo3::prelude::*;

use crate::algorithms::matcher;

/// Match a desired cumulative curve against available nights.
///
/// Args:
///     cumulative_desired: Desired cumulative sequence count per night
///     mask: Night availability; defaults to every night available
///
/// Returns:
///     tuple[list[int], list[int]]: Events per night and their running sum
///
/// Example:
///     >>> import ddf_presched
///     >>> sched, cumulative = ddf_presched.match_cumulative([0, 0.6, 1.2, 2.0])
#[pyfunction]
#[pyo3(signature = (cumulative_desired, mask=None))]
pub fn match_cumulative(
    cumulative_desired: Vec<f64>,
    mask: Option<Vec<bool>>,
) -> (Vec<u8>, Vec<u32>) {
    let mask = mask.unwrap_or_else(|| vec![true; cumulative_desired.len()]);
    let outcome = matcher::match_cumulative(&cumulative_desired, &mask);
    (outcome.schedule, outcome.cumulative)
}
