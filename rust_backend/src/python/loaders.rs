use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use std::path::PathBuf;

use crate::core::domain::ObservationRecord;
use crate::io::checksum::record_checksum;
use crate::io::loaders::generate_from_files;
use crate::python::records::PyObservationRecord;

fn generate(
    grid_path: &str,
    config_path: Option<&str>,
    survey_path: Option<&str>,
) -> PyResult<Vec<ObservationRecord>> {
    let config_path = config_path.map(PathBuf::from);
    let survey_path = survey_path.map(PathBuf::from);
    generate_from_files(
        &PathBuf::from(grid_path),
        config_path.as_deref(),
        survey_path.as_deref(),
    )
    .map_err(|e| PyRuntimeError::new_err(format!("{:#}", e)))
}

/// Generate the scheduled DDF observations for a visibility grid.
///
/// Args:
///     grid_path: Path to the visibility grid JSON
///     config_path: Optional TOML configuration; defaults to the standard fields
///     survey_path: Optional survey table JSON replacing the configured fields
///
/// Returns:
///     list[ObservationRecord]: Scheduled observations, in field order
///
/// Example:
///     >>> import ddf_presched
///     >>> obs = ddf_presched.generate_ddf_scheduled_obs("ddf_grid.json")
#[pyfunction]
#[pyo3(signature = (grid_path, config_path=None, survey_path=None))]
pub fn generate_ddf_scheduled_obs(
    grid_path: &str,
    config_path: Option<&str>,
    survey_path: Option<&str>,
) -> PyResult<Vec<PyObservationRecord>> {
    let records = generate(grid_path, config_path, survey_path)?;
    Ok(records.iter().map(PyObservationRecord::from).collect())
}

/// SHA-256 fingerprint of the records generated for a grid, config and
/// optional survey table.
#[pyfunction]
#[pyo3(signature = (grid_path, config_path=None, survey_path=None))]
pub fn scheduled_obs_checksum(
    grid_path: &str,
    config_path: Option<&str>,
    survey_path: Option<&str>,
) -> PyResult<String> {
    let records = generate(grid_path, config_path, survey_path)?;
    record_checksum(&records).map_err(|e| PyRuntimeError::new_err(e.to_string()))
}
