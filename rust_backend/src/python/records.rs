use pyo3::prelude::*;

use crate::core::domain::ObservationRecord;

/// Python view of one scheduled observation.
///
/// Angles are in radians, `mjd_tol` in days, `ha_min`/`ha_max` in hours.
#[pyclass(name = "ObservationRecord", get_all)]
#[derive(Clone)]
pub struct PyObservationRecord {
    pub field: String,
    pub target_name: String,
    pub scheduler_note: String,
    pub science_program: String,
    pub observation_reason: String,
    pub ra: f64,
    pub dec: f64,
    pub mjd: f64,
    pub flush_by_mjd: f64,
    pub exptime: f64,
    pub band: String,
    pub nexp: u32,
    pub mjd_tol: f64,
    pub dist_tol: f64,
    pub ha_min: f64,
    pub ha_max: f64,
    pub alt_min: f64,
    pub alt_max: f64,
    pub sun_alt_max: f64,
    pub moon_min_distance: Option<f64>,
    pub season: u32,
    pub visit: u32,
}

#[pymethods]
impl PyObservationRecord {
    fn __repr__(&self) -> String {
        format!(
            "ObservationRecord(target={}, mjd={:.5}, band={}, nexp={}, visit={})",
            self.target_name, self.mjd, self.band, self.nexp, self.visit
        )
    }
}

impl From<&ObservationRecord> for PyObservationRecord {
    fn from(record: &ObservationRecord) -> Self {
        PyObservationRecord {
            field: record.field.clone(),
            target_name: record.target_name.clone(),
            scheduler_note: record.scheduler_note.clone(),
            science_program: record.science_program.clone(),
            observation_reason: record.observation_reason.clone(),
            ra: record.ra.value(),
            dec: record.dec.value(),
            mjd: record.mjd.value(),
            flush_by_mjd: record.flush_by_mjd.value(),
            exptime: record.exptime.value(),
            band: record.band.to_string(),
            nexp: record.nexp,
            mjd_tol: record.mjd_tol.value(),
            dist_tol: record.dist_tol.value(),
            ha_min: record.ha_min.value(),
            ha_max: record.ha_max.value(),
            alt_min: record.alt_min.value(),
            alt_max: record.alt_max.value(),
            sun_alt_max: record.sun_alt_max.value(),
            moon_min_distance: record.moon_min_distance.map(|d| d.value()),
            season: record.season_bucket.0,
            visit: record.visit,
        }
    }
}
