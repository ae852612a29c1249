//! Run-wide settings shared by every field.

use serde::{Deserialize, Serialize};

use crate::algorithms::expander::VisitTemplate;
use crate::time::{ModifiedJulianDate, DAYS_PER_YEAR};

/// Survey window and the values stamped on every emitted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_mjd_start")]
    pub mjd_start: ModifiedJulianDate,
    /// Survey length in years.
    #[serde(default = "default_survey_length")]
    pub survey_length: f64,
    #[serde(default)]
    pub visits: VisitTemplate,
}

fn default_mjd_start() -> ModifiedJulianDate {
    ModifiedJulianDate::new(60796.0)
}

fn default_survey_length() -> f64 {
    10.0
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mjd_start: default_mjd_start(),
            survey_length: default_survey_length(),
            visits: VisitTemplate::default(),
        }
    }
}

impl RunConfig {
    /// End of the survey window.
    pub fn mjd_end(&self) -> ModifiedJulianDate {
        self.mjd_start + qtty::Days::new(self.survey_length * DAYS_PER_YEAR)
    }
}
