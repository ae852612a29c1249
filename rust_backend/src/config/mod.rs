//! Scheduler configuration.
//!
//! A [`SchedulerConfig`] is a [`RunConfig`] plus an ordered list of
//! [`FieldConfig`]s. It is built either from TOML, where every setting is
//! optional, or from [`SchedulerConfig::default_ddfs`], which describes the
//! five standard deep-drilling fields.
//!
//! ```toml
//! [run]
//! mjd_start = 60796.0
//! survey_length = 10.0
//!
//! [[fields]]
//! name = "COSMOS"
//! [fields.demand]
//! boost_early_factor = 5.0
//! boost_factor_third = 2.0
//! ```

pub mod field;
pub mod run;
pub mod survey;

pub use field::{default_band_plans, FieldConfig, LinkedField};
pub use run::RunConfig;
pub use survey::{SurveyRow, SurveyTable};

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::astro::catalog::STANDARD_FIELDS;
use crate::core::error::{PreschedError, PreschedResult};

/// Complete configuration of a prescheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default = "standard_fields")]
    pub fields: Vec<FieldConfig>,
}

fn standard_fields() -> Vec<FieldConfig> {
    STANDARD_FIELDS
        .iter()
        .filter_map(|name| FieldConfig::standard(name))
        .collect()
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::default_ddfs()
    }
}

impl SchedulerConfig {
    /// Default run with the standard deep-drilling fields.
    pub fn default_ddfs() -> Self {
        Self {
            run: RunConfig::default(),
            fields: standard_fields(),
        }
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> PreschedResult<Self> {
        toml::from_str(content).map_err(|e| {
            PreschedError::ConfigurationError(format!("Failed to parse config: {}", e))
        })
    }

    /// Load a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> PreschedResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            PreschedError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `ddf_presched.toml` from the first standard location that has
    /// one, or `None` if there is none.
    ///
    /// Searches the current directory, then `rust_backend/`, then the
    /// parent directory.
    pub fn from_default_location() -> PreschedResult<Option<Self>> {
        let search_paths = [
            PathBuf::from("ddf_presched.toml"),
            PathBuf::from("rust_backend/ddf_presched.toml"),
            PathBuf::from("../ddf_presched.toml"),
        ];
        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
