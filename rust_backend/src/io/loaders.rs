use anyhow::{Context, Result};
use std::path::Path;

use crate::config::SchedulerConfig;
use crate::core::domain::ObservationRecord;
use crate::io::checksum::record_checksum;
use crate::parsing::grid_parser::{parse_grid_str, VisibilityGrid};
use crate::parsing::survey_parser::parse_survey_table;
use crate::preprocessing::pipeline::generate_scheduled_obs;

/// Loads visibility grids.
pub struct GridLoader;

impl GridLoader {
    /// Load a grid from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<VisibilityGrid> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read grid file: {}", path.display()))?;
        Self::load_from_str(&content)
            .with_context(|| format!("Invalid grid file: {}", path.display()))
    }

    /// Load a grid from JSON text.
    pub fn load_from_str(json: &str) -> Result<VisibilityGrid> {
        let grid = parse_grid_str(json)?;
        log::info!(
            "Loaded visibility grid: {} samples, {} fields",
            grid.len(),
            grid.fields.len()
        );
        Ok(grid)
    }
}

/// Assembles the run configuration from its optional sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Configuration from `config_path`, else `ddf_presched.toml` in a
    /// standard location, else the standard fields.
    pub fn load(config_path: Option<&Path>) -> Result<SchedulerConfig> {
        if let Some(path) = config_path {
            return SchedulerConfig::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()));
        }
        match SchedulerConfig::from_default_location().context("Failed to load default config")? {
            Some(config) => Ok(config),
            None => {
                log::debug!("No config file found, using standard fields");
                Ok(SchedulerConfig::default_ddfs())
            }
        }
    }

    /// As [`ConfigLoader::load`], with the fields replaced by those of a
    /// survey table when one is given.
    pub fn load_with_survey(
        config_path: Option<&Path>,
        survey_path: Option<&Path>,
    ) -> Result<SchedulerConfig> {
        let base = Self::load(config_path)?;
        let Some(survey_path) = survey_path else {
            return Ok(base);
        };
        let table = parse_survey_table(survey_path)?;
        let config = table
            .to_scheduler_config(&base)
            .with_context(|| format!("Failed to apply survey table: {}", survey_path.display()))?;
        log::info!(
            "Survey table {}: {} rows, {} fields",
            survey_path.display(),
            table.rows.len(),
            config.fields.len()
        );
        Ok(config)
    }
}

/// Writes emitted records.
pub struct RecordWriter;

impl RecordWriter {
    /// Pretty-printed JSON array of records.
    pub fn to_json(records: &[ObservationRecord]) -> Result<String> {
        serde_json::to_string_pretty(records).context("Failed to serialise records")
    }

    /// Write `records` to `path`; returns the record-set checksum.
    pub fn write_json(path: &Path, records: &[ObservationRecord]) -> Result<String> {
        let json = Self::to_json(records)?;
        std::fs::write(path, &json)
            .with_context(|| format!("Failed to write records: {}", path.display()))?;
        Ok(record_checksum(records)?)
    }

    /// Read records back from a JSON file.
    pub fn read_json(path: &Path) -> Result<Vec<ObservationRecord>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read records: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid record file: {}", path.display()))
    }
}

/// Load a grid, a configuration and an optional survey table, and generate
/// the scheduled observations with the default pipeline.
pub fn generate_from_files(
    grid_path: &Path,
    config_path: Option<&Path>,
    survey_path: Option<&Path>,
) -> Result<Vec<ObservationRecord>> {
    let grid = GridLoader::load_from_file(grid_path)?;
    let config = ConfigLoader::load_with_survey(config_path, survey_path)?;
    generate_scheduled_obs(&grid, &config).context("Prescheduling failed")
}
