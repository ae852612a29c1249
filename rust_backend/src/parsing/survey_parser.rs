//! Survey table format: a JSON array of rows.
//!
//! ```json
//! [
//!   {"field": "XMM_LSS", "season": 1, "season_seq": 30,
//!    "u": 8, "g": 10, "r": 20, "i": 20, "z": 24, "y": 18, "season_length": 200.0}
//! ]
//! ```

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::survey::SurveyTable;
use crate::core::error::{PreschedError, PreschedResult};

/// Parse a survey table from JSON text.
pub fn parse_survey_table_str(json: &str) -> PreschedResult<SurveyTable> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let table: SurveyTable = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| PreschedError::ParseError(format!("at '{}': {}", e.path(), e.inner())))?;

    for row in &table.rows {
        if row.season == 0 {
            return Err(PreschedError::ParseError(format!(
                "season buckets start at 1 (field '{}')",
                row.field
            )));
        }
    }
    Ok(table)
}

/// Parse a survey table file.
pub fn parse_survey_table(path: &Path) -> Result<SurveyTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read survey table: {}", path.display()))?;
    parse_survey_table_str(&content)
        .with_context(|| format!("Invalid survey table: {}", path.display()))
}
