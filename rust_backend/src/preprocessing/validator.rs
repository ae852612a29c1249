//! Configuration validation with error and warning reporting.
//!
//! The scheduling algorithms accept any configuration and degrade to empty
//! output on nonsense. This validator surfaces the usual mistakes before a
//! run: missing positions, fractions outside the annual cycle, empty band
//! plans, and so on. Nothing here rejects a configuration on its own; the
//! caller decides what to do with the report.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::{FieldConfig, SchedulerConfig};

/// Validation result with categorized issues and statistics.
///
/// Errors make `is_valid` false, while warnings are informational. Errors
/// confined to one field also list that field in `invalid_fields`.
///
/// # Examples
///
/// ```
/// use ddf_presched::preprocessing::validator::ValidationResult;
///
/// let mut result = ValidationResult::new();
/// assert!(result.is_valid);
///
/// result.add_error("Missing position".to_string());
/// assert!(!result.is_valid);
/// assert_eq!(result.errors.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Fields with at least one error of their own, in configuration order.
    #[serde(default)]
    pub invalid_fields: Vec<String>,
    pub stats: ValidationStats,
}

/// Summary statistics computed during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationStats {
    pub total_fields: usize,
    pub linked_fields: usize,
    pub boosted_fields: usize,
    pub duplicate_names: usize,
    pub missing_positions: usize,
    pub flat_rate_fields: usize,
    /// Visits of one sequence in the first season bucket, summed over fields.
    pub visits_per_sequence: u64,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            invalid_fields: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Adds a critical error and marks the result as invalid.
    pub fn add_error(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }

    /// Adds an error belonging to `field`, prefixed with its name.
    pub fn add_field_error(&mut self, field: &str, error: String) {
        self.add_error(format!("{}: {}", field, error));
        if !self.invalid_fields.iter().any(|f| f == field) {
            self.invalid_fields.push(field.to_string());
        }
    }

    /// True when `field` has errors of its own.
    pub fn is_field_invalid(&self, field: &str) -> bool {
        self.invalid_fields.iter().any(|f| f == field)
    }

    /// Adds a non-critical warning without invalidating the result.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for scheduler configuration.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a full configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use ddf_presched::config::SchedulerConfig;
    /// use ddf_presched::preprocessing::validator::ConfigValidator;
    ///
    /// let result = ConfigValidator::validate(&SchedulerConfig::default_ddfs());
    /// assert!(result.is_valid);
    /// assert_eq!(result.stats.total_fields, 5);
    /// ```
    pub fn validate(config: &SchedulerConfig) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.stats.total_fields = config.fields.len();

        if !(config.run.survey_length > 0.0) {
            result.add_error(format!(
                "Survey length must be positive, got {}",
                config.run.survey_length
            ));
        }
        if !(config.run.visits.season_gap.value() > 0.0) {
            result.add_warning(format!(
                "Season gap {} days puts every chosen night in its own bucket",
                config.run.visits.season_gap.value()
            ));
        }
        if config.fields.is_empty() {
            result.add_warning("No fields configured".to_string());
        }

        result.stats.duplicate_names = Self::check_duplicates(&config.fields, &mut result);
        for field in &config.fields {
            Self::validate_field(field, &mut result);
        }
        result
    }

    fn check_duplicates(fields: &[FieldConfig], result: &mut ValidationResult) -> usize {
        let mut seen = HashSet::new();
        let mut duplicates = 0;
        for field in fields {
            if !seen.insert(field.name.as_str()) {
                duplicates += 1;
                result.add_error(format!(
                    "Duplicate field name: {}, later entries are skipped",
                    field.name
                ));
            }
        }
        duplicates
    }

    fn validate_field(field: &FieldConfig, result: &mut ValidationResult) {
        let name = &field.name;

        if field.resolved_position().is_none() {
            result.stats.missing_positions += 1;
            result.add_field_error(name, "no position and not a standard field".to_string());
        }
        if let Some(linked) = &field.linked {
            result.stats.linked_fields += 1;
            if linked.resolved_position().is_none() {
                result.stats.missing_positions += 1;
                result.add_field_error(
                    name,
                    format!("linked field {} has no position", linked.name),
                );
            }
        }

        let shape = &field.shape;
        for (label, value) in [
            ("season_unobs_frac", shape.season_unobs_frac),
            ("low_season_frac", shape.low_season_frac),
            ("low_season_rate", shape.low_season_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                result.add_field_error(name, format!("{} = {} is outside [0, 1]", label, value));
            }
        }
        if shape.season_unobs_frac >= 0.5 {
            result.add_warning(format!(
                "{}: season_unobs_frac = {} leaves no observing season",
                name, shape.season_unobs_frac
            ));
        }
        if !shape.is_accordion() {
            result.stats.flat_rate_fields += 1;
            if shape.low_season_frac > 0.0 {
                result.add_warning(format!(
                    "{}: low_season_frac ({}) <= season_unobs_frac ({}), rate is flat across the season",
                    name, shape.low_season_frac, shape.season_unobs_frac
                ));
            }
        }

        let demand = &field.demand;
        if demand.season_seq.is_empty() || demand.season_seq.iter().all(|&n| n == 0) {
            result.add_warning(format!("{}: no sequences requested", name));
        }
        if let Some(boost) = demand.boost_early_factor {
            result.stats.boosted_fields += 1;
            if !(boost > 0.0) {
                result.add_warning(format!("{}: early boost factor {} removes early seasons", name, boost));
            }
        }

        if field.bands.is_empty() {
            result.add_field_error(name, "no bands configured".to_string());
        }
        let mut bands_seen = HashSet::new();
        for plan in &field.bands {
            if !bands_seen.insert(plan.band) {
                result.add_warning(format!(
                    "{}: band {} configured twice, visits are merged",
                    name, plan.band
                ));
            }
            if plan.visits.is_empty() {
                result.add_warning(format!("{}: band {} has an empty visit table", name, plan.band));
            }
        }
        result.stats.visits_per_sequence += field
            .bands
            .iter()
            .map(|plan| u64::from(plan.visits.first().copied().unwrap_or(0)))
            .sum::<u64>();

        if field.season_length.is_empty() {
            result.add_warning(format!("{}: no season length cutoff", name));
        }
        if !(field.limits.airmass_limit > 1.0) {
            result.add_warning(format!(
                "{}: airmass limit {} admits no time steps",
                name, field.limits.airmass_limit
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkedField;

    #[test]
    fn test_default_config_is_valid() {
        let result = ConfigValidator::validate(&SchedulerConfig::default_ddfs());
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert_eq!(result.stats.linked_fields, 1);
        assert_eq!(result.stats.boosted_fields, 1);
        assert_eq!(result.stats.flat_rate_fields, 5);
        assert_eq!(result.stats.visits_per_sequence, 500);
    }

    #[test]
    fn test_inconsistent_low_season_is_warning_only() {
        let mut config = SchedulerConfig::default_ddfs();
        config.fields[0].shape.low_season_frac = 0.1;
        let result = ConfigValidator::validate(&config);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("flat"));
    }

    #[test]
    fn test_errors_reported() {
        let mut config = SchedulerConfig::default_ddfs();
        config.fields.push(FieldConfig::new("COSMOS"));
        let mut custom = FieldConfig::new("CUSTOM");
        custom.shape.season_unobs_frac = 1.5;
        custom.bands.clear();
        custom.linked = Some(LinkedField::new("CUSTOM_b"));
        config.fields.push(custom);

        let result = ConfigValidator::validate(&config);
        assert!(!result.is_valid);
        assert_eq!(result.stats.duplicate_names, 1);
        assert_eq!(result.stats.missing_positions, 2);
        assert!(result.errors.iter().any(|e| e.contains("outside [0, 1]")));
        assert!(result.errors.iter().any(|e| e.contains("no bands")));
        assert_eq!(result.invalid_fields, vec!["CUSTOM".to_string()]);
        assert!(!result.is_field_invalid("COSMOS"));
    }
}
