use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::algorithms::availability::build_availability;
use crate::algorithms::demand::{build_demand_curve, DemandCurve};
use crate::algorithms::expander::expand_visits;
use crate::algorithms::matcher::{match_cumulative, MatchOutcome};
use crate::algorithms::rate::rate_profile;
use crate::algorithms::slots::{select_slots, ChosenSlot};
use crate::astro::season::{ReferenceSunSeason, SeasonModel};
use crate::config::{FieldConfig, RunConfig, SchedulerConfig};
use crate::core::domain::{Night, ObservationRecord, SeasonFraction, TimeStep};
use crate::core::error::{PreschedError, PreschedResult};
use crate::parsing::grid_parser::VisibilityGrid;
use crate::preprocessing::validator::{ConfigValidator, ValidationResult};
use crate::time::format_mjd;

/// Everything computed for one field, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct FieldSchedule {
    pub field: String,
    pub nights: Vec<Night>,
    pub night_mask: Vec<bool>,
    pub season_fractions: Vec<SeasonFraction>,
    pub rates: Vec<f64>,
    pub demand: DemandCurve,
    pub matched: MatchOutcome,
    pub slots: Vec<ChosenSlot>,
    pub records: Vec<ObservationRecord>,
}

impl FieldSchedule {
    pub fn usable_nights(&self) -> usize {
        self.night_mask.iter().filter(|&&ok| ok).count()
    }

    pub fn summary(&self) -> FieldSummary {
        FieldSummary {
            field: self.field.clone(),
            nights: self.nights.len(),
            usable_nights: self.usable_nights(),
            desired_sequences: self.demand.total().round_ties_even() as u32,
            chosen_nights: self.slots.len(),
            records: self.records.len(),
        }
    }
}

/// Per-field counts of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSummary {
    pub field: String,
    pub nights: usize,
    pub usable_nights: usize,
    pub desired_sequences: u32,
    pub chosen_nights: usize,
    pub records: usize,
}

/// Counts of a whole run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub fields: Vec<FieldSummary>,
    /// Configured fields that produced no schedule: missing from the grid,
    /// invalid, repeated or failed.
    pub skipped_fields: Vec<String>,
    pub total_records: usize,
}

/// Result of a prescheduling run.
pub struct PipelineResult {
    pub schedules: Vec<FieldSchedule>,
    pub records: Vec<ObservationRecord>,
    pub validation: ValidationResult,
    pub summary: RunSummary,
}

/// Configuration for the pipeline itself.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Validate the scheduler configuration before running.
    pub validate: bool,
    /// Schedule fields on the rayon thread pool.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            validate: true,
            parallel: true,
        }
    }
}

/// Per-field prescheduling pipeline: availability, rate profile, demand
/// curve, matching, slot selection and visit expansion.
pub struct PreschedPipeline {
    config: PipelineConfig,
    season_model: Box<dyn SeasonModel>,
}

impl PreschedPipeline {
    /// Create a new pipeline with default configuration
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            season_model: Box::new(ReferenceSunSeason::default()),
        }
    }

    /// Replace the season-fraction model.
    pub fn with_season_model<M: SeasonModel + 'static>(mut self, model: M) -> Self {
        self.season_model = Box::new(model);
        self
    }

    /// Schedule one field from its time steps.
    pub fn schedule_field(
        &self,
        field: &FieldConfig,
        steps: &[TimeStep],
        run: &RunConfig,
    ) -> PreschedResult<FieldSchedule> {
        let position = field.resolved_position().ok_or_else(|| {
            PreschedError::ConfigurationError(format!("No position for field '{}'", field.name))
        })?;
        let targets = field.visit_targets()?;

        let availability = build_availability(steps, &field.limits);
        let night_mjds: Vec<_> = availability.nights.iter().map(|n| n.mjd).collect();
        let season_fractions =
            self.season_model
                .season_fractions(position.ra, &night_mjds, run.mjd_start);
        let rates = rate_profile(&season_fractions, &field.shape);
        let demand = build_demand_curve(&season_fractions, &rates, &field.demand);
        let matched = match_cumulative(&demand.values, &availability.night_mask);
        let slots = select_slots(
            &matched.chosen(),
            &availability.nights,
            steps,
            &availability.step_mask,
        );

        let mjds: Vec<_> = slots.iter().map(|s| s.mjd).collect();
        let records = expand_visits(
            &targets,
            &mjds,
            &field.bands,
            &field.season_length,
            &run.visits,
        );

        if slots.is_empty() {
            log::warn!(
                "{}: no nights scheduled ({} of {} nights usable)",
                field.name,
                availability.usable_nights(),
                availability.nights.len()
            );
        } else {
            log::info!(
                "{}: {} nights chosen for {} desired, {} records",
                field.name,
                slots.len(),
                demand.total(),
                records.len()
            );
        }

        Ok(FieldSchedule {
            field: field.name.clone(),
            nights: availability.nights,
            night_mask: availability.night_mask,
            season_fractions,
            rates,
            demand,
            matched,
            slots,
            records,
        })
    }

    /// Run every configured field over the grid.
    ///
    /// The grid is cropped to the survey window; a grid that does not cover
    /// the window only produces a warning. Fields missing from the grid,
    /// fields with validation errors, repeated field names and fields whose
    /// scheduling fails are logged and skipped; the remaining fields are
    /// still scheduled. Records come out in configuration order regardless
    /// of scheduling order.
    pub fn run(
        &self,
        config: &SchedulerConfig,
        grid: &VisibilityGrid,
    ) -> PreschedResult<PipelineResult> {
        let validation = if self.config.validate {
            let validation = ConfigValidator::validate(config);
            for warning in &validation.warnings {
                log::warn!("{}", warning);
            }
            for error in &validation.errors {
                log::error!("{}", error);
            }
            validation
        } else {
            ValidationResult::new()
        };

        let start = config.run.mjd_start;
        let end = config.run.mjd_end();
        if !grid.covers(start, end) {
            let range = grid
                .mjd_range()
                .map(|(a, b)| format!("{} - {}", format_mjd(a), format_mjd(b)))
                .unwrap_or_else(|| "empty".to_string());
            log::warn!(
                "Visibility grid ({}) does not cover the survey window {} - {}",
                range,
                format_mjd(start),
                format_mjd(end)
            );
        }
        let grid = grid.crop(start, end);

        let mut seen = HashSet::new();
        let runnable: Vec<bool> = config
            .fields
            .iter()
            .map(|field| {
                if !seen.insert(field.name.as_str()) {
                    log::warn!("{}: repeated field name, skipped", field.name);
                    false
                } else if validation.is_field_invalid(&field.name) {
                    log::warn!("{}: invalid configuration, skipped", field.name);
                    false
                } else {
                    true
                }
            })
            .collect();

        let schedule_one = |(field, &ok): (&FieldConfig, &bool)| -> Option<FieldSchedule> {
            if !ok {
                return None;
            }
            let Some(steps) = grid.field_steps(&field.name) else {
                log::warn!("{}: not in visibility grid, skipped", field.name);
                return None;
            };
            match self.schedule_field(field, &steps, &config.run) {
                Ok(schedule) => Some(schedule),
                Err(e) => {
                    log::error!("{}: scheduling failed, skipped: {}", field.name, e);
                    None
                }
            }
        };

        let outcomes: Vec<Option<FieldSchedule>> = if self.config.parallel {
            config
                .fields
                .par_iter()
                .zip(runnable.par_iter())
                .map(schedule_one)
                .collect()
        } else {
            config
                .fields
                .iter()
                .zip(runnable.iter())
                .map(schedule_one)
                .collect()
        };

        let mut summary = RunSummary::default();
        let mut schedules = Vec::new();
        for (field, outcome) in config.fields.iter().zip(outcomes) {
            match outcome {
                Some(schedule) => {
                    summary.fields.push(schedule.summary());
                    schedules.push(schedule);
                }
                None => summary.skipped_fields.push(field.name.clone()),
            }
        }

        let records: Vec<ObservationRecord> = schedules
            .iter()
            .flat_map(|s| s.records.iter().cloned())
            .collect();
        summary.total_records = records.len();

        Ok(PipelineResult {
            schedules,
            records,
            validation,
            summary,
        })
    }
}

impl Default for PreschedPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate the scheduled observations for `config` over `grid` with the
/// default pipeline.
pub fn generate_scheduled_obs(
    grid: &VisibilityGrid,
    config: &SchedulerConfig,
) -> PreschedResult<Vec<ObservationRecord>> {
    PreschedPipeline::new()
        .run(config, grid)
        .map(|result| result.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::grid_parser::FieldColumns;
    use std::collections::BTreeMap;

    /// Four dark samples per night for `nights` nights from MJD 60796.
    fn grid(nights: usize, fields: &[&str]) -> VisibilityGrid {
        let mut grid = VisibilityGrid::default();
        for n in 0..nights {
            for k in 0..4 {
                grid.mjd.push(60796.0 + n as f64 + 0.1 + 0.05 * k as f64);
                grid.sun_alt.push(if k == 3 { -5.0 } else { -30.0 });
                grid.night.push(n as i64);
            }
        }
        let len = grid.mjd.len();
        let mut columns = BTreeMap::new();
        for name in fields {
            columns.insert(
                name.to_string(),
                FieldColumns {
                    airmass: vec![Some(1.2); len],
                    sky_g: Vec::new(),
                    m5_g: (0..len).map(|i| Some(24.0 + (i % 4) as f64 * 0.1)).collect(),
                },
            );
        }
        grid.fields = columns;
        grid
    }

    fn short_run(fields: Vec<FieldConfig>) -> SchedulerConfig {
        let mut config = SchedulerConfig::default_ddfs();
        config.run.survey_length = 1.0;
        config.fields = fields;
        config
    }

    #[test]
    fn test_schedule_field_produces_consistent_diagnostics() {
        let grid = grid(365, &["COSMOS"]);
        let config = short_run(vec![FieldConfig::standard("COSMOS").unwrap()]);
        let steps = grid.field_steps("COSMOS").unwrap();

        let pipeline = PreschedPipeline::new();
        let schedule = pipeline
            .schedule_field(&config.fields[0], &steps, &config.run)
            .unwrap();

        assert_eq!(schedule.nights.len(), 365);
        assert_eq!(schedule.rates.len(), 365);
        assert_eq!(schedule.demand.values.len(), 365);
        assert_eq!(schedule.slots.len(), schedule.matched.event_count());
        assert!(!schedule.slots.is_empty());
        // Step 3 is sun-up and step 2 sits in its shadow; step 1 is deepest.
        assert!(schedule.slots.iter().all(|s| s.step_index % 4 == 1));
    }

    #[test]
    fn test_missing_field_is_skipped() {
        let grid = grid(30, &["COSMOS"]);
        let config = short_run(vec![
            FieldConfig::standard("COSMOS").unwrap(),
            FieldConfig::standard("ECDFS").unwrap(),
        ]);
        let result = PreschedPipeline::new().run(&config, &grid).unwrap();
        assert_eq!(result.schedules.len(), 1);
        assert_eq!(result.summary.skipped_fields, vec!["ECDFS".to_string()]);
    }

    #[test]
    fn test_invalid_field_does_not_block_others() {
        let grid = grid(365, &["COSMOS", "CUSTOM"]);
        let mut custom = FieldConfig::new("CUSTOM").with_position(10.0, -30.0);
        custom.bands.clear();
        let config = short_run(vec![FieldConfig::standard("COSMOS").unwrap(), custom]);

        let result = PreschedPipeline::new().run(&config, &grid).unwrap();
        assert!(!result.validation.is_valid);
        assert_eq!(result.summary.skipped_fields, vec!["CUSTOM".to_string()]);
        assert_eq!(result.schedules.len(), 1);

        let alone = PreschedPipeline::new()
            .run(&short_run(vec![FieldConfig::standard("COSMOS").unwrap()]), &grid)
            .unwrap();
        assert!(!alone.records.is_empty());
        assert_eq!(result.records, alone.records);
    }

    #[test]
    fn test_failed_field_is_skipped_without_validation() {
        let grid = grid(365, &["XMM_LSS", "NOWHERE"]);
        let config = short_run(vec![
            FieldConfig::new("NOWHERE"),
            FieldConfig::standard("XMM_LSS").unwrap(),
        ]);
        let pipeline = PreschedPipeline::with_config(PipelineConfig {
            validate: false,
            parallel: true,
        });

        let result = pipeline.run(&config, &grid).unwrap();
        assert_eq!(result.summary.skipped_fields, vec!["NOWHERE".to_string()]);
        assert_eq!(result.summary.fields[0].field, "XMM_LSS");
        assert!(result.records.iter().all(|r| r.field == "XMM_LSS"));
        assert!(!result.records.is_empty());
    }

    #[test]
    fn test_repeated_field_scheduled_once() {
        let grid = grid(365, &["ECDFS"]);
        let config = short_run(vec![
            FieldConfig::standard("ECDFS").unwrap(),
            FieldConfig::standard("ECDFS").unwrap(),
        ]);

        let result = PreschedPipeline::new().run(&config, &grid).unwrap();
        assert_eq!(result.schedules.len(), 1);
        assert_eq!(result.summary.skipped_fields, vec!["ECDFS".to_string()]);
        let keys: HashSet<_> = result.records.iter().map(|r| r.key()).collect();
        assert_eq!(keys.len(), result.records.len());
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let grid = grid(365, &["COSMOS", "XMM_LSS", "ECDFS"]);
        let config = short_run(vec![
            FieldConfig::standard("XMM_LSS").unwrap(),
            FieldConfig::standard("COSMOS").unwrap(),
            FieldConfig::standard("ECDFS").unwrap(),
        ]);

        let parallel = PreschedPipeline::new().run(&config, &grid).unwrap();
        let sequential = PreschedPipeline::with_config(PipelineConfig {
            validate: true,
            parallel: false,
        })
        .run(&config, &grid)
        .unwrap();

        assert_eq!(parallel.records, sequential.records);
        let order: Vec<&str> = parallel.summary.fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(order, vec!["XMM_LSS", "COSMOS", "ECDFS"]);
    }
}
