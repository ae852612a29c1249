//! Survey table: per-field, per-season sequence and visit budgets.
//!
//! A survey table is the usual way of describing a cadence strategy: one row
//! per (field, season bucket) with the target number of sequences, visits
//! per band and the season length. Rows are turned into [`FieldConfig`]s on
//! top of a base configuration, and whole rows can be copied between fields
//! and seasons to build rolling strategies.

use serde::{Deserialize, Serialize};

use super::field::FieldConfig;
use super::SchedulerConfig;
use crate::algorithms::expander::BandPlan;
use crate::core::domain::Band;
use crate::core::error::{PreschedError, PreschedResult};

/// One (field, season bucket) row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRow {
    pub field: String,
    /// 1-based season bucket.
    pub season: u32,
    pub season_seq: u32,
    #[serde(default)]
    pub u: u32,
    #[serde(default)]
    pub g: u32,
    #[serde(default)]
    pub r: u32,
    #[serde(default)]
    pub i: u32,
    #[serde(default)]
    pub z: u32,
    #[serde(default)]
    pub y: u32,
    /// Season length in days.
    pub season_length: f64,
}

impl SurveyRow {
    pub fn visits(&self, band: Band) -> u32 {
        match band {
            Band::U => self.u,
            Band::G => self.g,
            Band::R => self.r,
            Band::I => self.i,
            Band::Z => self.z,
            Band::Y => self.y,
        }
    }

    /// Visits of one sequence, all bands.
    pub fn sequence_visits(&self) -> u32 {
        Band::ALL.iter().map(|&b| self.visits(b)).sum()
    }
}

/// Ordered collection of survey rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyTable {
    pub rows: Vec<SurveyRow>,
}

impl SurveyTable {
    pub fn new(rows: Vec<SurveyRow>) -> Self {
        Self { rows }
    }

    /// Field names in order of first appearance.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in &self.rows {
            if !names.contains(&row.field) {
                names.push(row.field.clone());
            }
        }
        names
    }

    /// Rows of one field, ordered by season.
    pub fn field_rows(&self, field: &str) -> Vec<&SurveyRow> {
        let mut rows: Vec<&SurveyRow> = self.rows.iter().filter(|r| r.field == field).collect();
        rows.sort_by_key(|r| r.season);
        rows
    }

    /// Total visits over all rows, counting one sequence per target.
    pub fn total_visits(&self) -> u64 {
        self.rows
            .iter()
            .map(|r| u64::from(r.season_seq) * u64::from(r.sequence_visits()))
            .sum()
    }

    /// Apply this field's rows to `base`: per-season targets, visit tables
    /// and season lengths. Snap counts keep the base's per-band value.
    pub fn apply_to_field(&self, base: &FieldConfig) -> PreschedResult<FieldConfig> {
        let rows = self.field_rows(&base.name);
        if rows.is_empty() {
            return Err(PreschedError::ConfigurationError(format!(
                "Survey table has no rows for field '{}'",
                base.name
            )));
        }

        let mut field = base.clone();
        field.demand.season_seq = rows.iter().map(|r| r.season_seq).collect();
        field.season_length = rows
            .iter()
            .map(|r| qtty::Days::new(r.season_length))
            .collect();
        field.bands = Band::ALL
            .iter()
            .map(|&band| {
                let snaps = base
                    .band_plan(band)
                    .map(|plan| plan.snaps.clone())
                    .unwrap_or_else(|| vec![if band == Band::U { 1 } else { 2 }]);
                let visits = rows.iter().map(|r| r.visits(band)).collect();
                BandPlan::new(band, visits, snaps)
            })
            .collect();
        Ok(field)
    }

    /// Configuration with one field per table field, in table order.
    ///
    /// Each field starts from its entry in `base` if present, else from its
    /// standard configuration, else from plain defaults.
    pub fn to_scheduler_config(&self, base: &SchedulerConfig) -> PreschedResult<SchedulerConfig> {
        let fields = self
            .field_names()
            .iter()
            .map(|name| {
                let start = base
                    .field(name)
                    .cloned()
                    .or_else(|| FieldConfig::standard(name))
                    .unwrap_or_else(|| FieldConfig::new(name.clone()));
                self.apply_to_field(&start)
            })
            .collect::<PreschedResult<Vec<_>>>()?;

        Ok(SchedulerConfig {
            run: base.run.clone(),
            fields,
        })
    }

    /// Copy the content of one (field, season) row onto another, keeping
    /// the destination's field and season.
    pub fn copy_season(
        &mut self,
        from: (&str, u32),
        to: (&str, u32),
    ) -> PreschedResult<()> {
        let source = self
            .rows
            .iter()
            .find(|r| r.field == from.0 && r.season == from.1)
            .cloned()
            .ok_or_else(|| {
                PreschedError::InvalidInput(format!(
                    "No survey row for {} season {}",
                    from.0, from.1
                ))
            })?;

        let mut found = false;
        for row in self
            .rows
            .iter_mut()
            .filter(|r| r.field == to.0 && r.season == to.1)
        {
            *row = SurveyRow {
                field: row.field.clone(),
                season: row.season,
                ..source.clone()
            };
            found = true;
        }
        if !found {
            return Err(PreschedError::InvalidInput(format!(
                "No survey row for {} season {}",
                to.0, to.1
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(field: &str, season: u32, seq: u32, g: u32) -> SurveyRow {
        SurveyRow {
            field: field.to_string(),
            season,
            season_seq: seq,
            u: 2,
            g,
            r: 4,
            i: 4,
            z: 4,
            y: 4,
            season_length: 180.0,
        }
    }

    fn table() -> SurveyTable {
        SurveyTable::new(vec![
            row("XMM_LSS", 2, 20, 6),
            row("XMM_LSS", 1, 10, 5),
            row("ECDFS", 1, 30, 7),
            row("ECDFS", 2, 40, 8),
        ])
    }

    #[test]
    fn test_field_rows_sorted_by_season() {
        let t = table();
        assert_eq!(t.field_names(), vec!["XMM_LSS", "ECDFS"]);
        let seasons: Vec<u32> = t.field_rows("XMM_LSS").iter().map(|r| r.season).collect();
        assert_eq!(seasons, vec![1, 2]);
        assert_eq!(t.total_visits(), 10 * 23 + 20 * 24 + 30 * 25 + 40 * 26);
    }

    #[test]
    fn test_apply_to_field() {
        let base = FieldConfig::standard("XMM_LSS").unwrap();
        let field = table().apply_to_field(&base).unwrap();
        assert_eq!(field.demand.season_seq, vec![10, 20]);
        assert_eq!(field.band_plan(Band::G).unwrap().visits, vec![5, 6]);
        assert_eq!(field.band_plan(Band::U).unwrap().snaps, vec![1]);
        assert_eq!(field.season_length.len(), 2);

        let missing = FieldConfig::standard("COSMOS").unwrap();
        assert!(table().apply_to_field(&missing).is_err());
    }

    #[test]
    fn test_to_scheduler_config_uses_table_fields() {
        let config = table()
            .to_scheduler_config(&SchedulerConfig::default_ddfs())
            .unwrap();
        let names: Vec<&str> = config.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["XMM_LSS", "ECDFS"]);
    }

    #[test]
    fn test_copy_season_keeps_destination_identity() {
        let mut t = table();
        t.copy_season(("XMM_LSS", 2), ("ECDFS", 2)).unwrap();
        let ecdfs = t.field_rows("ECDFS");
        assert_eq!(ecdfs[1].field, "ECDFS");
        assert_eq!(ecdfs[1].season, 2);
        assert_eq!(ecdfs[1].season_seq, 20);
        assert_eq!(ecdfs[1].g, 6);

        assert!(t.copy_season(("XMM_LSS", 9), ("ECDFS", 1)).is_err());
        assert!(t.copy_season(("XMM_LSS", 1), ("COSMOS", 1)).is_err());
    }
}
