//! Visibility grid format.
//!
//! The grid is columnar JSON: shared `mjd`, `sun_alt` (degrees) and `night`
//! columns, plus one block of columns per field:
//!
//! ```json
//! {
//!   "mjd": [60796.0, 60796.0104],
//!   "sun_alt": [-25.1, -27.9],
//!   "night": [1, 1],
//!   "fields": {
//!     "COSMOS": { "airmass": [1.3, 1.2], "sky_g": [21.9, 22.0], "m5_g": [24.1, null] }
//!   }
//! }
//! ```
//!
//! `null` marks a value the ephemeris could not compute.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::domain::TimeStep;
use crate::core::error::{PreschedError, PreschedResult};
use crate::time::ModifiedJulianDate;

/// Per-field columns of the grid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldColumns {
    /// Missing airmass is treated as below the horizon.
    pub airmass: Vec<Option<f64>>,
    /// Sky brightness; may be omitted entirely.
    #[serde(default, alias = "sky", alias = "skybrightness")]
    pub sky_g: Vec<Option<f64>>,
    /// Five-sigma depth.
    #[serde(alias = "m5", alias = "depth")]
    pub m5_g: Vec<Option<f64>>,
}

/// Ephemeris samples for every field on a shared time axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisibilityGrid {
    pub mjd: Vec<f64>,
    pub sun_alt: Vec<f64>,
    pub night: Vec<i64>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldColumns>,
}

impl VisibilityGrid {
    pub fn len(&self) -> usize {
        self.mjd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mjd.is_empty()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Check column lengths and time ordering.
    pub fn validate(&self) -> PreschedResult<()> {
        let n = self.mjd.len();
        check_length("sun_alt", self.sun_alt.len(), n)?;
        check_length("night", self.night.len(), n)?;
        for (name, columns) in &self.fields {
            check_length(&format!("{}.airmass", name), columns.airmass.len(), n)?;
            check_length(&format!("{}.m5_g", name), columns.m5_g.len(), n)?;
            if !columns.sky_g.is_empty() {
                check_length(&format!("{}.sky_g", name), columns.sky_g.len(), n)?;
            }
        }
        if let Some(i) = self.mjd.windows(2).position(|w| !(w[1] >= w[0])) {
            return Err(PreschedError::GridError(format!(
                "mjd column is not sorted at row {}",
                i + 1
            )));
        }
        Ok(())
    }

    /// First and last timestamps.
    pub fn mjd_range(&self) -> Option<(ModifiedJulianDate, ModifiedJulianDate)> {
        match (self.mjd.first(), self.mjd.last()) {
            (Some(&first), Some(&last)) => Some((first.into(), last.into())),
            _ => None,
        }
    }

    /// Whether the grid spans the whole window `[start, end]`.
    pub fn covers(&self, start: ModifiedJulianDate, end: ModifiedJulianDate) -> bool {
        self.mjd_range()
            .map_or(false, |(first, last)| first <= start && last >= end)
    }

    /// Rows with `start <= mjd <= end`.
    pub fn crop(&self, start: ModifiedJulianDate, end: ModifiedJulianDate) -> VisibilityGrid {
        let keep: Vec<usize> = self
            .mjd
            .iter()
            .enumerate()
            .filter(|(_, &m)| m >= start.value() && m <= end.value())
            .map(|(i, _)| i)
            .collect();

        let fields = self
            .fields
            .iter()
            .map(|(name, columns)| {
                let cropped = FieldColumns {
                    airmass: pick(&columns.airmass, &keep),
                    sky_g: if columns.sky_g.is_empty() {
                        Vec::new()
                    } else {
                        pick(&columns.sky_g, &keep)
                    },
                    m5_g: pick(&columns.m5_g, &keep),
                };
                (name.clone(), cropped)
            })
            .collect();

        VisibilityGrid {
            mjd: pick(&self.mjd, &keep),
            sun_alt: pick(&self.sun_alt, &keep),
            night: pick(&self.night, &keep),
            fields,
        }
    }

    /// Time steps of one field, `None` if the grid has no such field.
    pub fn field_steps(&self, name: &str) -> Option<Vec<TimeStep>> {
        let columns = self.fields.get(name)?;
        let steps = (0..self.len())
            .map(|i| TimeStep {
                mjd: ModifiedJulianDate::new(self.mjd[i]),
                sun_alt: qtty::Degrees::new(self.sun_alt.get(i).copied().unwrap_or(f64::NAN)),
                airmass: columns
                    .airmass
                    .get(i)
                    .copied()
                    .flatten()
                    .unwrap_or(f64::INFINITY),
                sky_brightness: columns.sky_g.get(i).copied().flatten(),
                depth: columns.m5_g.get(i).copied().flatten(),
                night: self.night.get(i).copied().unwrap_or(i64::MIN),
            })
            .collect();
        Some(steps)
    }
}

fn check_length(column: &str, found: usize, expected: usize) -> PreschedResult<()> {
    if found != expected {
        return Err(PreschedError::GridError(format!(
            "column '{}' has {} rows, expected {}",
            column, found, expected
        )));
    }
    Ok(())
}

fn pick<T: Copy>(values: &[T], keep: &[usize]) -> Vec<T> {
    keep.iter().filter_map(|&i| values.get(i).copied()).collect()
}

/// Parse and validate a grid from JSON text.
pub fn parse_grid_str(json: &str) -> PreschedResult<VisibilityGrid> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    let grid: VisibilityGrid = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| PreschedError::ParseError(format!("at '{}': {}", e.path(), e.inner())))?;
    grid.validate()?;
    Ok(grid)
}
