//! Per-field configuration.

use serde::{Deserialize, Serialize};

use crate::algorithms::availability::VisibilityLimits;
use crate::algorithms::demand::DemandSettings;
use crate::algorithms::expander::{BandPlan, VisitTarget};
use crate::algorithms::rate::SeasonShape;
use crate::astro::catalog::{ddf_location, linked_partner_name};
use crate::core::domain::{Band, SkyPosition};
use crate::core::error::{PreschedError, PreschedResult};

/// Second pointing of a linked pair. Shares the primary's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedField {
    pub name: String,
    /// Falls back to the standard catalogue when absent.
    #[serde(default)]
    pub position: Option<SkyPosition>,
    /// Emit the primary's records without the moon-distance guard.
    #[serde(default = "default_true")]
    pub omit_primary_moon_guard: bool,
}

fn default_true() -> bool {
    true
}

impl LinkedField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
            omit_primary_moon_guard: true,
        }
    }

    pub fn resolved_position(&self) -> Option<SkyPosition> {
        self.position.or_else(|| ddf_location(&self.name))
    }
}

/// Static parameters of one deep-drilling field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    /// Falls back to the standard catalogue when absent.
    #[serde(default)]
    pub position: Option<SkyPosition>,
    #[serde(default)]
    pub limits: VisibilityLimits,
    #[serde(default)]
    pub shape: SeasonShape,
    #[serde(default)]
    pub demand: DemandSettings,
    #[serde(default = "default_band_plans")]
    pub bands: Vec<BandPlan>,
    /// Season length cutoff per season bucket.
    #[serde(default = "default_season_length")]
    pub season_length: Vec<qtty::Days>,
    #[serde(default)]
    pub linked: Option<LinkedField>,
}

/// Standard sequence: visits and snaps per band.
pub fn default_band_plans() -> Vec<BandPlan> {
    [
        (Band::U, 8, 1),
        (Band::G, 10, 2),
        (Band::R, 20, 2),
        (Band::I, 20, 2),
        (Band::Z, 24, 2),
        (Band::Y, 18, 2),
    ]
    .into_iter()
    .map(|(band, visits, snaps)| BandPlan::uniform(band, visits, snaps))
    .collect()
}

fn default_season_length() -> Vec<qtty::Days> {
    vec![qtty::Days::new(200.0); 10]
}

impl FieldConfig {
    /// A field with default parameters and no explicit position.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
            limits: VisibilityLimits::default(),
            shape: SeasonShape::default(),
            demand: DemandSettings::default(),
            bands: default_band_plans(),
            season_length: default_season_length(),
            linked: None,
        }
    }

    /// Default configuration of a standard field, `None` for unknown names.
    pub fn standard(name: &str) -> Option<Self> {
        let position = ddf_location(name)?;
        let mut field = Self::new(name);
        field.position = Some(position);

        if name == "COSMOS" {
            field.demand.boost_early_factor = Some(5.0);
            field.demand.boost_factor_third = 2.0;
        }
        if let Some(partner) = linked_partner_name(name) {
            if ddf_location(&partner).is_some() {
                field.linked = Some(LinkedField::new(partner));
            }
        }
        Some(field)
    }

    pub fn with_position(mut self, ra_deg: f64, dec_deg: f64) -> Self {
        self.position = Some(SkyPosition::new(ra_deg, dec_deg));
        self
    }

    /// Explicit position, else the catalogue position.
    pub fn resolved_position(&self) -> Option<SkyPosition> {
        self.position.or_else(|| ddf_location(&self.name))
    }

    /// Pointings records are emitted for: the field itself, then its
    /// linked partner if any.
    pub fn visit_targets(&self) -> PreschedResult<Vec<VisitTarget>> {
        let position = self.resolved_position().ok_or_else(|| {
            PreschedError::ConfigurationError(format!("No position for field '{}'", self.name))
        })?;
        let mut primary = VisitTarget::new(self.name.clone(), position);

        let Some(linked) = &self.linked else {
            return Ok(vec![primary]);
        };
        let partner_position = linked.resolved_position().ok_or_else(|| {
            PreschedError::ConfigurationError(format!(
                "No position for linked field '{}' of '{}'",
                linked.name, self.name
            ))
        })?;
        if linked.omit_primary_moon_guard {
            primary = primary.without_moon_guard();
        }
        Ok(vec![
            primary,
            VisitTarget::new(linked.name.clone(), partner_position),
        ])
    }

    pub fn band_plan(&self, band: Band) -> Option<&BandPlan> {
        self.bands.iter().find(|plan| plan.band == band)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_cosmos_is_boosted() {
        let cosmos = FieldConfig::standard("COSMOS").unwrap();
        assert_eq!(cosmos.demand.boost_early_factor, Some(5.0));
        assert_eq!(cosmos.demand.boost_factor_third, 2.0);
        assert!(cosmos.linked.is_none());

        let ecdfs = FieldConfig::standard("ECDFS").unwrap();
        assert_eq!(ecdfs.demand.boost_early_factor, None);
        assert!(FieldConfig::standard("NOWHERE").is_none());
    }

    #[test]
    fn test_edfs_pair_targets() {
        let edfs = FieldConfig::standard("EDFS_a").unwrap();
        let targets = edfs.visit_targets().unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].name, "EDFS_a");
        assert!(!targets[0].moon_guard);
        assert_eq!(targets[1].name, "EDFS_b");
        assert!(targets[1].moon_guard);
    }

    #[test]
    fn test_unknown_field_needs_position() {
        let field = FieldConfig::new("CUSTOM");
        assert!(matches!(
            field.visit_targets(),
            Err(PreschedError::ConfigurationError(_))
        ));

        let placed = FieldConfig::new("CUSTOM").with_position(10.0, -30.0);
        assert_eq!(placed.visit_targets().unwrap().len(), 1);
    }

    #[test]
    fn test_default_sequence_has_100_visits() {
        let field = FieldConfig::new("X");
        let total: u32 = field
            .bands
            .iter()
            .map(|p| p.visits_in(crate::core::domain::SeasonBucket::FIRST))
            .sum();
        assert_eq!(total, 100);
        assert_eq!(field.band_plan(Band::U).unwrap().snaps, vec![1]);
    }

    #[test]
    fn test_field_from_toml() {
        let field: FieldConfig = toml::from_str(
            r#"
            name = "ELAISS1"

            [limits]
            airmass_limit = 2.0
            depth_limit = -inf

            [demand]
            season_seq = [20, 25]

            [[bands]]
            band = "g"
            visits = [4, 6]
            snaps = [2]
            "#,
        )
        .unwrap();
        assert_eq!(field.limits.airmass_limit, 2.0);
        assert_eq!(field.limits.depth_limit, Some(f64::NEG_INFINITY));
        assert_eq!(field.demand.season_seq, vec![20, 25]);
        assert_eq!(field.bands.len(), 1);
        assert!(field.resolved_position().is_some());
        assert_eq!(field.season_length.len(), 10);
    }
}
