//! Season-bucket visit expander.
//!
//! Groups the chosen observation times of a field into season buckets by
//! gap detection, trims each bucket to its configured season length and
//! emits one [`ObservationRecord`] per visit per band.

use serde::{Deserialize, Serialize};

use crate::core::domain::{Band, ObservationRecord, SeasonBucket, SkyPosition};
use crate::time::ModifiedJulianDate;

/// Visit and snap counts of one band, per season bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPlan {
    pub band: Band,
    /// Visits per chosen night, indexed by bucket.
    pub visits: Vec<u32>,
    /// Exposures per visit, indexed by bucket.
    pub snaps: Vec<u32>,
}

impl BandPlan {
    pub fn new(band: Band, visits: Vec<u32>, snaps: Vec<u32>) -> Self {
        Self {
            band,
            visits,
            snaps,
        }
    }

    /// Same counts for every bucket.
    pub fn uniform(band: Band, visits: u32, snaps: u32) -> Self {
        Self::new(band, vec![visits], vec![snaps])
    }

    pub fn visits_in(&self, bucket: SeasonBucket) -> u32 {
        bucket.lookup(&self.visits).copied().unwrap_or(0)
    }

    pub fn snaps_in(&self, bucket: SeasonBucket) -> u32 {
        bucket.lookup(&self.snaps).copied().unwrap_or(1)
    }
}

/// Run-wide values stamped on every emitted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitTemplate {
    /// How long a scheduled visit stays valid after its time.
    pub flush_window: qtty::Days,
    pub exptime: qtty::Seconds,
    pub mjd_tol: qtty::Minutes,
    pub dist_tol: qtty::Degrees,
    pub ha_min: qtty::HourAngles,
    pub ha_max: qtty::HourAngles,
    pub alt_min: qtty::Degrees,
    pub alt_max: qtty::Degrees,
    pub sun_alt_max: qtty::Degrees,
    pub moon_min_distance: qtty::Degrees,
    /// Gap between chosen times that starts a new season bucket.
    pub season_gap: qtty::Days,
    pub science_program: String,
    pub observation_reason: String,
    pub target_prefix: String,
}

impl Default for VisitTemplate {
    fn default() -> Self {
        Self {
            flush_window: qtty::Days::new(2.0),
            exptime: qtty::Seconds::new(30.0),
            mjd_tol: qtty::Minutes::new(15.0),
            dist_tol: qtty::Degrees::new(3.0),
            ha_min: qtty::HourAngles::new(21.0),
            ha_max: qtty::HourAngles::new(3.0),
            alt_min: qtty::Degrees::new(25.0),
            alt_max: qtty::Degrees::new(85.0),
            sun_alt_max: qtty::Degrees::new(-18.0),
            moon_min_distance: qtty::Degrees::new(25.0),
            season_gap: qtty::Days::new(50.0),
            science_program: "DD".to_string(),
            observation_reason: "FBS".to_string(),
            target_prefix: "DD:".to_string(),
        }
    }
}

/// One physical pointing records are emitted for.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitTarget {
    pub name: String,
    pub position: SkyPosition,
    /// Whether records carry the moon-distance guard.
    pub moon_guard: bool,
}

impl VisitTarget {
    pub fn new(name: impl Into<String>, position: SkyPosition) -> Self {
        Self {
            name: name.into(),
            position,
            moon_guard: true,
        }
    }

    pub fn without_moon_guard(mut self) -> Self {
        self.moon_guard = false;
        self
    }
}

/// Season bucket of each time in a sorted sequence. A gap strictly larger
/// than `gap` starts a new bucket; the first bucket is 1.
pub fn assign_season_buckets(mjds: &[ModifiedJulianDate], gap: qtty::Days) -> Vec<SeasonBucket> {
    let mut buckets = Vec::with_capacity(mjds.len());
    let mut current = SeasonBucket::FIRST;
    for (i, mjd) in mjds.iter().enumerate() {
        if i > 0 && (*mjd - mjds[i - 1]).value() > gap.value() {
            current = current.next();
        }
        buckets.push(current);
    }
    buckets
}

/// Drop times lying further than the bucket's season length from the
/// bucket's first time. An empty `season_length` table disables the cut.
pub fn apply_season_length(
    mjds: &[ModifiedJulianDate],
    buckets: &[SeasonBucket],
    season_length: &[qtty::Days],
) -> Vec<(ModifiedJulianDate, SeasonBucket)> {
    let mut kept = Vec::with_capacity(mjds.len());
    let mut bucket_start: Option<(SeasonBucket, ModifiedJulianDate)> = None;

    for (&mjd, &bucket) in mjds.iter().zip(buckets) {
        let start = match bucket_start {
            Some((b, start)) if b == bucket => start,
            _ => {
                bucket_start = Some((bucket, mjd));
                mjd
            }
        };
        let within = bucket
            .lookup(season_length)
            .map_or(true, |limit| (mjd - start).value() <= limit.value());
        if within {
            kept.push((mjd, bucket));
        }
    }
    kept
}

fn build_record(
    target: &VisitTarget,
    mjd: ModifiedJulianDate,
    bucket: SeasonBucket,
    band: Band,
    nexp: u32,
    visit: u32,
    template: &VisitTemplate,
) -> ObservationRecord {
    let label = format!("{}{}", template.target_prefix, target.name);
    ObservationRecord {
        field: target.name.clone(),
        target_name: label.clone(),
        scheduler_note: label,
        science_program: template.science_program.clone(),
        observation_reason: template.observation_reason.clone(),
        ra: target.position.ra.to::<qtty::Radian>(),
        dec: target.position.dec.to::<qtty::Radian>(),
        mjd,
        flush_by_mjd: mjd + template.flush_window,
        exptime: template.exptime,
        band,
        nexp,
        mjd_tol: template.mjd_tol.to::<qtty::Day>(),
        dist_tol: template.dist_tol.to::<qtty::Radian>(),
        ha_min: template.ha_min,
        ha_max: template.ha_max,
        alt_min: template.alt_min.to::<qtty::Radian>(),
        alt_max: template.alt_max.to::<qtty::Radian>(),
        sun_alt_max: template.sun_alt_max.to::<qtty::Radian>(),
        moon_min_distance: target
            .moon_guard
            .then(|| template.moon_min_distance.to::<qtty::Radian>()),
        season_bucket: bucket,
        visit,
    }
}

/// Expand chosen observation times into visit records.
///
/// `targets` holds one entry for an ordinary field and two for a linked
/// pair; every target gets the same visits at the same times. Records are
/// ordered by time, then band in `bands` order, then target, then visit.
/// A band listed twice is emitted once, with the visit counts summed.
pub fn expand_visits(
    targets: &[VisitTarget],
    mjds: &[ModifiedJulianDate],
    bands: &[BandPlan],
    season_length: &[qtty::Days],
    template: &VisitTemplate,
) -> Vec<ObservationRecord> {
    let mut sorted = mjds.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let buckets = assign_season_buckets(&sorted, template.season_gap);
    let kept = apply_season_length(&sorted, &buckets, season_length);

    let mut records = Vec::new();
    for (mjd, bucket) in kept {
        for (band, visits, nexp) in bucket_counts(bands, bucket) {
            for target in targets {
                for visit in 0..visits {
                    records.push(build_record(
                        target, mjd, bucket, band, nexp, visit, template,
                    ));
                }
            }
        }
    }
    records
}

/// `(band, visits, snaps)` per distinct band in `bands` order. Plans
/// repeating a band add their visits to the first plan of that band, whose
/// snap count is kept.
fn bucket_counts(bands: &[BandPlan], bucket: SeasonBucket) -> Vec<(Band, u32, u32)> {
    let mut counts: Vec<(Band, u32, u32)> = Vec::with_capacity(bands.len());
    for plan in bands {
        let visits = plan.visits_in(bucket);
        match counts.iter_mut().find(|(band, _, _)| *band == plan.band) {
            Some((_, total, _)) => *total += visits,
            None => counts.push((plan.band, visits, plan.snaps_in(bucket))),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mjds(values: &[f64]) -> Vec<ModifiedJulianDate> {
        values.iter().map(|&v| ModifiedJulianDate::new(v)).collect()
    }

    #[test]
    fn test_bucket_increments_across_large_gap() {
        let times = mjds(&[0.0, 10.0, 20.0, 80.0, 90.0, 140.0, 191.0]);
        let buckets = assign_season_buckets(&times, qtty::Days::new(50.0));
        let raw: Vec<u32> = buckets.iter().map(|b| b.0).collect();
        assert_eq!(raw, vec![1, 1, 1, 2, 2, 2, 3]);
    }

    #[test]
    fn test_single_time_is_first_bucket() {
        let buckets = assign_season_buckets(&mjds(&[5.0]), qtty::Days::new(50.0));
        assert_eq!(buckets, vec![SeasonBucket::FIRST]);
        assert!(assign_season_buckets(&[], qtty::Days::new(50.0)).is_empty());
    }

    #[test]
    fn test_season_length_cut_per_bucket() {
        let times = mjds(&[0.0, 30.0, 45.0, 200.0, 230.0, 260.0]);
        let buckets = assign_season_buckets(&times, qtty::Days::new(50.0));
        let lengths = [qtty::Days::new(40.0), qtty::Days::new(30.0)];
        let kept: Vec<f64> = apply_season_length(&times, &buckets, &lengths)
            .iter()
            .map(|(m, _)| m.value())
            .collect();
        assert_eq!(kept, vec![0.0, 30.0, 200.0, 230.0]);
    }

    #[test]
    fn test_record_counts_and_units() {
        let targets = [VisitTarget::new("COSMOS", SkyPosition::new(150.1, 2.18))];
        let bands = [
            BandPlan::uniform(Band::G, 2, 2),
            BandPlan::new(Band::U, vec![1, 3], vec![1]),
        ];
        let template = VisitTemplate::default();
        let records = expand_visits(&targets, &mjds(&[100.0, 200.0]), &bands, &[], &template);

        // Night 1 is bucket 1 (g2 + u1), night 2 is bucket 2 (g2 + u3).
        assert_eq!(records.len(), 8);
        let first = &records[0];
        assert_eq!(first.band, Band::G);
        assert_eq!(first.nexp, 2);
        assert_eq!(first.target_name, "DD:COSMOS");
        assert_eq!(first.scheduler_note, "DD:COSMOS");
        assert!((first.flush_by_mjd.value() - 102.0).abs() < 1e-12);
        assert!((first.ra.value() - 150.1_f64.to_radians()).abs() < 1e-12);
        assert!((first.mjd_tol.value() - 15.0 / 1440.0).abs() < 1e-12);
        assert!(first.moon_min_distance.is_some());

        let late_u: Vec<_> = records
            .iter()
            .filter(|r| r.band == Band::U && r.season_bucket == SeasonBucket(2))
            .collect();
        assert_eq!(late_u.len(), 3);
        assert_eq!(late_u.iter().map(|r| r.visit).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_linked_pair_emits_parallel_sets() {
        let targets = [
            VisitTarget::new("EDFS_a", SkyPosition::new(58.9, -49.315)).without_moon_guard(),
            VisitTarget::new("EDFS_b", SkyPosition::new(63.6, -47.6)),
        ];
        let bands = [BandPlan::uniform(Band::R, 2, 2)];
        let records = expand_visits(
            &targets,
            &mjds(&[100.0]),
            &bands,
            &[],
            &VisitTemplate::default(),
        );

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].field, "EDFS_a");
        assert!(records[0].moon_min_distance.is_none());
        assert_eq!(records[2].field, "EDFS_b");
        assert_eq!(records[2].target_name, "DD:EDFS_b");
        assert!(records[2].moon_min_distance.is_some());
        assert_eq!(records[0].mjd, records[2].mjd);
    }

    #[test]
    fn test_repeated_band_is_merged() {
        let targets = [VisitTarget::new("ELAISS1", SkyPosition::new(9.45, -44.0))];
        let bands = [
            BandPlan::uniform(Band::G, 2, 2),
            BandPlan::uniform(Band::R, 1, 2),
            BandPlan::uniform(Band::G, 2, 1),
        ];
        let records = expand_visits(
            &targets,
            &mjds(&[100.0, 101.0]),
            &bands,
            &[],
            &VisitTemplate::default(),
        );

        let keys: std::collections::HashSet<_> = records.iter().map(|r| r.key()).collect();
        assert_eq!(records.len(), 10);
        assert_eq!(keys.len(), records.len());

        let night: Vec<_> = records.iter().take(5).map(|r| (r.band, r.visit, r.nexp)).collect();
        assert_eq!(
            night,
            vec![
                (Band::G, 0, 2),
                (Band::G, 1, 2),
                (Band::G, 2, 2),
                (Band::G, 3, 2),
                (Band::R, 0, 2),
            ]
        );
    }

    #[test]
    fn test_no_times_no_records() {
        let targets = [VisitTarget::new("XMM_LSS", SkyPosition::new(35.7, -4.75))];
        let bands = [BandPlan::uniform(Band::Z, 24, 2)];
        let records = expand_visits(&targets, &[], &bands, &[], &VisitTemplate::default());
        assert!(records.is_empty());
    }
}
