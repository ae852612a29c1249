//! Scheduling algorithms.
//!
//! The per-field pipeline, leaf first:
//!
//! - [`availability`]: per-step and per-night availability masks
//! - [`rate`]: season fraction to demand-rate multiplier
//! - [`demand`]: cumulative demand curve with length scaling and boosts
//! - [`matcher`]: greedy matching of the demand curve to available nights
//! - [`slots`]: best time step within each chosen night
//! - [`expander`]: season buckets and per-band visit records
//!
//! # Example
//!
//! ```
//! use ddf_presched::algorithms::match_cumulative;
//!
//! let desired = [0.0, 0.4, 1.0, 1.6, 2.0];
//! let mask = [true, true, false, true, true];
//! let outcome = match_cumulative(&desired, &mask);
//! assert_eq!(outcome.event_count(), 2);
//! ```

pub mod availability;
pub mod demand;
pub mod expander;
pub mod matcher;
pub mod rate;
pub mod slots;

pub use availability::{build_availability, Availability, VisibilityLimits};
pub use demand::{build_demand_curve, DemandCurve, DemandSettings, SeasonDemand};
pub use expander::{assign_season_buckets, expand_visits, BandPlan, VisitTarget, VisitTemplate};
pub use matcher::{match_cumulative, MatchOutcome};
pub use rate::{rate_profile, SeasonShape};
pub use slots::{select_slots, ChosenSlot};
