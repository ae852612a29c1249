//! Core domain models for deep-drilling-field prescheduling.
//!
//! This module defines the fundamental data structures used throughout the
//! crate, plus the crate-wide error type.

pub mod domain;
pub mod error;

pub use domain::{
    Band, Night, ObservationRecord, SeasonBucket, SeasonFraction, SkyPosition, TimeStep,
};
pub use error::{PreschedError, PreschedResult};
