//! Configuration checks and the per-field prescheduling pipeline.

pub mod pipeline;
pub mod validator;

pub use pipeline::{
    generate_scheduled_obs, FieldSchedule, FieldSummary, PipelineConfig, PipelineResult,
    PreschedPipeline, RunSummary,
};
pub use validator::{ConfigValidator, ValidationResult, ValidationStats};
