//! srcbuild - builds a job's git checkout into the pipeline root image

pub mod build;
pub mod cli;
pub mod core;
pub mod step;

// Re-export commonly used types
pub use crate::build::{BuildDelegate, BuildError, ImageBuildOptions, RunContext};
pub use crate::core::{BuildSpec, JobSpec, SourceRef, SourceBuildConfig, StepLink};
pub use crate::step::{GitSourceStep, MultiArchStep, Step, StepError, StepFailure};
