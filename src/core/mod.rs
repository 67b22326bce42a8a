//! Core domain models for source builds
//!
//! This module defines the data structures a source build step is
//! configured with and the pure logic that turns them into a build request.

pub mod arch;
pub mod config;
pub mod link;
pub mod refs;
pub mod spec;

pub use arch::ArchitectureSet;
pub use config::{BuildInputConfig, CloneAuthConfig, CloneAuthType, ResourceConfiguration, SourceBuildConfig};
pub use link::StepLink;
pub use refs::{resolve_workdir_ref, InputDefinition, JobSpec, SourceRef};
pub use spec::{BuildSpec, BuildSpecBuilder, NoSourceError};
