//! Step capability contract
//!
//! Every kind of pipeline step implements [`Step`]. A scheduler reads
//! [`Step::requires`] and [`Step::creates`] to order steps and then calls
//! [`Step::run`]; steps never order themselves.

pub mod git_source;

use crate::build::{BuildClient, BuildDelegate, BuildError, MetricsSink, ObjectRef, PodClient, RunContext};
use crate::core::{InputDefinition, NoSourceError, StepLink};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use thiserror::Error;

pub use git_source::GitSourceStep;

/// Error types for step operations
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    NoSource(#[from] NoSourceError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// A failed run, tagged with a fixed reason for classification
#[derive(Debug, Error)]
#[error("{source}")]
pub struct StepFailure {
    pub reason: &'static str,
    #[source]
    pub source: StepError,
}

impl StepFailure {
    pub fn for_reason(reason: &'static str, source: StepError) -> Self {
        Self { reason, source }
    }
}

/// Deferred lookup of a runtime value another step can consume
pub type ParameterLookup = Arc<dyn Fn() -> Result<String, StepError> + Send + Sync>;

/// Parameters a step exposes, keyed by name
pub type ParameterMap = HashMap<String, ParameterLookup>;

/// One unit of work in a build pipeline
#[async_trait]
pub trait Step: Send + Sync {
    /// Inputs used to key caches of this step's output
    fn inputs(&self) -> Result<InputDefinition, StepError>;

    /// Pre-flight checks
    fn validate(&self) -> Result<(), StepError>;

    async fn run(&self, ctx: &RunContext) -> Result<(), StepFailure>;

    fn name(&self) -> String;

    fn description(&self) -> String;

    /// Links consumed by this step; stable for the step's lifetime
    fn requires(&self) -> Vec<StepLink>;

    /// Links produced by this step; stable for the step's lifetime
    fn creates(&self) -> Vec<StepLink>;

    fn provides(&self) -> ParameterMap;

    /// Platform objects created while running
    fn objects(&self) -> Vec<ObjectRef>;
}

/// Steps whose build can fan out across CPU architectures
pub trait MultiArchStep: Step {
    /// Current architecture set
    fn resolve_multi_arch(&self) -> BTreeSet<String>;

    /// Widen the architecture set; duplicates are ignored
    fn add_architectures(&self, archs: &[String]);
}

/// Handles a build step hands its request to
#[derive(Clone)]
pub struct BuildCollaborators {
    pub delegate: Arc<dyn BuildDelegate>,
    pub build_client: Arc<dyn BuildClient>,
    pub pod_client: Arc<dyn PodClient>,
    pub metrics: Arc<dyn MetricsSink>,
}
