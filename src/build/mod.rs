//! Contracts for the collaborators that execute builds

pub mod dry_run;
pub mod error;

use crate::core::BuildSpec;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use dry_run::{DryRunDelegate, InMemoryBuildClient, RecordingMetrics};
pub use error::BuildError;

/// Reference to a platform object a client created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

/// Handle used to create and watch build objects
pub trait BuildClient: Send + Sync {
    /// Create an object on the platform
    fn create(&self, object: ObjectRef) -> Result<(), BuildError>;

    /// Objects created through this client so far
    fn objects(&self) -> Vec<ObjectRef>;
}

/// Handle used to inspect the pods a build runs in
pub trait PodClient: Send + Sync {}

/// Outcome of a build, as reported to metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildOutcome {
    Succeeded,
    Failed,
}

/// Sink for build duration and outcome
pub trait MetricsSink: Send + Sync {
    fn record_build(&self, name: &str, outcome: BuildOutcome, duration: Duration);
}

/// Metrics sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn record_build(&self, _name: &str, _outcome: BuildOutcome, _duration: Duration) {}
}

/// Options passed to the delegate alongside the build request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBuildOptions {
    pub architectures: Vec<String>,
}

impl ImageBuildOptions {
    pub fn new(architectures: Vec<String>) -> Self {
        Self { architectures }
    }
}

/// Cancellation state handed down from the caller of a step.
///
/// Cloning shares the interruption flag.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    interrupted: Arc<AtomicBool>,
    deadline: Option<Instant>,
    timeout: Option<Duration>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context sharing an existing interruption flag
    pub fn with_flag(interrupted: Arc<AtomicBool>) -> Self {
        Self {
            interrupted,
            deadline: None,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self.timeout = Some(timeout);
        self
    }

    /// Timeout the deadline was derived from
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }

    /// Whether the caller requested cancellation
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    pub fn deadline_exceeded(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Whether the caller cancelled or the deadline passed
    pub fn is_cancelled(&self) -> bool {
        self.is_interrupted() || self.deadline_exceeded()
    }
}

/// Executes a build request against the platform.
///
/// Owns creation, polling and completion-waiting of the build object,
/// as well as any retries.
#[async_trait]
pub trait BuildDelegate: Send + Sync {
    async fn handle_build(
        &self,
        ctx: &RunContext,
        build_client: &dyn BuildClient,
        pod_client: &dyn PodClient,
        build: BuildSpec,
        metrics: &dyn MetricsSink,
        options: ImageBuildOptions,
    ) -> Result<(), BuildError>;
}
