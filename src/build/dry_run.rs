//! Delegate that records build requests instead of submitting them

use crate::build::{
    BuildClient, BuildDelegate, BuildError, BuildOutcome, ImageBuildOptions, MetricsSink,
    ObjectRef, PodClient, RunContext,
};
use crate::core::BuildSpec;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Object kind recorded for each build
pub const BUILD_KIND: &str = "Build";

/// Build and pod client keeping created objects in memory
#[derive(Debug, Default)]
pub struct InMemoryBuildClient {
    objects: Mutex<Vec<ObjectRef>>,
}

impl InMemoryBuildClient {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BuildClient for InMemoryBuildClient {
    fn create(&self, object: ObjectRef) -> Result<(), BuildError> {
        let mut objects = self.objects.lock().unwrap_or_else(|e| e.into_inner());
        if objects.contains(&object) {
            return Err(BuildError::Api(format!(
                "{} {}/{} already exists",
                object.kind, object.namespace, object.name
            )));
        }
        objects.push(object);
        Ok(())
    }

    fn objects(&self) -> Vec<ObjectRef> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl PodClient for InMemoryBuildClient {}

/// Metrics sink that keeps every recorded build
#[derive(Debug, Default)]
pub struct RecordingMetrics {
    records: Mutex<Vec<(String, BuildOutcome, Duration)>>,
}

impl RecordingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(String, BuildOutcome, Duration)> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl MetricsSink for RecordingMetrics {
    fn record_build(&self, name: &str, outcome: BuildOutcome, duration: Duration) {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((name.to_string(), outcome, duration));
    }
}

/// Delegate that registers the build object and reports success without
/// waiting on any platform.
#[derive(Debug, Default)]
pub struct DryRunDelegate {
    builds: Mutex<Vec<(BuildSpec, ImageBuildOptions)>>,
}

impl DryRunDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests received so far, in order
    pub fn builds(&self) -> Vec<(BuildSpec, ImageBuildOptions)> {
        self.builds.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl BuildDelegate for DryRunDelegate {
    async fn handle_build(
        &self,
        ctx: &RunContext,
        build_client: &dyn BuildClient,
        _pod_client: &dyn PodClient,
        build: BuildSpec,
        metrics: &dyn MetricsSink,
        options: ImageBuildOptions,
    ) -> Result<(), BuildError> {
        let started = Instant::now();

        if ctx.is_interrupted() {
            warn!("Build {} cancelled before submission", build.name);
            metrics.record_build(&build.name, BuildOutcome::Failed, started.elapsed());
            return Err(BuildError::Cancelled);
        }
        if ctx.deadline_exceeded() {
            let secs = ctx.timeout().map(|t| t.as_secs()).unwrap_or_default();
            warn!("Build {} timed out before submission", build.name);
            metrics.record_build(&build.name, BuildOutcome::Failed, started.elapsed());
            return Err(BuildError::Timeout(secs));
        }

        let object = ObjectRef {
            kind: BUILD_KIND.to_string(),
            namespace: build.namespace.clone(),
            name: build.name.clone(),
        };
        if let Err(e) = build_client.create(object) {
            metrics.record_build(&build.name, BuildOutcome::Failed, started.elapsed());
            return Err(e);
        }

        info!(
            "Dry-run build {} from {} ({})",
            build.name, build.source.git.uri, build.source.git.reference
        );
        debug!("Architectures for {}: {:?}", build.name, options.architectures);

        metrics.record_build(&build.name, BuildOutcome::Succeeded, started.elapsed());
        self.builds
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((build, options));
        Ok(())
    }
}
