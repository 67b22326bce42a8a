//! Builds the job's git checkout into the pipeline root image

use crate::build::{ImageBuildOptions, ObjectRef, RunContext};
use crate::core::{
    link::{root_tag, PIPELINE_ROOT_TAG},
    resolve_workdir_ref, ArchitectureSet, BuildInputConfig, BuildSpec, BuildSpecBuilder,
    CloneAuthConfig, InputDefinition, JobSpec, ResourceConfiguration, StepLink,
};
use crate::step::{BuildCollaborators, MultiArchStep, ParameterMap, Step, StepError, StepFailure};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Reason attached to every failed run of this step
pub const BUILDING_IMAGE_FROM_SOURCE: &str = "building_image_from_source";

/// Step building a git checkout into an image tagged as the pipeline root
pub struct GitSourceStep {
    config: BuildInputConfig,
    resources: ResourceConfiguration,
    job: Arc<JobSpec>,
    clone_auth: Option<CloneAuthConfig>,
    pull_secret: Option<String>,
    architectures: ArchitectureSet,
    collaborators: BuildCollaborators,
}

impl GitSourceStep {
    pub fn new(
        config: BuildInputConfig,
        resources: ResourceConfiguration,
        job: Arc<JobSpec>,
        clone_auth: Option<CloneAuthConfig>,
        pull_secret: Option<String>,
        collaborators: BuildCollaborators,
    ) -> Self {
        Self {
            config,
            resources,
            job,
            clone_auth,
            pull_secret,
            architectures: ArchitectureSet::new(),
            collaborators,
        }
    }

    /// Assemble the build request from the current configuration and
    /// architecture set
    pub fn build_spec(&self) -> Result<BuildSpec, StepError> {
        let source = resolve_workdir_ref(
            self.job.refs.as_ref(),
            &self.job.extra_refs,
            &self.config.reference_selector,
        );
        match source {
            Some(source) => debug!("Resolved workdir checkout for {}: {}", self.name(), source),
            None => debug!("No checkout available for {}", self.name()),
        }

        let spec = BuildSpecBuilder::new(&self.job, &self.config, &self.resources)
            .with_clone_auth(self.clone_auth.as_ref())
            .with_pull_secret(self.pull_secret.as_deref())
            .build(source, self.architectures.to_vec())?;
        Ok(spec)
    }

    async fn run_build(&self, ctx: &RunContext) -> Result<(), StepError> {
        let spec = self.build_spec()?;
        let options = ImageBuildOptions::new(spec.architectures.clone());
        info!(
            "Building {} from {} ({})",
            spec.name, spec.source.git.uri, spec.source.git.reference
        );

        self.collaborators
            .delegate
            .handle_build(
                ctx,
                self.collaborators.build_client.as_ref(),
                self.collaborators.pod_client.as_ref(),
                spec,
                self.collaborators.metrics.as_ref(),
                options,
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Step for GitSourceStep {
    fn inputs(&self) -> Result<InputDefinition, StepError> {
        Ok(self.job.inputs())
    }

    // No pre-flight checks exist for source builds.
    fn validate(&self) -> Result<(), StepError> {
        Ok(())
    }

    async fn run(&self, ctx: &RunContext) -> Result<(), StepFailure> {
        self.run_build(ctx).await.map_err(|e| {
            error!("Step {} failed: {}", self.name(), e);
            StepFailure::for_reason(BUILDING_IMAGE_FROM_SOURCE, e)
        })
    }

    fn name(&self) -> String {
        root_tag(&self.config.reference_selector)
    }

    fn description(&self) -> String {
        format!(
            "Build git source code into an image and tag it as {}",
            PIPELINE_ROOT_TAG
        )
    }

    fn requires(&self) -> Vec<StepLink> {
        Vec::new()
    }

    fn creates(&self) -> Vec<StepLink> {
        vec![StepLink::internal_image(root_tag(&self.config.reference_selector))]
    }

    fn provides(&self) -> ParameterMap {
        ParameterMap::new()
    }

    fn objects(&self) -> Vec<ObjectRef> {
        self.collaborators.build_client.objects()
    }
}

impl MultiArchStep for GitSourceStep {
    fn resolve_multi_arch(&self) -> BTreeSet<String> {
        self.architectures.snapshot()
    }

    fn add_architectures(&self, archs: &[String]) {
        self.architectures.insert(archs.iter().cloned());
    }
}
