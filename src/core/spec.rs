//! Declarative build requests

use crate::core::{
    config::{default_clone_uri, BuildInputConfig, CloneAuthConfig, ResourceConfiguration, ResourceRequirements},
    link::{root_tag, PIPELINE_IMAGE_STREAM},
    refs::{JobSpec, SourceRef},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Label carrying the job name
pub const JOB_LABEL: &str = "job";

/// Label carrying the invocation's build id
pub const BUILD_ID_LABEL: &str = "build-id";

/// Raised when the job carries no checkout at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("nothing to build source image from, no refs")]
pub struct NoSourceError;

/// Kind of build source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Git,
}

/// Git checkout to clone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSource {
    pub uri: String,

    /// Revision to check out
    #[serde(rename = "ref")]
    pub reference: String,
}

/// Where the build gets its sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSource {
    #[serde(rename = "type")]
    pub source_type: SourceType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,

    pub context_dir: String,

    /// Secret used to clone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_secret: Option<String>,

    pub git: GitSource,
}

/// Image stream tag the build pushes to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTag {
    pub stream: String,
    pub tag: String,
}

/// A single image build request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSpec {
    pub name: String,
    pub namespace: String,
    pub labels: BTreeMap<String, String>,
    pub source: BuildSource,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dockerfile_path: Option<String>,

    pub resources: ResourceRequirements,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_secret: Option<String>,

    pub output: OutputTag,

    /// Selector that picked the checkout, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_selector: Option<String>,

    pub architectures: Vec<String>,
}

/// Assembles a [`BuildSpec`] from step configuration and a resolved checkout
#[derive(Debug, Clone, Copy)]
pub struct BuildSpecBuilder<'a> {
    job: &'a JobSpec,
    inputs: &'a BuildInputConfig,
    resources: &'a ResourceConfiguration,
    clone_auth: Option<&'a CloneAuthConfig>,
    pull_secret: Option<&'a str>,
}

impl<'a> BuildSpecBuilder<'a> {
    pub fn new(
        job: &'a JobSpec,
        inputs: &'a BuildInputConfig,
        resources: &'a ResourceConfiguration,
    ) -> Self {
        Self {
            job,
            inputs,
            resources,
            clone_auth: None,
            pull_secret: None,
        }
    }

    pub fn with_clone_auth(mut self, clone_auth: Option<&'a CloneAuthConfig>) -> Self {
        self.clone_auth = clone_auth;
        self
    }

    pub fn with_pull_secret(mut self, pull_secret: Option<&'a str>) -> Self {
        self.pull_secret = pull_secret;
        self
    }

    /// Build the request for `source`, pushing to the root tag.
    ///
    /// Fails only when there is no checkout to build from.
    pub fn build(
        &self,
        source: Option<&SourceRef>,
        architectures: Vec<String>,
    ) -> Result<BuildSpec, NoSourceError> {
        let source = source.ok_or(NoSourceError)?;

        let (uri, secret) = match self.clone_auth {
            Some(auth) => (auth.clone_uri(&source.org, &source.repo), Some(auth.secret.as_str())),
            None => (default_clone_uri(&source.org, &source.repo), None),
        };

        let tag = root_tag(&self.inputs.reference_selector);

        let mut labels = BTreeMap::new();
        if !self.job.job.is_empty() {
            labels.insert(JOB_LABEL.to_string(), self.job.job.clone());
        }
        if !self.job.build_id.is_empty() {
            labels.insert(BUILD_ID_LABEL.to_string(), self.job.build_id.clone());
        }

        Ok(BuildSpec {
            name: tag.clone(),
            namespace: self.job.namespace.clone(),
            labels,
            source: BuildSource {
                source_type: SourceType::Git,
                dockerfile: non_empty(self.inputs.dockerfile_literal.as_deref()),
                context_dir: self.inputs.context_dir.clone(),
                source_secret: non_empty(secret),
                git: GitSource {
                    uri,
                    reference: source.base_ref.clone(),
                },
            },
            dockerfile_path: non_empty(Some(self.inputs.dockerfile_path.as_str())),
            resources: self.resources.requirements_for_step(&tag),
            pull_secret: non_empty(self.pull_secret),
            output: OutputTag {
                stream: PIPELINE_IMAGE_STREAM.to_string(),
                tag,
            },
            ref_selector: non_empty(Some(self.inputs.reference_selector.as_str())),
            architectures,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
