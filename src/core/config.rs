//! Source build configuration from YAML

use crate::core::refs::JobSpec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

/// Wildcard entry in a resource configuration
pub const RESOURCE_WILDCARD: &str = "*";

/// Errors raised while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// How the source image is built from the checkout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInputConfig {
    /// Inline dockerfile contents
    #[serde(default)]
    pub dockerfile_literal: Option<String>,

    /// Directory inside the checkout used as build context
    #[serde(default)]
    pub context_dir: String,

    /// Dockerfile location relative to the context directory
    #[serde(default)]
    pub dockerfile_path: String,

    /// `org.repo` selecting the authoritative checkout, empty for none
    #[serde(default, rename = "ref")]
    pub reference_selector: String,
}

/// Requests and limits for a single build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequirements {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub requests: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub limits: BTreeMap<String, String>,
}

/// Resource requirements keyed by step name, with `*` as a default
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceConfiguration(pub HashMap<String, ResourceRequirements>);

impl ResourceConfiguration {
    /// Requirements for a step, falling back to the wildcard entry
    pub fn requirements_for_step(&self, name: &str) -> ResourceRequirements {
        self.0
            .get(name)
            .or_else(|| self.0.get(RESOURCE_WILDCARD))
            .cloned()
            .unwrap_or_default()
    }
}

/// Kind of credential used to clone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloneAuthType {
    Ssh,
    #[serde(rename = "oauth")]
    OAuth,
}

/// Credentials for cloning private repositories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneAuthConfig {
    /// Name of the secret holding the credential
    pub secret: String,

    #[serde(rename = "type")]
    pub auth_type: CloneAuthType,
}

impl CloneAuthConfig {
    pub fn new(secret: impl Into<String>, auth_type: CloneAuthType) -> Self {
        Self {
            secret: secret.into(),
            auth_type,
        }
    }

    /// Clone URI matching the credential type
    pub fn clone_uri(&self, org: &str, repo: &str) -> String {
        match self.auth_type {
            CloneAuthType::Ssh => format!("ssh://git@github.com/{}/{}.git", org, repo),
            CloneAuthType::OAuth => default_clone_uri(org, repo),
        }
    }
}

/// Plain HTTPS clone URI
pub fn default_clone_uri(org: &str, repo: &str) -> String {
    format!("https://github.com/{}/{}.git", org, repo)
}

/// Top-level source build configuration loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceBuildConfig {
    /// The job being built
    #[serde(default)]
    pub job: JobSpec,

    /// Build inputs
    #[serde(default)]
    pub inputs: BuildInputConfig,

    #[serde(default)]
    pub resources: ResourceConfiguration,

    #[serde(default)]
    pub clone_auth: Option<CloneAuthConfig>,

    /// Name of the image pull secret
    #[serde(default)]
    pub pull_secret: Option<String>,

    /// Architectures to build for from the start
    #[serde(default)]
    pub architectures: Vec<String>,
}

impl SourceBuildConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: SourceBuildConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for source in self.job.refs.iter().chain(self.job.extra_refs.iter()) {
            if source.org.is_empty() || source.repo.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "ref '{}' must name both an organization and a repository",
                    source
                )));
            }
        }
        Ok(())
    }
}
