//! Source references and working-directory resolution

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single version-controlled checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Organization owning the repository
    pub org: String,

    /// Repository name
    pub repo: String,

    /// Revision the build checks out
    #[serde(default)]
    pub base_ref: String,

    /// Whether this checkout may serve as the build's working directory
    #[serde(default)]
    pub workdir: bool,
}

impl SourceRef {
    pub fn new(org: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
            base_ref: String::new(),
            workdir: false,
        }
    }

    pub fn with_base_ref(mut self, base_ref: impl Into<String>) -> Self {
        self.base_ref = base_ref.into();
        self
    }

    pub fn with_workdir(mut self, workdir: bool) -> Self {
        self.workdir = workdir;
        self
    }

    /// `org.repo`, the form a reference selector takes
    pub fn org_repo(&self) -> String {
        format!("{}.{}", self.org, self.repo)
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.org, self.repo, self.base_ref)
    }
}

/// The pipeline invocation this build belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Namespace builds are created in
    #[serde(default)]
    pub namespace: String,

    /// Name of the job
    #[serde(default)]
    pub job: String,

    /// Identifier of this invocation
    #[serde(default)]
    pub build_id: String,

    /// Primary checkout
    #[serde(default)]
    pub refs: Option<SourceRef>,

    /// Auxiliary checkouts, in declaration order
    #[serde(default)]
    pub extra_refs: Vec<SourceRef>,
}

/// Opaque input description used for cache keying
pub type InputDefinition = Vec<String>;

impl JobSpec {
    /// One entry per checkout, primary first
    pub fn inputs(&self) -> InputDefinition {
        self.refs
            .iter()
            .chain(self.extra_refs.iter())
            .map(|r| r.to_string())
            .collect()
    }
}

/// Pick the checkout that serves as the build's working directory.
///
/// The first candidate that matches the selector (an empty selector
/// matches everything) and is flagged as a workdir wins outright.
/// Otherwise the last candidate matching a non-empty selector is used,
/// and failing that the first candidate.
pub fn resolve_workdir_ref<'a>(
    refs: Option<&'a SourceRef>,
    extra_refs: &'a [SourceRef],
    selector: &str,
) -> Option<&'a SourceRef> {
    let candidates: Vec<&SourceRef> = refs.into_iter().chain(extra_refs.iter()).collect();
    let mut fallback = *candidates.first()?;

    for candidate in candidates {
        let matches = !selector.is_empty() && selector == candidate.org_repo();
        if (selector.is_empty() || matches) && candidate.workdir {
            return Some(candidate);
        }
        if matches {
            fallback = candidate;
        }
    }

    Some(fallback)
}
