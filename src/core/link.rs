//! Dependency links between steps

use serde::{Deserialize, Serialize};
use std::fmt;

/// Image stream that holds intermediate pipeline images
pub const PIPELINE_IMAGE_STREAM: &str = "pipeline";

/// Tag of the image built from the job's source checkout
pub const PIPELINE_ROOT_TAG: &str = "root";

/// A pipeline resource that a step requires or creates.
///
/// Links are only compared for equality by whoever orders the steps;
/// they are never dereferenced for content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepLink {
    /// A tag in the pipeline's internal image stream
    InternalImage { tag: String },

    /// An image imported from outside the pipeline
    ExternalImage {
        namespace: String,
        name: String,
        tag: String,
    },

    /// Every image the pipeline produces
    AllImages,
}

impl StepLink {
    /// Link to an internal pipeline image tag
    pub fn internal_image(tag: impl Into<String>) -> Self {
        StepLink::InternalImage { tag: tag.into() }
    }

    /// Link to an image living outside the pipeline
    pub fn external_image(
        namespace: impl Into<String>,
        name: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        StepLink::ExternalImage {
            namespace: namespace.into(),
            name: name.into(),
            tag: tag.into(),
        }
    }

    /// Whether a step requiring `self` is satisfied by a step creating `created`
    pub fn satisfied_by(&self, created: &StepLink) -> bool {
        match self {
            StepLink::AllImages => matches!(created, StepLink::InternalImage { .. }),
            other => other == created,
        }
    }
}

impl fmt::Display for StepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepLink::InternalImage { tag } => write!(f, "{}:{}", PIPELINE_IMAGE_STREAM, tag),
            StepLink::ExternalImage { namespace, name, tag } => {
                write!(f, "{}/{}:{}", namespace, name, tag)
            }
            StepLink::AllImages => write!(f, "[images]"),
        }
    }
}

/// Root output tag, suffixed with the reference selector when one is set
pub fn root_tag(reference_selector: &str) -> String {
    if reference_selector.is_empty() {
        PIPELINE_ROOT_TAG.to_string()
    } else {
        format!("{}-{}", PIPELINE_ROOT_TAG, reference_selector)
    }
}
