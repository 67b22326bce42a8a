//! Test: handing the build to the delegate

use crate::helpers::*;
use srcbuild::build::{BuildError, RunContext};
use srcbuild::step::git_source::BUILDING_IMAGE_FROM_SOURCE;
use srcbuild::step::{MultiArchStep, Step, StepError};
use std::sync::Arc;

#[tokio::test]
async fn test_no_refs_fails_without_delegate_call() {
    let delegate = Arc::new(MockDelegate::new());
    for selector in ["", "org.repo"] {
        let step = git_source_step(job(None, vec![]), selector, delegate.clone());
        let failure = step.run(&RunContext::new()).await.unwrap_err();

        assert_eq!(failure.reason, BUILDING_IMAGE_FROM_SOURCE);
        assert!(matches!(failure.source, StepError::NoSource(_)));
        assert_eq!(
            failure.to_string(),
            "nothing to build source image from, no refs"
        );
    }
    assert_eq!(delegate.call_count(), 0);
}

#[tokio::test]
async fn test_delegate_error_propagates_unchanged() {
    let delegate = Arc::new(MockDelegate::failing("quota exceeded"));
    let step = git_source_step(
        job(Some(source("org", "repo", "main", false)), vec![]),
        "",
        delegate.clone(),
    );

    let failure = step.run(&RunContext::new()).await.unwrap_err();
    assert_eq!(failure.reason, BUILDING_IMAGE_FROM_SOURCE);
    assert!(matches!(
        failure.source,
        StepError::Build(BuildError::Api(ref m)) if m == "quota exceeded"
    ));
    assert_eq!(failure.to_string(), "API error: quota exceeded");
    assert_eq!(delegate.call_count(), 1);
}

#[tokio::test]
async fn test_cancellation_reaches_delegate() {
    let delegate = Arc::new(MockDelegate::new());
    let step = git_source_step(
        job(Some(source("org", "repo", "main", false)), vec![]),
        "",
        delegate.clone(),
    );

    let ctx = RunContext::new();
    ctx.cancel();
    step.run(&ctx).await.unwrap();

    assert!(delegate.builds()[0].cancelled);
}

#[tokio::test]
async fn test_spec_carries_job_and_architectures() {
    let delegate = Arc::new(MockDelegate::new());
    let step = git_source_step(
        job(Some(source("org", "repo", "main", false)), vec![]),
        "org.repo",
        delegate.clone(),
    );
    step.add_architectures(&["arm64".to_string(), "amd64".to_string()]);

    step.run(&RunContext::new()).await.unwrap();

    let build = &delegate.builds()[0];
    assert_eq!(build.spec.name, "root-org.repo");
    assert_eq!(build.spec.namespace, "ci-op-test");
    assert_eq!(build.spec.output.tag, "root-org.repo");
    assert_eq!(build.spec.ref_selector.as_deref(), Some("org.repo"));
    assert_eq!(build.spec.architectures, vec!["amd64", "arm64"]);
    assert_eq!(build.options.architectures, vec!["amd64", "arm64"]);
}

#[tokio::test]
async fn test_inputs_and_validate() {
    let step = git_source_step(
        job(
            Some(source("org", "repo", "main", false)),
            vec![source("x", "y", "v1", true)],
        ),
        "",
        Arc::new(MockDelegate::new()),
    );
    assert!(step.validate().is_ok());
    assert_eq!(step.inputs().unwrap(), vec!["org/repo@main", "x/y@v1"]);
}

#[test]
fn test_default_delegate_starts_empty() {
    let delegate = MockDelegate::default();
    assert_eq!(delegate.call_count(), 0);
    assert!(delegate.builds().is_empty());
}
