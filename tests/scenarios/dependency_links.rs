//! Test: links a scheduler uses to order steps

use crate::helpers::*;
use srcbuild::build::{DryRunDelegate, InMemoryBuildClient, NoopMetrics, RunContext};
use srcbuild::core::{SourceBuildConfig, StepLink};
use srcbuild::step::{BuildCollaborators, GitSourceStep, Step};
use std::sync::Arc;

#[test]
fn test_creates_root_link() {
    let step = git_source_step(job(None, vec![]), "", Arc::new(MockDelegate::new()));
    assert_eq!(step.creates(), vec![StepLink::internal_image("root")]);
    assert!(step.requires().is_empty());
}

#[test]
fn test_creates_suffixed_link() {
    let step = git_source_step(job(None, vec![]), "org.repo", Arc::new(MockDelegate::new()));
    assert_eq!(step.creates(), vec![StepLink::internal_image("root-org.repo")]);
    assert_eq!(step.name(), "root-org.repo");
}

#[test]
fn test_two_source_builds_are_distinct() {
    let a = git_source_step(job(None, vec![]), "org.a", Arc::new(MockDelegate::new()));
    let b = git_source_step(job(None, vec![]), "org.b", Arc::new(MockDelegate::new()));
    assert_ne!(a.creates(), b.creates());

    // Links are deterministic across constructions
    let a_again = git_source_step(job(None, vec![]), "org.a", Arc::new(MockDelegate::new()));
    assert_eq!(a.creates(), a_again.creates());
}

#[tokio::test]
async fn test_objects_come_from_build_client() {
    let yaml = r#"
job:
  namespace: ci-op-objects
  refs:
    org: org
    repo: repo
    base_ref: main
"#;
    let config = SourceBuildConfig::from_yaml(yaml).unwrap();
    let client = Arc::new(InMemoryBuildClient::new());
    let step = GitSourceStep::new(
        config.inputs,
        config.resources,
        Arc::new(config.job),
        config.clone_auth,
        config.pull_secret,
        BuildCollaborators {
            delegate: Arc::new(DryRunDelegate::new()),
            build_client: client.clone(),
            pod_client: client,
            metrics: Arc::new(NoopMetrics),
        },
    );

    assert!(step.objects().is_empty());
    step.run(&RunContext::new()).await.unwrap();

    let objects = step.objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].kind, "Build");
    assert_eq!(objects[0].namespace, "ci-op-objects");
    assert_eq!(objects[0].name, "root");
}
