//! Test: which checkout the build clones

use crate::helpers::*;
use srcbuild::build::RunContext;
use srcbuild::step::Step;
use std::sync::Arc;

async fn built_from(
    refs: Option<srcbuild::SourceRef>,
    extra: Vec<srcbuild::SourceRef>,
    selector: &str,
) -> (String, String) {
    let delegate = Arc::new(MockDelegate::new());
    let step = git_source_step(job(refs, extra), selector, delegate.clone());
    step.run(&RunContext::new()).await.unwrap();

    let builds = delegate.builds();
    assert_eq!(builds.len(), 1);
    let git = builds[0].spec.source.git.clone();
    (git.uri, git.reference)
}

#[tokio::test]
async fn test_empty_selector_picks_workdir_ref() {
    let got = built_from(
        None,
        vec![source("A", "B", "b1", false), source("C", "D", "d1", true)],
        "",
    )
    .await;
    assert_eq!(got, ("https://github.com/C/D.git".to_string(), "d1".to_string()));
}

#[tokio::test]
async fn test_selector_beats_non_matching_workdir() {
    let got = built_from(
        None,
        vec![source("A", "B", "b1", true), source("C", "D", "d1", false)],
        "C.D",
    )
    .await;
    assert_eq!(got.0, "https://github.com/C/D.git");
}

#[tokio::test]
async fn test_last_selector_match_wins() {
    let got = built_from(
        None,
        vec![source("A", "B", "first", false), source("A", "B", "second", false)],
        "A.B",
    )
    .await;
    assert_eq!(got.1, "second");
}

#[tokio::test]
async fn test_primary_ref_is_default() {
    let got = built_from(
        Some(source("org", "repo", "main", false)),
        vec![source("other", "lib", "dev", false)],
        "",
    )
    .await;
    assert_eq!(got, ("https://github.com/org/repo.git".to_string(), "main".to_string()));
}

#[tokio::test]
async fn test_extra_workdir_beats_primary() {
    let got = built_from(
        Some(source("org", "repo", "main", false)),
        vec![source("other", "lib", "dev", true)],
        "",
    )
    .await;
    assert_eq!(got.0, "https://github.com/other/lib.git");
}
