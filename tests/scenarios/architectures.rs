//! Test: widening the architecture set while steps run

use crate::helpers::*;
use srcbuild::build::RunContext;
use srcbuild::step::{MultiArchStep, Step};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

#[test]
fn test_set_only_grows() {
    let step = git_source_step(job(None, vec![]), "", Arc::new(MockDelegate::new()));
    assert!(step.resolve_multi_arch().is_empty());

    let batches: Vec<Vec<String>> = vec![
        vec!["amd64".into()],
        vec!["amd64".into(), "amd64".into()],
        vec![],
        vec!["arm64".into(), "s390x".into()],
        vec!["s390x".into()],
    ];

    let mut previous = BTreeSet::new();
    for batch in &batches {
        step.add_architectures(batch);
        let current = step.resolve_multi_arch();
        assert!(current.is_superset(&previous));
        previous = current;
    }
    assert_eq!(
        previous.into_iter().collect::<Vec<_>>(),
        vec!["amd64", "arm64", "s390x"]
    );
}

#[test]
fn test_concurrent_widening() {
    let step = Arc::new(git_source_step(job(None, vec![]), "", Arc::new(MockDelegate::new())));

    let writers: Vec<_> = (0..8)
        .map(|i| {
            let step = step.clone();
            thread::spawn(move || {
                for j in 0..50 {
                    step.add_architectures(&[format!("arch-{}", (i * 50 + j) % 100)]);
                    let _ = step.resolve_multi_arch();
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(step.resolve_multi_arch().len(), 100);
}

#[tokio::test]
async fn test_architectures_read_at_run_time() {
    let delegate = Arc::new(MockDelegate::new());
    let step = git_source_step(
        job(Some(source("org", "repo", "main", false)), vec![]),
        "",
        delegate.clone(),
    );

    step.add_architectures(&["amd64".to_string()]);
    step.run(&RunContext::new()).await.unwrap();
    step.add_architectures(&["arm64".to_string()]);
    step.run(&RunContext::new()).await.unwrap();

    let builds = delegate.builds();
    assert_eq!(builds[0].options.architectures, vec!["amd64"]);
    assert_eq!(builds[1].options.architectures, vec!["amd64", "arm64"]);
}
