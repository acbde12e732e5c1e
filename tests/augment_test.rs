//! Workbench augmentation: dedup, highlight batches, in-flight exclusion,
//! failure isolation, and stale-response handling.

use std::sync::Arc;

use keywork::application::services::Workbench;
use keywork::application::ApplicationError;
use keywork::domain::NodeId;
use keywork::infrastructure::traits::{GenerationError, GenerationService};
use keywork::util::testing::{
    init_test_setup, sample_raw_hierarchy, GatedGeneration, ScriptedGeneration,
};

fn workbench(scripted: ScriptedGeneration) -> Workbench {
    Workbench::new(Arc::new(scripted), "test-model".into())
}

async fn generated(scripted: ScriptedGeneration) -> Workbench {
    let wb = workbench(scripted.hierarchy_ok(sample_raw_hierarchy()));
    wb.generate(vec!["bedding".into()], String::new())
        .await
        .unwrap();
    wb
}

#[tokio::test]
async fn given_candidates_with_duplicates_when_augmenting_then_only_novel_terms_land() {
    init_test_setup();
    let wb = generated(
        ScriptedGeneration::new().terms_ok(vec![
            "gots certification", // exact duplicate, discarded
            "organic wool bedding",
            "natural latex pillow",
        ]),
    )
    .await;

    let added = wb.augment(NodeId::level2(0, 0)).await.unwrap();
    assert_eq!(added, 2);

    let snapshot = wb.snapshot().await;
    let tax = snapshot.taxonomy.unwrap();
    let node = tax.level2(NodeId::level2(0, 0)).unwrap();
    let texts: Vec<_> = node.terms.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(
        texts,
        [
            "gots certification",
            "organic cotton vs regular",
            "chemical free sheets",
            "organic wool bedding",
            "natural latex pillow",
        ]
    );
    // continuing sequential identifiers
    assert_eq!(node.terms[3].id, NodeId::term(0, 0, 3));
    assert_eq!(node.terms[4].id, NodeId::term(0, 0, 4));
}

#[tokio::test]
async fn given_second_augmentation_when_merging_then_highlight_moves_to_latest_batch() {
    let wb = generated(
        ScriptedGeneration::new()
            .terms_ok(vec!["first batch term"])
            .terms_ok(vec!["second batch term"]),
    )
    .await;
    let node = NodeId::level2(0, 0);

    wb.augment(node).await.unwrap();
    let first = wb.snapshot().await;
    assert!(first.recent.contains(&NodeId::term(0, 0, 3)));

    wb.augment(node).await.unwrap();
    let second = wb.snapshot().await;
    assert!(!second.recent.contains(&NodeId::term(0, 0, 3)));
    assert!(second.recent.contains(&NodeId::term(0, 0, 4)));
}

#[tokio::test]
async fn given_malformed_response_when_augmenting_then_node_terms_are_untouched() {
    let wb = generated(
        ScriptedGeneration::new()
            .terms_err(GenerationError::Malformed("not a string list".into()))
            .terms_ok(vec!["retry works"]),
    )
    .await;
    let node = NodeId::level2(0, 1);

    let err = wb.augment(node).await.unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Generation(GenerationError::Malformed(_))
    ));

    let snapshot = wb.snapshot().await;
    let tax = snapshot.taxonomy.as_ref().unwrap();
    assert_eq!(tax.level2(node).unwrap().terms.len(), 2);

    // the in-flight flag was cleared, so a retry goes through
    assert_eq!(wb.augment(node).await.unwrap(), 1);
}

#[tokio::test]
async fn given_outstanding_augmentation_when_same_node_requested_then_rejected() {
    let scripted = ScriptedGeneration::new()
        .hierarchy_ok(sample_raw_hierarchy())
        .terms_ok(vec!["late arrival"]);
    let gated = Arc::new(GatedGeneration::new(scripted));
    let wb = Arc::new(Workbench::new(gated.clone(), "test-model".into()));
    wb.generate(vec!["bedding".into()], String::new())
        .await
        .unwrap();

    let node = NodeId::level2(0, 0);
    let pending = tokio::spawn({
        let wb = wb.clone();
        async move { wb.augment(node).await }
    });
    tokio::task::yield_now().await;

    // same node: rejected while the first call is outstanding
    let err = wb.augment(node).await.unwrap_err();
    assert!(matches!(err, ApplicationError::AugmentInFlight(n) if n == node));

    // other session operations are not blocked by the outstanding call
    wb.toggle(NodeId::level1(1), true).await.unwrap();

    gated.release();
    let added = pending.await.unwrap().unwrap();
    assert_eq!(added, 1);

    // flag cleared after completion
    let snapshot = wb.snapshot().await;
    assert!(snapshot
        .taxonomy
        .unwrap()
        .level2(node)
        .unwrap()
        .terms
        .iter()
        .any(|t| t.text == "late arrival"));
}

#[tokio::test]
async fn given_tree_rebuilt_while_in_flight_when_response_arrives_then_dropped_silently() {
    let scripted = ScriptedGeneration::new()
        .hierarchy_ok(sample_raw_hierarchy())
        .hierarchy_ok(sample_raw_hierarchy())
        .terms_ok(vec!["stale term"]);
    let gated = Arc::new(GatedGeneration::new(scripted));
    let wb = Arc::new(Workbench::new(gated.clone(), "test-model".into()));
    wb.generate(vec!["bedding".into()], String::new())
        .await
        .unwrap();

    let node = NodeId::level2(0, 0);
    let pending = tokio::spawn({
        let wb = wb.clone();
        async move { wb.augment(node).await }
    });
    tokio::task::yield_now().await;

    // a fresh generation replaces the tree while the call is outstanding
    wb.generate(vec!["bedding".into()], String::new())
        .await
        .unwrap();

    gated.release();
    assert_eq!(pending.await.unwrap().unwrap(), 0);

    let snapshot = wb.snapshot().await;
    let tax = snapshot.taxonomy.unwrap();
    assert!(!tax
        .level2(node)
        .unwrap()
        .terms
        .iter()
        .any(|t| t.text == "stale term"));
}

#[tokio::test]
async fn given_level1_identifier_when_augmenting_then_domain_error() {
    let wb = generated(ScriptedGeneration::new()).await;
    let err = wb.augment(NodeId::level1(0)).await.unwrap_err();
    assert!(matches!(err, ApplicationError::Domain(_)));
}
