//! Workbench session behavior: generation lifecycle, translation overlay,
//! and session-state serialization.

use std::sync::Arc;

use keywork::application::services::{Workbench, WorkbenchState};
use keywork::application::ApplicationError;
use keywork::domain::{EffectiveState, NodeId};
use keywork::infrastructure::traits::GenerationError;
use keywork::util::testing::{init_test_setup, sample_raw_hierarchy, ScriptedGeneration};

fn workbench(scripted: ScriptedGeneration) -> Workbench {
    Workbench::new(Arc::new(scripted), "test-model".into())
}

#[tokio::test]
async fn given_no_generation_yet_when_operating_then_no_taxonomy_error() {
    init_test_setup();
    let wb = workbench(ScriptedGeneration::new());
    let err = wb.toggle(NodeId::level1(0), true).await.unwrap_err();
    assert!(matches!(err, ApplicationError::NoTaxonomy));
}

#[tokio::test]
async fn given_generation_failure_when_retrying_then_prior_tree_survives() {
    let wb = workbench(
        ScriptedGeneration::new()
            .hierarchy_ok(sample_raw_hierarchy())
            .hierarchy_err(GenerationError::Network("timeout".into())),
    );
    wb.generate(vec!["bedding".into()], String::new())
        .await
        .unwrap();
    wb.toggle(NodeId::level1(0), true).await.unwrap();

    let err = wb
        .generate(vec!["pillows".into()], String::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Generation(GenerationError::Network(_))
    ));

    // tree and selection untouched by the failed attempt
    let snapshot = wb.snapshot().await;
    assert!(snapshot.taxonomy.is_some());
    assert!(snapshot.selection.contains(NodeId::level1(0)));
}

#[tokio::test]
async fn given_fresh_generation_when_succeeding_then_selection_and_overlay_reset() {
    let wb = workbench(
        ScriptedGeneration::new()
            .hierarchy_ok(sample_raw_hierarchy())
            .translations_ok(&[("organic bedding", "Bio-Bettwäsche")])
            .hierarchy_ok(sample_raw_hierarchy()),
    );
    wb.generate(vec!["bedding".into()], String::new())
        .await
        .unwrap();
    wb.toggle(NodeId::level1(0), true).await.unwrap();
    wb.translate(&[NodeId::level1(0)]).await.unwrap();

    wb.generate(vec!["bedding".into()], String::new())
        .await
        .unwrap();
    let snapshot = wb.snapshot().await;
    assert!(snapshot.selection.is_empty());
    assert!(snapshot.translations.is_empty());
}

#[tokio::test]
async fn given_partial_translation_result_when_applying_then_hits_land_and_misses_skip() {
    let wb = workbench(
        ScriptedGeneration::new()
            .hierarchy_ok(sample_raw_hierarchy())
            .translations_ok(&[("organic bedding", "Bio-Bettwäsche")]),
    );
    wb.generate(vec!["bedding".into()], String::new())
        .await
        .unwrap();

    let applied = wb
        .translate(&[NodeId::level1(0), NodeId::level1(1)])
        .await
        .unwrap();
    assert_eq!(applied, 1);

    let snapshot = wb.snapshot().await;
    assert_eq!(
        snapshot.translations.get(&NodeId::level1(0)).map(String::as_str),
        Some("Bio-Bettwäsche")
    );
    assert!(!snapshot.translations.contains_key(&NodeId::level1(1)));
}

#[tokio::test]
async fn given_failed_translation_call_when_applying_then_overlay_is_unchanged() {
    let wb = workbench(
        ScriptedGeneration::new().hierarchy_ok(sample_raw_hierarchy()),
    );
    wb.generate(vec!["bedding".into()], String::new())
        .await
        .unwrap();

    // no scripted translation response: the provider call fails outright
    assert!(wb.translate(&[NodeId::level1(0)]).await.is_err());
    assert!(wb.snapshot().await.translations.is_empty());
}

#[tokio::test]
async fn given_toggle_through_service_when_reading_tri_state_then_cascade_visible() {
    let wb = workbench(ScriptedGeneration::new().hierarchy_ok(sample_raw_hierarchy()));
    wb.generate(vec!["bedding".into()], String::new())
        .await
        .unwrap();

    wb.toggle(NodeId::term(0, 0, 0), true).await.unwrap();
    assert_eq!(
        wb.effective_state(NodeId::level1(0)).await.unwrap(),
        EffectiveState::Indeterminate
    );
    assert_eq!(
        wb.effective_state(NodeId::term(0, 0, 0)).await.unwrap(),
        EffectiveState::Checked
    );
}

#[tokio::test]
async fn given_session_state_when_round_tripping_json_then_highlights_stay_transient() {
    let wb = workbench(
        ScriptedGeneration::new()
            .hierarchy_ok(sample_raw_hierarchy())
            .terms_ok(vec!["fresh term"]),
    );
    wb.generate(vec!["bedding".into()], String::new())
        .await
        .unwrap();
    wb.toggle(NodeId::level2(0, 1), true).await.unwrap();
    wb.augment(NodeId::level2(0, 0)).await.unwrap();
    assert!(!wb.snapshot().await.recent.is_empty());

    let state = wb.into_state().await;
    let json = serde_json::to_string(&state).unwrap();
    let restored: WorkbenchState = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.epoch, 1);
    assert!(restored.selection.contains(NodeId::level2(0, 1)));
    assert!(restored.taxonomy.is_some());
    // the recently-added highlight is session-scoped, never persisted
    assert!(restored.recent.is_empty());
}
