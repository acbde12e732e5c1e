//! Filtered views: retention rules and strict non-mutation.

use keywork::domain::{apply_filter, Category, FilterCriteria, NodeId, SelectionSet};
use keywork::util::testing::sample_taxonomy;

#[test]
fn given_stage_prefix_when_filtering_then_prefix_matches_qualified_label() {
    let tree = sample_taxonomy();
    let view = apply_filter(
        &tree,
        &FilterCriteria {
            stage_prefix: Some("Decision".into()),
            ..Default::default()
        },
    );

    // only the first group has a Decision child; the second group loses all
    // children and is dropped entirely
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].children.len(), 1);
    assert_eq!(view[0].children[0].keyword, "best organic sheets");
}

#[test]
fn given_category_criteria_when_filtering_then_only_matching_groups_remain() {
    let tree = sample_taxonomy();
    let view = apply_filter(
        &tree,
        &FilterCriteria {
            category: Some(Category::Conversion),
            ..Default::default()
        },
    );
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].keyword, "buy duvet covers");
}

#[test]
fn given_legacy_page_kind_label_when_filtering_then_normalization_table_applies() {
    let tree = sample_taxonomy();
    // tree stores "Blog Article"; the legacy label "Blog Post" must match it
    let view = apply_filter(
        &tree,
        &FilterCriteria {
            page_kind: Some("Blog Post".into()),
            ..Default::default()
        },
    );
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].keyword, "organic bedding");
}

#[test]
fn given_filter_and_clear_when_comparing_then_tree_and_selection_are_untouched() {
    let tree = sample_taxonomy();
    let before = tree.clone();
    let selection = SelectionSet::new()
        .toggle(&tree, NodeId::level2(0, 0), true)
        .unwrap();
    let selection_before = selection.clone();

    let _view = apply_filter(
        &tree,
        &FilterCriteria {
            category: Some(Category::Traffic),
            stage_prefix: Some("Awareness".into()),
            ..Default::default()
        },
    );
    let cleared = apply_filter(&tree, &FilterCriteria::default());

    assert_eq!(tree, before);
    assert_eq!(cleared, before.levels);
    assert_eq!(selection, selection_before);
}

#[test]
fn given_criteria_matching_nothing_when_filtering_then_view_is_empty() {
    let tree = sample_taxonomy();
    let view = apply_filter(
        &tree,
        &FilterCriteria {
            category: Some(Category::Comparison),
            ..Default::default()
        },
    );
    assert!(view.is_empty());
}
