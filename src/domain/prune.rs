//! Prune a taxonomy down to the selected subset for saving.

use crate::domain::entities::{Level1Node, Level2Node, Taxonomy, TranslationOverlay};
use crate::domain::node_id::NodeId;
use crate::domain::selection::SelectionSet;

/// Copy the selected subset of the tree, identifiers preserved.
///
/// A term is kept iff selected. A level-2 node is kept iff selected or it
/// keeps at least one term. A level-1 node is kept iff selected or it keeps
/// at least one level-2 child. Anything else does not appear in the output.
pub fn prune(tree: &Taxonomy, selection: &SelectionSet) -> Vec<Level1Node> {
    tree.levels
        .iter()
        .filter_map(|l1| {
            let children: Vec<Level2Node> = l1
                .children
                .iter()
                .filter_map(|l2| {
                    let terms: Vec<_> = l2
                        .terms
                        .iter()
                        .filter(|t| selection.contains(t.id))
                        .cloned()
                        .collect();
                    if terms.is_empty() && !selection.contains(l2.id) {
                        return None;
                    }
                    Some(Level2Node {
                        terms,
                        ..l2.clone()
                    })
                })
                .collect();
            if children.is_empty() && !selection.contains(l1.id) {
                return None;
            }
            Some(Level1Node {
                children,
                ..l1.clone()
            })
        })
        .collect()
}

/// Restrict a translation overlay to identifiers present in a pruned tree.
pub fn restrict_translations(
    overlay: &TranslationOverlay,
    pruned: &[Level1Node],
) -> TranslationOverlay {
    let mut retained: std::collections::BTreeSet<NodeId> = std::collections::BTreeSet::new();
    for l1 in pruned {
        retained.insert(l1.id);
        for l2 in &l1.children {
            retained.insert(l2.id);
            retained.extend(l2.terms.iter().map(|t| t.id));
        }
    }
    overlay
        .iter()
        .filter(|(id, _)| retained.contains(id))
        .map(|(id, text)| (*id, text.clone()))
        .collect()
}
