//! Augmentation merge: fold candidate terms into one level-2 node.

use tracing::debug;

use crate::domain::entities::{Level2Node, LsiTerm};
use crate::domain::node_id::NodeId;

/// Append candidate terms to a node, skipping exact-text duplicates.
///
/// Survivors get continuing sequential identifiers after the existing terms.
/// Returns the identifiers of the newly appended terms, which become the new
/// "recently added" highlight batch for that node.
pub fn merge_terms(node: &mut Level2Node, candidates: Vec<String>) -> Vec<NodeId> {
    let (l1, l2) = match node.id {
        NodeId::Level2 { l1, l2 } => (l1, l2),
        // merge is only ever called with a level-2 node
        _ => return Vec::new(),
    };

    let mut added = Vec::new();
    for text in candidates {
        // case-sensitive exact match only; semantic dedup is out of scope
        if node.terms.iter().any(|t| t.text == text) {
            continue;
        }
        let id = NodeId::term(l1, l2, node.terms.len());
        node.terms.push(LsiTerm { id, text });
        added.push(id);
    }

    debug!("merged {} new terms into {}", added.len(), node.id);
    added
}
