//! Sparse selection set with cascading tri-state semantics.
//!
//! Only fully-selected identifiers are stored. "Indeterminate" is never
//! stored; it is derived at read time from the tree and the set. Every
//! toggle returns a fresh set so callers replace the whole value in one
//! step, which keeps the cascade invariant atomic from the outside.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::domain::entities::Taxonomy;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node_id::NodeId;

/// Display state of a node, derived from the tree plus the selection set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveState {
    Checked,
    Unchecked,
    Indeterminate,
}

/// Set of node identifiers currently considered fully selected.
///
/// Invariant between toggles: a parent is present iff all of its direct
/// children are present. "Some but not all children" and "no children" are
/// both stored as absence and distinguished only at read time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: BTreeSet<NodeId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    /// Apply a toggle and return the resulting set.
    ///
    /// Cascades the new value down to all descendants, then walks from the
    /// parent up to the root recomputing each ancestor: present iff all of
    /// its direct children are present.
    pub fn toggle(&self, tree: &Taxonomy, id: NodeId, checked: bool) -> DomainResult<SelectionSet> {
        if !tree.contains(id) {
            return Err(DomainError::UnknownNode(id));
        }
        trace!("toggle {} -> {}", id, checked);

        let mut ids = self.ids.clone();

        // Cascade down: the node itself plus every descendant.
        if checked {
            ids.insert(id);
            ids.extend(tree.descendants_of(id));
        } else {
            ids.remove(&id);
            for d in tree.descendants_of(id) {
                ids.remove(&d);
            }
        }

        // Cascade up: recompute each ancestor from its direct children.
        let mut cursor = id.parent();
        while let Some(ancestor) = cursor {
            let all_children = tree
                .children_of(ancestor)
                .iter()
                .all(|child| ids.contains(child));
            if all_children {
                ids.insert(ancestor);
            } else {
                ids.remove(&ancestor);
            }
            cursor = ancestor.parent();
        }

        Ok(SelectionSet { ids })
    }

    /// Read-time tri-state for one node.
    pub fn effective_state(&self, tree: &Taxonomy, id: NodeId) -> EffectiveState {
        if self.ids.contains(&id) {
            return EffectiveState::Checked;
        }
        let any_descendant = tree
            .descendants_of(id)
            .iter()
            .any(|d| self.ids.contains(d));
        if any_descendant {
            EffectiveState::Indeterminate
        } else {
            EffectiveState::Unchecked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::builder::build_taxonomy;
    use crate::domain::entities::{RawHierarchy, RawLevel1, RawLevel2};

    fn tree() -> Taxonomy {
        let raw = RawHierarchy {
            entries: vec![RawLevel1 {
                keyword: "duvets".into(),
                category: "Conversion".into(),
                page_kind: "Product Page".into(),
                children: vec![
                    RawLevel2 {
                        keyword: "buy duvet online".into(),
                        stage: "Action".into(),
                        terms: vec!["all season duvet".into(), "duvet tog guide".into()],
                    },
                    RawLevel2 {
                        keyword: "duvet reviews".into(),
                        stage: "Trust".into(),
                        terms: vec!["duvet brand ratings".into()],
                    },
                ],
            }],
        };
        build_taxonomy(raw, vec![], String::new(), "m".into()).unwrap()
    }

    #[test]
    fn given_level2_toggle_when_all_siblings_selected_then_parent_joins_set() {
        let t = tree();
        let s = SelectionSet::new();
        let s = s.toggle(&t, NodeId::level2(0, 0), true).unwrap();
        assert_eq!(
            s.effective_state(&t, NodeId::level1(0)),
            EffectiveState::Indeterminate
        );
        let s = s.toggle(&t, NodeId::level2(0, 1), true).unwrap();
        assert!(s.contains(NodeId::level1(0)));
    }

    #[test]
    fn given_term_deselect_when_parent_was_selected_then_ancestors_drop_out() {
        let t = tree();
        let s = SelectionSet::new()
            .toggle(&t, NodeId::level1(0), true)
            .unwrap();
        let s = s.toggle(&t, NodeId::term(0, 0, 1), false).unwrap();
        assert!(!s.contains(NodeId::level2(0, 0)));
        assert!(!s.contains(NodeId::level1(0)));
        assert_eq!(
            s.effective_state(&t, NodeId::level2(0, 0)),
            EffectiveState::Indeterminate
        );
        // the untouched sibling subtree stays fully selected
        assert!(s.contains(NodeId::level2(0, 1)));
    }

    #[test]
    fn given_full_deselect_when_no_node_remains_then_set_is_literally_empty() {
        let t = tree();
        let s = SelectionSet::new()
            .toggle(&t, NodeId::level1(0), true)
            .unwrap()
            .toggle(&t, NodeId::level1(0), false)
            .unwrap();
        assert_eq!(s.len(), 0);
    }
}
