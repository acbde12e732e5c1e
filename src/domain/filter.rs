//! Read-only filtered views over a taxonomy.
//!
//! Filtering clones the retained subtree and never touches the underlying
//! tree or the selection set; applying an empty filter reproduces the tree
//! structurally identical to the original.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Category, Level1Node, Taxonomy};

/// Criteria for a filtered view. Unset fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub category: Option<Category>,
    pub page_kind: Option<String>,
    /// Prefix match against the stage label, e.g. "Decision" matches
    /// "Decision (Commercial)".
    pub stage_prefix: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.page_kind.is_none() && self.stage_prefix.is_none()
    }
}

/// Map legacy page-kind labels onto their canonical form.
///
/// Canonical labels map to themselves, so the table is idempotent.
pub fn normalize_page_kind(raw: &str) -> &str {
    match raw {
        "Blog Post" | "Blogpost" | "Article" => "Blog Article",
        "Landingpage" | "LP" => "Landing Page",
        "Product Detail Page" | "PDP" => "Product Page",
        "Versus Page" => "Comparison Page",
        "Glossary" => "Glossary Page",
        other => other,
    }
}

/// Derive a filtered copy of the tree. Pure; no mutation of inputs.
///
/// A level-1 node survives only if its own criteria match AND it retains at
/// least one level-2 child after stage filtering.
pub fn apply_filter(tree: &Taxonomy, criteria: &FilterCriteria) -> Vec<Level1Node> {
    tree.levels
        .iter()
        .filter(|l1| match criteria.category {
            Some(c) => l1.category == c,
            None => true,
        })
        .filter(|l1| match &criteria.page_kind {
            Some(pk) => normalize_page_kind(&l1.page_kind) == normalize_page_kind(pk),
            None => true,
        })
        .filter_map(|l1| {
            let children: Vec<_> = l1
                .children
                .iter()
                .filter(|l2| match &criteria.stage_prefix {
                    Some(prefix) => l2.stage.label().starts_with(prefix.as_str()),
                    None => true,
                })
                .cloned()
                .collect();
            if children.is_empty() {
                return None;
            }
            Some(Level1Node {
                children,
                ..l1.clone()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_legacy_label_when_normalizing_then_canonical_and_idempotent() {
        assert_eq!(normalize_page_kind("Blog Post"), "Blog Article");
        assert_eq!(normalize_page_kind("Blog Article"), "Blog Article");
        assert_eq!(normalize_page_kind("PDP"), "Product Page");
        // unknown labels pass through unchanged
        assert_eq!(normalize_page_kind("Webinar"), "Webinar");
    }
}
