//! Domain entities: core data structures

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::node_id::NodeId;

/// Strategic category of a level-1 keyword group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Traffic,
    Comparison,
    Conversion,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Traffic => "Traffic",
            Category::Comparison => "Comparison",
            Category::Conversion => "Conversion",
        }
    }

    /// Parse a raw category string from the generation service.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "traffic" => Ok(Category::Traffic),
            "comparison" => Ok(Category::Comparison),
            "conversion" => Ok(Category::Conversion),
            _ => Err(DomainError::UnknownCategory(raw.to_string())),
        }
    }
}

/// Funnel stage of a level-2 keyword.
///
/// Display labels carry a parenthetical qualifier; filters match on label
/// prefix, so `"Decision"` finds `"Decision (Commercial)"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Awareness,
    Decision,
    Trust,
    Action,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Awareness => "Awareness (Informational)",
            Stage::Decision => "Decision (Commercial)",
            Stage::Trust => "Trust (Reputational)",
            Stage::Action => "Action (Transactional)",
        }
    }

    /// Parse a raw stage string, tolerating a trailing qualifier.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let head = raw.split('(').next().unwrap_or("").trim();
        match head.to_ascii_lowercase().as_str() {
            "awareness" => Ok(Stage::Awareness),
            "decision" => Ok(Stage::Decision),
            "trust" => Ok(Stage::Trust),
            "action" => Ok(Stage::Action),
            _ => Err(DomainError::UnknownStage(raw.to_string())),
        }
    }
}

/// Semantically related term attached to a level-2 keyword.
///
/// The "recently added" highlight is deliberately NOT a field here; it lives
/// in a transient session-side set so it can never leak into a saved record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsiTerm {
    pub id: NodeId,
    pub text: String,
}

/// Funnel-stage keyword with its LSI terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level2Node {
    pub id: NodeId,
    pub keyword: String,
    pub stage: Stage,
    pub terms: Vec<LsiTerm>,
}

/// Top-level keyword group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level1Node {
    pub id: NodeId,
    pub keyword: String,
    pub category: Category,
    pub page_kind: String,
    pub children: Vec<Level2Node>,
}

/// Raw, ID-less generation output: level-1 entries holding level-2 entries
/// holding plain term strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHierarchy {
    pub entries: Vec<RawLevel1>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLevel1 {
    pub keyword: String,
    pub category: String,
    pub page_kind: String,
    pub children: Vec<RawLevel2>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLevel2 {
    pub keyword: String,
    pub stage: String,
    pub terms: Vec<String>,
}

/// Addressable keyword taxonomy plus the generation metadata that produced it.
///
/// Immutable after build except for term appends performed by the
/// augmentation merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub levels: Vec<Level1Node>,
    pub seed_keywords: Vec<String>,
    pub instructions: String,
    pub model_used: String,
}

impl Taxonomy {
    pub fn level1(&self, id: NodeId) -> Option<&Level1Node> {
        match id {
            NodeId::Level1 { l1 } => self.levels.get(l1),
            _ => None,
        }
    }

    pub fn level2(&self, id: NodeId) -> Option<&Level2Node> {
        match id {
            NodeId::Level2 { l1, l2 } => self.levels.get(l1)?.children.get(l2),
            _ => None,
        }
    }

    pub fn level2_mut(&mut self, id: NodeId) -> Option<&mut Level2Node> {
        match id {
            NodeId::Level2 { l1, l2 } => self.levels.get_mut(l1)?.children.get_mut(l2),
            _ => None,
        }
    }

    pub fn term(&self, id: NodeId) -> Option<&LsiTerm> {
        match id {
            NodeId::Term { l1, l2, term } => {
                self.levels.get(l1)?.children.get(l2)?.terms.get(term)
            }
            _ => None,
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        match id {
            NodeId::Level1 { .. } => self.level1(id).is_some(),
            NodeId::Level2 { .. } => self.level2(id).is_some(),
            NodeId::Term { .. } => self.term(id).is_some(),
        }
    }

    /// Direct children of a node. Terms have none.
    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        match id {
            NodeId::Level1 { .. } => self
                .level1(id)
                .map(|n| n.children.iter().map(|c| c.id).collect())
                .unwrap_or_default(),
            NodeId::Level2 { .. } => self
                .level2(id)
                .map(|n| n.terms.iter().map(|t| t.id).collect())
                .unwrap_or_default(),
            NodeId::Term { .. } => Vec::new(),
        }
    }

    /// All nodes strictly below `id`, in document order.
    pub fn descendants_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        match id {
            NodeId::Level1 { .. } => {
                if let Some(l1) = self.level1(id) {
                    for l2 in &l1.children {
                        out.push(l2.id);
                        out.extend(l2.terms.iter().map(|t| t.id));
                    }
                }
            }
            NodeId::Level2 { .. } => {
                if let Some(l2) = self.level2(id) {
                    out.extend(l2.terms.iter().map(|t| t.id));
                }
            }
            NodeId::Term { .. } => {}
        }
        out
    }

    /// Every node identifier in the tree, in document order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for l1 in &self.levels {
            out.push(l1.id);
            for l2 in &l1.children {
                out.push(l2.id);
                out.extend(l2.terms.iter().map(|t| t.id));
            }
        }
        out
    }

    /// Display text of a node (keyword or term text).
    pub fn text_of(&self, id: NodeId) -> Option<&str> {
        match id {
            NodeId::Level1 { .. } => self.level1(id).map(|n| n.keyword.as_str()),
            NodeId::Level2 { .. } => self.level2(id).map(|n| n.keyword.as_str()),
            NodeId::Term { .. } => self.term(id).map(|t| t.text.as_str()),
        }
    }
}

/// Translations keyed by the same identifiers as the tree, independent of
/// tree structure.
pub type TranslationOverlay = BTreeMap<NodeId, String>;

/// Ancestor context handed to the generation service when augmenting one
/// level-2 node's terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentContext {
    pub seed_keywords: Vec<String>,
    pub instructions: String,
    pub level1_keyword: String,
    pub category: Category,
    pub level2_keyword: String,
    pub stage: Stage,
    /// Current term texts on the node, so the service avoids repeats.
    pub existing_terms: Vec<String>,
}

/// A stored parent project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Curated, pruned snapshot of a taxonomy, persisted under a parent project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSubProject {
    pub id: String,
    pub name: String,
    pub parent_project_id: String,
    pub saved_at: DateTime<Utc>,
    pub model_used: String,
    /// Pruned copy of the taxonomy, identifiers preserved from the live tree.
    pub pruned_hierarchy: Vec<Level1Node>,
    /// Overlay entries restricted to identifiers present in the pruned tree.
    pub translations: TranslationOverlay,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_stage_with_qualifier_when_parsing_then_head_word_decides() {
        assert_eq!(
            Stage::parse("Decision (Commercial Investigation)").unwrap(),
            Stage::Decision
        );
        assert_eq!(Stage::parse("awareness").unwrap(), Stage::Awareness);
        assert!(Stage::parse("Retention").is_err());
    }

    #[test]
    fn given_category_string_when_parsing_then_case_insensitive() {
        assert_eq!(Category::parse(" conversion ").unwrap(), Category::Conversion);
        assert!(Category::parse("Navigation").is_err());
    }
}
