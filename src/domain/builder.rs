//! Tree builder: turns raw, ID-less generation output into an addressable
//! taxonomy.
//!
//! Identifiers come from structural position alone, so building twice from
//! the same raw hierarchy yields the same identifiers. A failed augmentation
//! on one node can therefore never disturb identifiers anywhere else.

use tracing::debug;

use crate::domain::entities::{
    Category, Level1Node, Level2Node, LsiTerm, RawHierarchy, Stage, Taxonomy,
};
use crate::domain::error::DomainResult;
use crate::domain::node_id::NodeId;

/// Build an addressable taxonomy from raw generation output.
///
/// Pure function of its input; an unrecognized category or stage string is
/// rejected as a malformed payload.
pub fn build_taxonomy(
    raw: RawHierarchy,
    seed_keywords: Vec<String>,
    instructions: String,
    model_used: String,
) -> DomainResult<Taxonomy> {
    let mut levels = Vec::with_capacity(raw.entries.len());

    for (i, raw_l1) in raw.entries.into_iter().enumerate() {
        let category = Category::parse(&raw_l1.category)?;
        let mut children = Vec::with_capacity(raw_l1.children.len());

        for (j, raw_l2) in raw_l1.children.into_iter().enumerate() {
            let stage = Stage::parse(&raw_l2.stage)?;
            let terms = raw_l2
                .terms
                .into_iter()
                .enumerate()
                .map(|(k, text)| LsiTerm {
                    id: NodeId::term(i, j, k),
                    text,
                })
                .collect();

            children.push(Level2Node {
                id: NodeId::level2(i, j),
                keyword: raw_l2.keyword,
                stage,
                terms,
            });
        }

        levels.push(Level1Node {
            id: NodeId::level1(i),
            keyword: raw_l1.keyword,
            category,
            page_kind: raw_l1.page_kind,
            children,
        });
    }

    debug!("built taxonomy with {} level-1 groups", levels.len());
    Ok(Taxonomy {
        levels,
        seed_keywords,
        instructions,
        model_used,
    })
}
