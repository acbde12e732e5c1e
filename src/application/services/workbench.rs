//! Workbench service: the live curation session.
//!
//! Owns the current taxonomy, selection set, translation overlay, and the
//! transient augmentation bookkeeping (in-flight flags, recent-term
//! highlights). State sits behind a mutex that is never held across a
//! network await, so toggles and filter reads interleave freely with
//! outstanding generation or augmentation calls.

use std::collections::HashSet;
use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    apply_filter, build_taxonomy, merge_terms, AugmentContext, DomainError, EffectiveState,
    FilterCriteria, Level1Node, NodeId, SelectionSet, Taxonomy, TranslationOverlay,
};
use crate::infrastructure::traits::GenerationService;

/// Serializable workbench state. The in-flight set and the recent-term
/// highlight are session-scoped and never written out.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WorkbenchState {
    pub taxonomy: Option<Taxonomy>,
    /// Incremented on every successful generation; stale augmentation
    /// responses from an earlier tree are recognized and dropped by it.
    pub epoch: u64,
    pub selection: SelectionSet,
    pub translations: TranslationOverlay,
    #[serde(skip)]
    pub recent: HashSet<NodeId>,
    #[serde(skip)]
    in_flight: HashSet<NodeId>,
}

/// Read-only copy of the session for rendering and saving.
#[derive(Debug, Clone)]
pub struct WorkbenchSnapshot {
    pub taxonomy: Option<Taxonomy>,
    pub selection: SelectionSet,
    pub translations: TranslationOverlay,
    pub recent: HashSet<NodeId>,
}

/// Service orchestrating generation, curation, and augmentation over one
/// taxonomy session.
pub struct Workbench {
    state: Mutex<WorkbenchState>,
    generation: Arc<dyn GenerationService>,
    model: String,
    target_language: String,
}

impl Workbench {
    pub fn new(generation: Arc<dyn GenerationService>, model: String) -> Self {
        Self::with_state(generation, model, WorkbenchState::default())
    }

    /// Resume a session from previously persisted state.
    pub fn with_state(
        generation: Arc<dyn GenerationService>,
        model: String,
        state: WorkbenchState,
    ) -> Self {
        Self {
            state: Mutex::new(state),
            generation,
            model,
            target_language: "de".to_string(),
        }
    }

    pub fn target_language(mut self, lang: impl Into<String>) -> Self {
        self.target_language = lang.into();
        self
    }

    /// Generate a fresh taxonomy, discarding the current one on success.
    ///
    /// On failure the prior tree (or its absence) is left untouched so the
    /// user can retry.
    #[instrument(skip(self))]
    pub async fn generate(
        &self,
        seed_keywords: Vec<String>,
        instructions: String,
    ) -> ApplicationResult<()> {
        let raw = self
            .generation
            .generate_hierarchy(&seed_keywords, &instructions)
            .await?;
        let taxonomy = build_taxonomy(raw, seed_keywords, instructions, self.model.clone())?;
        debug!("generated taxonomy: {} level-1 groups", taxonomy.levels.len());

        let mut state = self.state.lock().await;
        state.taxonomy = Some(taxonomy);
        state.epoch += 1;
        state.selection = SelectionSet::new();
        state.translations = TranslationOverlay::new();
        state.recent.clear();
        Ok(())
    }

    /// Toggle a node's selection, cascading per the selection invariant.
    ///
    /// The selection set is replaced as a whole, never edited in place.
    pub async fn toggle(&self, id: NodeId, checked: bool) -> ApplicationResult<()> {
        let mut state = self.state.lock().await;
        let tax = state.taxonomy.as_ref().ok_or(ApplicationError::NoTaxonomy)?;
        let next = state.selection.toggle(tax, id, checked)?;
        state.selection = next;
        Ok(())
    }

    /// Read-time tri-state of one node.
    pub async fn effective_state(&self, id: NodeId) -> ApplicationResult<EffectiveState> {
        let state = self.state.lock().await;
        let tax = state.taxonomy.as_ref().ok_or(ApplicationError::NoTaxonomy)?;
        if !tax.contains(id) {
            return Err(DomainError::UnknownNode(id).into());
        }
        Ok(state.selection.effective_state(tax, id))
    }

    /// Fetch supplementary terms for one level-2 node and merge them in.
    ///
    /// Returns the number of terms actually added. A response that arrives
    /// after the tree was rebuilt (or the node vanished) is dropped
    /// silently and reports zero additions.
    #[instrument(skip(self))]
    pub async fn augment(&self, id: NodeId) -> ApplicationResult<usize> {
        let (context, epoch) = {
            let mut state = self.state.lock().await;
            let tax = state.taxonomy.as_ref().ok_or(ApplicationError::NoTaxonomy)?;
            let context = augment_context(tax, id)?;
            if state.in_flight.contains(&id) {
                return Err(ApplicationError::AugmentInFlight(id));
            }
            let epoch = state.epoch;
            state.in_flight.insert(id);
            (context, epoch)
        };

        // Network call with no lock held; unrelated nodes proceed freely.
        let outcome = self.generation.generate_terms(&context).await;

        let mut state = self.state.lock().await;
        state.in_flight.remove(&id);
        let candidates = outcome?;

        if state.epoch != epoch {
            warn!("dropping stale augmentation response for {}", id);
            return Ok(0);
        }
        let state = &mut *state;
        let Some(tax) = state.taxonomy.as_mut() else {
            return Ok(0);
        };
        let Some(node) = tax.level2_mut(id) else {
            warn!("dropping augmentation response for vanished node {}", id);
            return Ok(0);
        };

        let added = merge_terms(node, candidates);
        // only the latest batch for this node stays highlighted
        state.recent.retain(|r| !r.is_descendant_of(&id));
        state.recent.extend(added.iter().copied());
        Ok(added.len())
    }

    /// Translate the given nodes (all nodes when `ids` is empty) into the
    /// configured target language. Partial provider results are applied;
    /// returns the number of overlay entries written.
    #[instrument(skip(self, ids))]
    pub async fn translate(&self, ids: &[NodeId]) -> ApplicationResult<usize> {
        let requests: Vec<(NodeId, String)> = {
            let state = self.state.lock().await;
            let tax = state.taxonomy.as_ref().ok_or(ApplicationError::NoTaxonomy)?;
            let wanted: Vec<NodeId> = if ids.is_empty() {
                tax.node_ids()
            } else {
                ids.to_vec()
            };
            wanted
                .into_iter()
                .map(|id| {
                    tax.text_of(id)
                        .map(|t| (id, t.to_string()))
                        .ok_or(DomainError::UnknownNode(id))
                })
                .collect::<Result<_, _>>()?
        };

        let texts: Vec<String> = requests.iter().map(|(_, t)| t.clone()).unique().collect();
        let translations = self
            .generation
            .translate_many(&texts, &self.target_language)
            .await?;

        let mut state = self.state.lock().await;
        let mut applied = 0;
        for (id, text) in requests {
            // the tree may have been rebuilt while the call was outstanding
            let still_present = state
                .taxonomy
                .as_ref()
                .map(|t| t.contains(id))
                .unwrap_or(false);
            if !still_present {
                continue;
            }
            if let Some(translated) = translations.get(&text) {
                state.translations.insert(id, translated.clone());
                applied += 1;
            }
        }
        debug!("applied {} translation overlay entries", applied);
        Ok(applied)
    }

    /// Non-mutating filtered view of the current tree.
    pub async fn filtered(&self, criteria: &FilterCriteria) -> ApplicationResult<Vec<Level1Node>> {
        let state = self.state.lock().await;
        let tax = state.taxonomy.as_ref().ok_or(ApplicationError::NoTaxonomy)?;
        Ok(apply_filter(tax, criteria))
    }

    /// Copy of the session for rendering or saving.
    pub async fn snapshot(&self) -> WorkbenchSnapshot {
        let state = self.state.lock().await;
        WorkbenchSnapshot {
            taxonomy: state.taxonomy.clone(),
            selection: state.selection.clone(),
            translations: state.translations.clone(),
            recent: state.recent.clone(),
        }
    }

    /// Serializable state for session persistence between CLI invocations.
    pub async fn into_state(self) -> WorkbenchState {
        self.state.into_inner()
    }
}

/// Assemble the ancestor context for augmenting one level-2 node.
fn augment_context(tax: &Taxonomy, id: NodeId) -> Result<AugmentContext, DomainError> {
    let l1_index = match id {
        NodeId::Level2 { l1, .. } => l1,
        _ => return Err(DomainError::NotLevel2(id)),
    };
    let l1 = tax
        .levels
        .get(l1_index)
        .ok_or(DomainError::UnknownNode(id))?;
    let l2 = tax.level2(id).ok_or(DomainError::UnknownNode(id))?;

    Ok(AugmentContext {
        seed_keywords: tax.seed_keywords.clone(),
        instructions: tax.instructions.clone(),
        level1_keyword: l1.keyword.clone(),
        category: l1.category,
        level2_keyword: l2.keyword.clone(),
        stage: l2.stage,
        existing_terms: l2.terms.iter().map(|t| t.text.clone()).collect(),
    })
}
