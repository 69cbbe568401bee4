// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Relevance feedback.
//!
//! A caller marks some documents as relevant (an `RSet`). The engine then
//! does two things with it:
//!
//! - **Ranking.** Passing the RSet to `Enquire::get_mset_with` folds
//!   relevant-document counts into every term's relevance weight.
//! - **Expansion.** `Enquire::get_eset` reads the term lists of the relevant
//!   documents and proposes the terms best at separating them from the rest
//!   of the collection, ranked by offer weight.
//!
//! ```text
//!   RSet ──termlists──▶ r per term ──┐
//!                                    ├──▶ offer weight ──▶ filter ──▶ sort ──▶ ESet
//!   merged N, n, R ──────────────────┘
//! ```
//!
//! Document ids in an RSet are global ids, so an RSet over a multi-collection
//! database gives the same suggestions as over one collection holding the
//! same documents.

mod weight;

pub use weight::ExpandWeight;

use crate::collection::DatabaseSnapshot;
use crate::error::{MatchError, Result};
use crate::query::QueryPlan;
use crate::types::{DocCount, DocId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// RELEVANCE SET
// =============================================================================

/// A set of documents marked relevant, by global id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RSet {
    docs: BTreeSet<DocId>,
}

impl RSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `docid` relevant. Adding the same id twice is a no-op. Id 0 is invalid.
    pub fn add_document(&mut self, docid: u32) -> Result<()> {
        self.docs.insert(DocId::from_user(docid)?);
        Ok(())
    }

    /// Unmark `docid`. Returns whether it was marked.
    pub fn remove_document(&mut self, docid: u32) -> Result<bool> {
        Ok(self.docs.remove(&DocId::from_user(docid)?))
    }

    pub fn contains(&self, docid: u32) -> bool {
        DocId::new(docid).is_some_and(|d| self.docs.contains(&d))
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Marked ids, ascending.
    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.docs.iter().copied()
    }
}

// =============================================================================
// EXPANSION
// =============================================================================

/// Veto on candidate expansion terms.
pub trait ExpandDecider: Send + Sync {
    fn accept(&self, term: &str) -> bool;
}

impl<F> ExpandDecider for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn accept(&self, term: &str) -> bool {
        self(term)
    }
}

#[derive(Clone, Copy, Default)]
pub struct ExpandOptions<'a> {
    /// Allow terms of the bound query to be suggested.
    pub include_query_terms: bool,
    pub decider: Option<&'a dyn ExpandDecider>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ESetItem {
    pub term: String,
    pub weight: f64,
}

/// Suggested expansion terms, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ESet {
    items: Vec<ESetItem>,
    ebound: usize,
}

impl ESet {
    pub fn items(&self) -> &[ESetItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ESetItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ESetItem> {
        self.items.iter()
    }

    pub fn terms(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.term.as_str()).collect()
    }

    /// Number of terms that qualified before truncation to the requested size.
    pub fn ebound(&self) -> usize {
        self.ebound
    }
}

/// Rank the terms of the documents in `rset` by offer weight.
///
/// Terms of `plan` are left out unless `options.include_query_terms` is set.
/// Terms whose weight is not positive, and terms the decider rejects, are never
/// suggested.
pub(crate) fn expand(
    snapshot: &DatabaseSnapshot,
    rset: &RSet,
    maxitems: usize,
    options: &ExpandOptions<'_>,
    plan: Option<&QueryPlan>,
) -> Result<ESet> {
    if rset.is_empty() {
        tracing::debug!("empty relevance set, nothing to expand");
        return Ok(ESet::default());
    }

    // r: relevant documents containing each term.
    let mut rel_freq: BTreeMap<String, DocCount> = BTreeMap::new();
    for docid in rset.iter() {
        let mut cursor = snapshot.termlist(docid)?;
        while let Some(term) = cursor.term() {
            *rel_freq.entry(term.to_string()).or_insert(0) += 1;
            cursor.advance();
        }
    }

    let rset_size = DocCount::try_from(rset.len())
        .map_err(|_| MatchError::invalid("relevance set too large"))?;
    let scorer = ExpandWeight::new(snapshot.doc_count(), rset_size);

    let mut items: Vec<ESetItem> = rel_freq
        .into_iter()
        .filter(|(term, _)| {
            options.include_query_terms || !plan.is_some_and(|p| p.contains_term(term))
        })
        .filter(|(term, _)| options.decider.map_or(true, |d| d.accept(term)))
        .filter_map(|(term, r)| {
            let weight = scorer.weight(r, snapshot.term_freq(&term));
            (weight > 0.0).then_some(ESetItem { term, weight })
        })
        .collect();

    let ebound = items.len();
    items.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.term.cmp(&b.term)));
    items.truncate(maxitems);

    tracing::debug!(candidates = ebound, returned = items.len(), "expansion complete");
    Ok(ESet { items, ebound })
}
