// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The result of a match: one ranked page plus the statistics around it.

use crate::collection::DatabaseSnapshot;
use crate::error::{MatchError, Result};
use crate::types::{CountBounds, DocCount, DocId, Document};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Map a weight to a percentage of `max_possible`.
///
/// `round(99 * weight / max(1, max_possible)) + 1`, clamped to `0..=100`. The
/// floor of 1 keeps every matching document visibly above zero; a boolean
/// match, where everything weighs 0, reports 1 throughout.
pub fn percent(weight: f64, max_possible: f64) -> u8 {
    let scale = max_possible.max(1.0);
    let p = (99.0 * weight / scale).round() + 1.0;
    if p.is_nan() {
        return 0;
    }
    p.clamp(0.0, 100.0) as u8
}

/// One ranked document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MSetItem {
    pub docid: DocId,
    pub weight: f64,
    pub percent: u8,
}

/// Statistics for one query term over the whole database.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TermInfo {
    /// Documents containing the term, summed over every collection.
    pub term_freq: DocCount,
    /// Largest contribution the term can make to a document's weight.
    pub term_weight: f64,
}

/// A ranked page of matching documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MSet {
    items: Vec<MSetItem>,
    first: usize,
    matches: CountBounds,
    max_possible: f64,
    max_attained: f64,
    term_info: BTreeMap<String, TermInfo>,
    #[serde(skip)]
    snapshot: Option<DatabaseSnapshot>,
}

impl PartialEq for MSet {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
            && self.first == other.first
            && self.matches == other.matches
            && self.max_possible == other.max_possible
            && self.max_attained == other.max_attained
            && self.term_info == other.term_info
    }
}

impl MSet {
    pub(crate) fn new(
        items: Vec<MSetItem>,
        first: usize,
        matches: CountBounds,
        max_possible: f64,
        max_attained: f64,
        term_info: BTreeMap<String, TermInfo>,
        snapshot: Option<DatabaseSnapshot>,
    ) -> Self {
        Self {
            items,
            first,
            matches,
            max_possible,
            max_attained,
            term_info,
            snapshot,
        }
    }

    pub fn items(&self) -> &[MSetItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Rank of the first item in the full result list, as requested.
    pub fn first(&self) -> usize {
        self.first
    }

    pub fn get(&self, index: usize) -> Option<&MSetItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MSetItem> {
        self.items.iter()
    }

    /// Document ids in rank order.
    pub fn docids(&self) -> Vec<u32> {
        self.items.iter().map(|i| i.docid.get()).collect()
    }

    pub fn matches(&self) -> CountBounds {
        self.matches
    }

    pub fn matches_lower_bound(&self) -> DocCount {
        self.matches.min
    }

    pub fn matches_estimated(&self) -> DocCount {
        self.matches.est
    }

    pub fn matches_upper_bound(&self) -> DocCount {
        self.matches.max
    }

    /// Upper bound on the weight any document could have reached.
    pub fn max_possible(&self) -> f64 {
        self.max_possible
    }

    /// Highest weight actually seen among matching documents.
    pub fn max_attained(&self) -> f64 {
        self.max_attained
    }

    /// Percentage for an arbitrary weight, on the same scale as the items.
    pub fn percent(&self, weight: f64) -> u8 {
        percent(weight, self.max_possible)
    }

    /// Merged document frequency of a query term.
    pub fn termfreq(&self, term: &str) -> Result<DocCount> {
        self.info(term).map(|i| i.term_freq)
    }

    /// Maximum weight contribution of a query term.
    pub fn termweight(&self, term: &str) -> Result<f64> {
        self.info(term).map(|i| i.term_weight)
    }

    fn info(&self, term: &str) -> Result<&TermInfo> {
        self.term_info
            .get(term)
            .ok_or_else(|| MatchError::UnknownQueryTerm {
                term: term.to_string(),
            })
    }

    /// Fetch the stored document of the item at `index`.
    pub fn document(&self, index: usize) -> Result<Document> {
        let item = self.items.get(index).ok_or_else(|| {
            MatchError::invalid(format!(
                "item {} out of range for a page of {}",
                index,
                self.items.len()
            ))
        })?;
        let snapshot = self
            .snapshot
            .as_ref()
            .ok_or_else(|| MatchError::invalid("result set is not attached to a database"))?;
        snapshot.document(item.docid.get())
    }
}

impl<'a> IntoIterator for &'a MSet {
    type Item = &'a MSetItem;
    type IntoIter = std::slice::Iter<'a, MSetItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
