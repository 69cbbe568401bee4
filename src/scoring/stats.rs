// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Collection and term statistics, merged across every sub-collection of a match.
//!
//! Weights must not depend on how documents happen to be split between
//! collections. So before any cursor opens, the statistics of every
//! sub-collection are summed into one `MatchStats`, and every scheme only ever
//! sees the merged figures. Sums are done in integers, so a merged view and a
//! single collection holding the same documents produce bit-identical weights.

use crate::collection::DatabaseSnapshot;
use crate::error::Result;
use crate::expand::RSet;
use crate::types::DocCount;
use std::collections::BTreeMap;

/// Statistics for the whole collection set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub doc_count: DocCount,
    pub total_length: u64,
    /// Number of documents in the relevance set, 0 without one.
    pub rset_size: DocCount,
}

impl CollectionStats {
    /// Average document length, 0 for an empty collection.
    pub fn avg_length(&self) -> f64 {
        if self.doc_count == 0 {
            0.0
        } else {
            self.total_length as f64 / f64::from(self.doc_count)
        }
    }
}

/// Statistics for one term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TermStats {
    /// Documents containing the term.
    pub term_freq: DocCount,
    /// Total occurrences of the term.
    pub coll_freq: u64,
    /// Documents in the relevance set containing the term.
    pub rel_term_freq: DocCount,
}

impl TermStats {
    fn absorb(&mut self, other: TermStats) {
        self.term_freq += other.term_freq;
        self.coll_freq += other.coll_freq;
        self.rel_term_freq += other.rel_term_freq;
    }
}

/// Merged statistics for one match.
#[derive(Debug, Clone, Default)]
pub struct MatchStats {
    pub collection: CollectionStats,
    terms: BTreeMap<String, TermStats>,
}

impl MatchStats {
    /// Sum statistics for `terms` over every collection in `snapshot`.
    ///
    /// Relevance counts are filled in from `rset` when one is given. A relevance
    /// document that does not exist is reported as `DocNotFound`.
    pub fn gather<'a, I>(snapshot: &DatabaseSnapshot, terms: I, rset: Option<&RSet>) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut stats = MatchStats::default();
        for term in terms {
            stats.terms.entry(term.to_string()).or_default();
        }

        for sub in snapshot.collections() {
            stats.collection.doc_count += sub.doc_count();
            stats.collection.total_length += sub.total_length();
            for (term, entry) in stats.terms.iter_mut() {
                entry.absorb(TermStats {
                    term_freq: sub.term_freq(term),
                    coll_freq: sub.coll_freq(term),
                    rel_term_freq: 0,
                });
            }
        }

        if let Some(rset) = rset {
            stats.collection.rset_size = rset.len() as DocCount;
            for docid in rset.iter() {
                // Terms iterate in ascending order, so one forward cursor per document suffices.
                let mut cursor = snapshot.termlist(docid)?;
                for (term, entry) in stats.terms.iter_mut() {
                    cursor.skip_to(term);
                    if cursor.term() == Some(term.as_str()) {
                        entry.rel_term_freq += 1;
                    }
                }
            }
        }

        Ok(stats)
    }

    /// Statistics for `term`, all zero if the term was not gathered or is absent.
    pub fn term(&self, term: &str) -> TermStats {
        self.terms.get(term).copied().unwrap_or_default()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &TermStats)> {
        self.terms.iter().map(|(t, s)| (t.as_str(), s))
    }
}
