// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Offer weight for expansion terms.

use crate::scoring::{relevance_weight, CollectionStats, TermStats};
use crate::types::DocCount;

/// Robertson's offer weight: `r * ln(tw')`, where `tw'` is the relevance
/// weight ratio of the term after squashing (see `relevance_weight`).
///
/// A term that occurs in more relevant documents and fewer documents overall
/// scores higher. Terms in no relevant document score 0.
#[derive(Debug, Clone, Copy)]
pub struct ExpandWeight {
    collection: CollectionStats,
}

impl ExpandWeight {
    pub fn new(doc_count: DocCount, rset_size: DocCount) -> Self {
        Self {
            collection: CollectionStats {
                doc_count,
                total_length: 0,
                rset_size,
            },
        }
    }

    /// Weight of a term found in `rel_term_freq` relevant documents and `term_freq` documents overall.
    pub fn weight(&self, rel_term_freq: DocCount, term_freq: DocCount) -> f64 {
        if rel_term_freq == 0 {
            return 0.0;
        }
        let stats = TermStats {
            term_freq,
            coll_freq: 0,
            rel_term_freq,
        };
        f64::from(rel_term_freq) * relevance_weight(&self.collection, &stats)
    }
}
