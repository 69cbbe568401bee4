// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The contract every weighting scheme implements.
//!
//! A scheme turns statistics into a number. It never sees a cursor or a
//! collection, only the figures in `TermInput` plus the per-document wdf and
//! length. That keeps schemes pure: the same inputs give the same weight no
//! matter how many sub-collections the statistics were merged from.
//!
//! # Key Invariants
//!
//! - `score` is finite, non-negative, and non-decreasing in `wdf`.
//! - `max_score` is an upper bound on `score` over every wdf and document length.
//!   The matcher prunes with it, so an optimistic bound only costs speed but a
//!   pessimistic one loses documents.
//! - A boolean scheme scores everything 0 and has bound 0.

use super::stats::{CollectionStats, TermStats};
use crate::types::{Wdf, Wqf};
use std::fmt;

/// Everything a scheme may know about one query term.
#[derive(Debug, Clone, Copy)]
pub struct TermInput<'a> {
    pub collection: &'a CollectionStats,
    pub stats: &'a TermStats,
    pub wqf: Wqf,
    pub query_length: u32,
}

/// A weighting scheme.
pub trait Weighting: Send + Sync + fmt::Debug {
    /// Short lowercase name, used in logs and config.
    fn name(&self) -> &'static str;

    /// Contribution of one term to one document.
    fn score(&self, term: &TermInput<'_>, wdf: Wdf, doc_length: u32) -> f64;

    /// Upper bound of `score` for this term.
    fn max_score(&self, term: &TermInput<'_>) -> f64;

    /// Per-document weight that does not depend on any term.
    fn extra(&self, _collection: &CollectionStats, _query_length: u32, _doc_length: u32) -> f64 {
        0.0
    }

    fn max_extra(&self, _collection: &CollectionStats, _query_length: u32) -> f64 {
        0.0
    }

    /// Boolean schemes rank by document id instead of weight.
    fn is_boolean(&self) -> bool {
        false
    }
}

/// Robertson/Sparck Jones relevance weight, shared by the probabilistic schemes.
///
/// Without relevance information this is `(N - n + 0.5) / (n + 0.5)`. With an
/// RSet of size `R` in which `r` documents contain the term it becomes
///
/// ```text
///   (r + 0.5) (N - n - R + r + 0.5)
///   -------------------------------
///     (R - r + 0.5) (n - r + 0.5)
/// ```
///
/// Ratios below 2 are squashed to `ratio / 2 + 1` before the log, so very common
/// terms get a small positive weight rather than a negative one.
pub fn relevance_weight(collection: &CollectionStats, stats: &TermStats) -> f64 {
    let big_n = f64::from(collection.doc_count);
    let n = f64::from(stats.term_freq);

    let ratio = if collection.rset_size > 0 {
        let big_r = f64::from(collection.rset_size);
        let r = f64::from(stats.rel_term_freq);
        ((r + 0.5) * (big_n - n - big_r + r + 0.5)) / ((big_r - r + 0.5) * (n - r + 0.5))
    } else {
        (big_n - n + 0.5) / (n + 0.5)
    };

    // Inconsistent relevance counts can push the ratio negative.
    let ratio = if ratio.is_finite() { ratio.max(0.0) } else { 0.0 };
    let ratio = if ratio < 2.0 { ratio * 0.5 + 1.0 } else { ratio };
    ratio.ln()
}

/// Document length relative to the average, `1.0` for an empty collection.
pub(crate) fn normalised_length(collection: &CollectionStats, doc_length: u32) -> f64 {
    let avg = collection.avg_length();
    if avg > 0.0 {
        f64::from(doc_length) / avg
    } else {
        1.0
    }
}
