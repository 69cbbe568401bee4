// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ranking: how match candidates get sorted.
//!
//! Two orders exist. Relevance order sorts by weight, highest first, and breaks
//! ties by document id. Boolean order ignores weight entirely (every weight is
//! zero under a boolean scheme) and sorts by document id alone.
//!
//! The direction flag flips the *document id* part of either order. With
//! relevance ranking that only matters for ties; with boolean ranking it turns
//! "oldest first" into "newest first".
//!
//! Both orders are total: two distinct documents never compare equal, so paging
//! through results is deterministic.

use crate::types::MatchCandidate;
use std::cmp::Ordering;

/// How the collector ranks candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    /// Weight descending, then document id (ascending if `forward`).
    Relevance { forward: bool },
    /// Document id only (ascending if `forward`).
    DocId { forward: bool },
}

impl RankOrder {
    /// Pick the order for a weighting scheme and a direction.
    pub fn new(boolean: bool, forward: bool) -> Self {
        if boolean {
            RankOrder::DocId { forward }
        } else {
            RankOrder::Relevance { forward }
        }
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, RankOrder::DocId { .. })
    }

    pub fn forward(self) -> bool {
        match self {
            RankOrder::Relevance { forward } | RankOrder::DocId { forward } => forward,
        }
    }
}

/// Compare two candidates for ranking. `Less` means `a` ranks first.
///
/// Weights compare with `total_cmp`, so the order stays total even if a broken
/// scheme slips a NaN past the contracts.
pub fn compare_candidates(a: &MatchCandidate, b: &MatchCandidate, order: RankOrder) -> Ordering {
    let by_id = |forward: bool| {
        if forward {
            a.docid.cmp(&b.docid)
        } else {
            b.docid.cmp(&a.docid)
        }
    };

    match order {
        RankOrder::Relevance { forward } => match b.weight.total_cmp(&a.weight) {
            Ordering::Equal => by_id(forward),
            ord => ord,
        },
        RankOrder::DocId { forward } => by_id(forward),
    }
}
