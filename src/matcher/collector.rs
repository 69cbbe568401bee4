// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Top-k selection over the merged cursor.
//!
//! The collector keeps the best `first + maxitems` candidates in a bounded
//! heap whose top is the *worst* kept candidate, so a new document only has to
//! beat the top to get in. It also counts every document that passes the
//! cutoffs, which becomes the lower bound on the match count.
//!
//! # Stopping early
//!
//! Once the heap is full and at least `check_at_least` documents have been
//! counted, the rest of the cursor can only matter if it could displace the
//! worst kept candidate:
//!
//! | Order             | Stop when                                   |
//! |-------------------|---------------------------------------------|
//! | boolean, forward  | immediately, later ids always rank lower    |
//! | boolean, reverse  | never, later ids always rank higher         |
//! | relevance         | remaining max weight cannot beat the worst  |
//!
//! The uncounted tail then feeds the remaining-count estimate instead.

use super::multi::MergedCursor;
use super::mset::percent;
use crate::scoring::ranking::{compare_candidates, RankOrder};
use crate::scoring::{CollectionStats, Weighting};
use crate::types::{CountBounds, DocCount, MatchCandidate};
use crate::verify::contracts;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Term-independent weight added to every document.
pub(crate) struct ExtraWeight<'a> {
    pub weighting: &'a dyn Weighting,
    pub collection: &'a CollectionStats,
    pub query_length: u32,
    pub max: f64,
}

pub(crate) struct CollectParams<'a> {
    pub first: usize,
    pub maxitems: usize,
    pub check_at_least: usize,
    pub order: RankOrder,
    pub max_possible: f64,
    pub weight_cutoff: f64,
    pub percent_cutoff: u8,
    pub extra: Option<ExtraWeight<'a>>,
}

impl CollectParams<'_> {
    fn passes(&self, weight: f64) -> bool {
        weight >= self.weight_cutoff
            && (self.percent_cutoff == 0 || percent(weight, self.max_possible) >= self.percent_cutoff)
    }

    fn has_cutoff(&self) -> bool {
        self.weight_cutoff > 0.0 || self.percent_cutoff > 0
    }
}

pub(crate) struct Collected {
    /// The requested page, best first.
    pub page: Vec<MatchCandidate>,
    pub matches: CountBounds,
    pub max_attained: f64,
    pub exhausted: bool,
}

/// Heap entry ordered so that the worst-ranked candidate is the greatest.
struct Ranked {
    cand: MatchCandidate,
    order: RankOrder,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_candidates(&self.cand, &other.cand, self.order)
    }
}

pub(crate) fn collect(cursor: &mut MergedCursor, params: &CollectParams<'_>) -> Collected {
    let capacity = params.first.saturating_add(params.maxitems);
    let boolean = params.order.is_boolean();
    let max_extra = params.extra.as_ref().map_or(0.0, |e| e.max);

    let mut heap: BinaryHeap<Ranked> = BinaryHeap::with_capacity(capacity.min(1024) + 1);
    let mut matched: DocCount = 0;
    let mut max_attained = 0.0f64;
    let mut exhausted = false;

    loop {
        let Some(docid) = cursor.docid() else {
            exhausted = true;
            break;
        };

        if !boolean && !params.passes(cursor.max_weight() + max_extra) {
            // Nothing left can pass the cutoffs, so nothing left counts.
            tracing::trace!(%docid, "remaining documents all below cutoff");
            exhausted = true;
            break;
        }

        if heap.len() >= capacity && matched as usize >= params.check_at_least {
            if capacity == 0 {
                break;
            }
            let stop = match (boolean, params.order.forward(), heap.peek()) {
                (true, true, _) => true,
                (true, false, _) => false,
                (false, forward, Some(worst)) => {
                    let bound = cursor.max_weight() + max_extra;
                    if forward {
                        bound <= worst.cand.weight
                    } else {
                        bound < worst.cand.weight
                    }
                }
                (false, _, None) => false,
            };
            if stop {
                tracing::trace!(%docid, matched, "stopping early");
                break;
            }
        }

        let weight = if boolean {
            0.0
        } else {
            let extra = params.extra.as_ref().map_or(0.0, |e| {
                e.weighting
                    .extra(e.collection, e.query_length, cursor.doc_length())
            });
            cursor.weight() + extra
        };
        contracts::check_weight(docid, weight);
        contracts::check_within_max(docid, weight, params.max_possible);

        if params.passes(weight) {
            matched += 1;
            max_attained = max_attained.max(weight);
            if capacity > 0 {
                heap.push(Ranked {
                    cand: MatchCandidate { docid, weight },
                    order: params.order,
                });
                if heap.len() > capacity {
                    heap.pop();
                }
            }
        }

        cursor.advance();
    }

    let matches = if exhausted {
        CountBounds::exact(matched)
    } else {
        let remaining = cursor.remaining();
        let remaining = if params.has_cutoff() {
            remaining.filtered()
        } else {
            remaining
        };
        let tail = remaining.bounds();
        CountBounds::new(
            matched.saturating_add(tail.min),
            matched.saturating_add(tail.est),
            matched.saturating_add(tail.max),
        )
    };
    contracts::check_count_bounds(&matches);

    let page: Vec<MatchCandidate> = heap
        .into_sorted_vec()
        .into_iter()
        .skip(params.first)
        .take(params.maxitems)
        .map(|r| r.cand)
        .collect();
    contracts::check_ranked_order(&page, params.order);

    Collected {
        page,
        matches,
        max_attained,
        exhausted,
    }
}
