// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime contracts for the match engine.
//!
//! Each function here states one promise the engine makes and panics with a
//! "Contract violation" message when it is broken. A broken contract means the
//! result of the current match is meaningless, so aborting is the only honest
//! outcome.
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! | Contract Function            | Promise                                          | Cost  |
//! |------------------------------|--------------------------------------------------|-------|
//! | `check_advanced`             | `advance` moves strictly forward                 | O(1)  |
//! | `check_skipped`              | `skip_to` never moves backward, lands >= target  | O(1)  |
//! | `check_weight`               | weights are finite and non-negative              | O(1)  |
//! | `check_within_max`           | no weight exceeds the advertised maximum         | O(1)  |
//! | `check_distinct_global_ids`  | sub-collections never share a global id          | O(1)  |
//! | `check_global_id`            | every local id has a global id                   | O(1)  |
//! | `check_count_bounds`         | `lower <= estimated <= upper`                    | O(1)  |
//! | `check_ranked_order`         | result items are in rank order                   | O(n)  |
//!
//! The O(1) checks run in release builds too. `check_ranked_order` is a
//! `debug_assert!` so it costs nothing in release.

use crate::scoring::ranking::{compare_candidates, RankOrder};
use crate::types::{CountBounds, DocId, MatchCandidate};
use std::cmp::Ordering;

/// Slack allowed when comparing a weight against its upper bound. The bound is
/// summed in a different order than the weight, so the last bits can differ.
const MAX_WEIGHT_SLACK: f64 = 1e-9;

// ============================================================================
// CURSOR MOVEMENT
// ============================================================================

/// `advance` must leave the cursor strictly after where it was, or exhausted.
#[inline]
pub fn check_advanced(before: DocId, after: Option<DocId>) {
    if let Some(after) = after {
        assert!(
            after > before,
            "Contract violation: advance moved from document {} to {}",
            before,
            after
        );
    }
}

/// `skip_to(target)` never moves backward and lands on or after `target`.
#[inline]
pub fn check_skipped(before: Option<DocId>, target: DocId, after: Option<DocId>) {
    if let Some(after) = after {
        assert!(
            after >= target,
            "Contract violation: skip_to({}) stopped early at {}",
            target,
            after
        );
        if let Some(before) = before {
            assert!(
                after >= before,
                "Contract violation: skip_to({}) moved backward from {} to {}",
                target,
                before,
                after
            );
        }
    }
}

// ============================================================================
// WEIGHTS
// ============================================================================

/// Every weight the engine produces is finite and non-negative.
#[inline]
pub fn check_weight(docid: DocId, weight: f64) {
    assert!(
        weight.is_finite() && weight >= 0.0,
        "Contract violation: document {} got weight {}",
        docid,
        weight
    );
}

/// No document may outscore the maximum the match advertised.
#[inline]
pub fn check_within_max(docid: DocId, weight: f64, max_possible: f64) {
    let slack = MAX_WEIGHT_SLACK * max_possible.abs().max(1.0);
    assert!(
        weight <= max_possible + slack,
        "Contract violation: document {} weight {} exceeds max_possible {}",
        docid,
        weight,
        max_possible
    );
}

// ============================================================================
// MULTI-COLLECTION MERGE
// ============================================================================

/// Two sub-collections positioned on the same global id means the id mapping is broken.
#[inline]
pub fn check_distinct_global_ids(first: usize, second: usize, global: DocId) {
    assert!(
        first == second,
        "Contract violation: sub-collections {} and {} both produced global id {}",
        first,
        second,
        global
    );
}

/// A local id whose global id does not fit in a `DocId` would drop the rest of
/// its sub-collection from the merge. Returns the global id when it exists.
#[inline]
pub fn check_global_id(local: DocId, sub: usize, global: Option<DocId>) -> DocId {
    match global {
        Some(global) => global,
        None => panic!(
            "Contract violation: local id {} of sub-collection {} has no global id",
            local, sub
        ),
    }
}

// ============================================================================
// RESULT SET
// ============================================================================

#[inline]
pub fn check_count_bounds(bounds: &CountBounds) {
    assert!(
        bounds.min <= bounds.est && bounds.est <= bounds.max,
        "Contract violation: match counts out of order ({} <= {} <= {})",
        bounds.min,
        bounds.est,
        bounds.max
    );
}

/// Items must come out in rank order with no docid repeated.
///
/// # Panics (debug builds only)
/// Panics at the first adjacent pair that is not strictly ordered.
#[inline]
pub fn check_ranked_order(items: &[MatchCandidate], order: RankOrder) {
    for pair in items.windows(2) {
        debug_assert!(
            compare_candidates(&pair[0], &pair[1], order) == Ordering::Less,
            "Contract violation: document {} ranked before {} under {:?}",
            pair[0].docid,
            pair[1].docid,
            order
        );
    }
}
