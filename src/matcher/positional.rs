// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Positional checks for `Near` and `Phrase` on one document.
//!
//! Both take one ascending position list per query term. A document whose
//! backend stored no positions has empty lists and never matches.

use crate::types::TermPos;

/// Some choice of one position per list spans less than `window`
/// (`max - min < window`), in any order.
pub(crate) fn near_match(lists: &[&[TermPos]], window: u32) -> bool {
    if lists.is_empty() || lists.iter().any(|l| l.is_empty()) {
        return false;
    }

    // Sweep: always advance the list holding the smallest position.
    let mut idx = vec![0usize; lists.len()];
    loop {
        let mut lowest = 0;
        let mut min = TermPos::MAX;
        let mut max = 0;
        for (i, list) in lists.iter().enumerate() {
            let p = list[idx[i]];
            if p < min {
                min = p;
                lowest = i;
            }
            max = max.max(p);
        }
        if max - min < window {
            return true;
        }
        idx[lowest] += 1;
        if idx[lowest] == lists[lowest].len() {
            return false;
        }
    }
}

/// Positions strictly increase from list to list and the whole run spans less
/// than `window` (`last - first < window`).
pub(crate) fn phrase_match(lists: &[&[TermPos]], window: u32) -> bool {
    let Some((head, rest)) = lists.split_first() else {
        return false;
    };

    for &start in head.iter() {
        let mut prev = start;
        for list in rest {
            let at = list.partition_point(|&p| p <= prev);
            match list.get(at) {
                Some(&p) => prev = p,
                // Later starts only push `prev` further right.
                None => return false,
            }
        }
        if prev - start < window {
            return true;
        }
    }
    false
}
