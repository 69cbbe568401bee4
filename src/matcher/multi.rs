// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Merging per-collection trees into one stream of global ids.
//!
//! Each sub-collection gets its own evaluation tree over local ids. The merged
//! cursor maps every tree's current id to its global id and always sits on the
//! smallest one. Because the interleaved mapping keeps each sub-collection's
//! ids ascending in global order, the merged stream is ascending too.

use super::estimate::Estimate;
use super::tree::MatchTree;
use crate::collection::{global_docid, local_lower_bound};
use crate::types::DocId;
use crate::verify::contracts;

pub(crate) struct SubTree {
    pub tree: MatchTree,
    /// Position of the sub-collection in the snapshot.
    pub index: usize,
    /// Documents in that sub-collection, for its remaining-count estimate.
    pub doc_count: f64,
}

impl SubTree {
    fn global(&self, n: usize) -> Option<DocId> {
        let local = self.tree.docid()?;
        Some(contracts::check_global_id(
            local,
            self.index,
            global_docid(local, self.index, n),
        ))
    }
}

pub(crate) struct MergedCursor {
    subs: Vec<SubTree>,
    n: usize,
    /// Slot in `subs` and global id of the current document.
    current: Option<(usize, DocId)>,
}

impl MergedCursor {
    /// `n` is the number of sub-collections in the snapshot, including ones with no tree.
    pub fn new(subs: Vec<SubTree>, n: usize) -> Self {
        let mut cursor = Self {
            subs,
            n,
            current: None,
        };
        cursor.settle();
        cursor
    }

    fn settle(&mut self) {
        let mut best: Option<(usize, DocId)> = None;
        for (slot, sub) in self.subs.iter().enumerate() {
            let Some(global) = sub.global(self.n) else {
                continue;
            };
            match best {
                Some((other, g)) if g == global => {
                    contracts::check_distinct_global_ids(self.subs[other].index, sub.index, global)
                }
                Some((_, g)) if g < global => {}
                _ => best = Some((slot, global)),
            }
        }
        self.current = best;
    }

    pub fn docid(&self) -> Option<DocId> {
        self.current.map(|(_, g)| g)
    }

    /// Move past the current document. Every other sub-collection already sits
    /// beyond it, so this is a skip to the next global id.
    pub fn advance(&mut self) {
        let Some((slot, before)) = self.current else {
            return;
        };
        match before.next() {
            Some(next) => self.skip_to(next),
            None => {
                self.subs[slot].tree.advance();
                self.settle();
            }
        }
        contracts::check_advanced(before, self.docid());
    }

    /// Move to the first document with global id `>= target`, translating the
    /// target into a local lower bound for each sub-collection.
    pub fn skip_to(&mut self, target: DocId) {
        let before = self.docid();
        if before.is_some_and(|d| d >= target) {
            return;
        }
        for sub in &mut self.subs {
            let local = local_lower_bound(target, sub.index, self.n);
            if sub.tree.docid().is_some_and(|d| d < local) {
                sub.tree.skip_to(local);
            }
        }
        self.settle();
        contracts::check_skipped(before, target, self.docid());
    }

    pub fn weight(&self) -> f64 {
        self.current
            .map_or(0.0, |(slot, _)| self.subs[slot].tree.weight())
    }

    pub fn doc_length(&self) -> u32 {
        self.current
            .map_or(0, |(slot, _)| self.subs[slot].tree.doc_length())
    }

    /// Highest weight any document still ahead can reach, across all sub-collections.
    pub fn max_weight(&self) -> f64 {
        self.subs
            .iter()
            .map(|s| s.tree.max_weight())
            .fold(0.0, f64::max)
    }

    /// Documents still ahead, counting the current one.
    pub fn remaining(&self) -> Estimate {
        self.subs
            .iter()
            .map(|s| s.tree.remaining(s.doc_count))
            .fold(Estimate::default(), Estimate::plus)
    }
}
