// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Posting cursors: forward-only iteration over the documents containing a term.
//!
//! Every leaf of an evaluation tree is a `PostingCursor`. The protocol:
//!
//! - A fresh cursor is already positioned on its first posting (or exhausted).
//! - `advance` moves to the next posting.
//! - `skip_to(target)` moves to the first posting with id `>= target`. If the
//!   cursor is already there, nothing happens. It never moves backward.
//! - Once `current()` returns `None` the cursor stays exhausted.
//!
//! Backends are free to store postings however they like; the in-memory one keeps
//! a `ValidatedPostingList` per term and seeks with `seek_from`.

use crate::types::{CountBounds, DocId, Posting, TermPos, Wdf};

/// One stored posting, with the positions of the term inside the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingEntry {
    pub docid: DocId,
    pub wdf: Wdf,
    pub positions: Vec<TermPos>,
}

/// Forward-only cursor over one term's postings in one collection.
pub trait PostingCursor: Send {
    /// The posting under the cursor, `None` once exhausted.
    fn current(&self) -> Option<Posting>;

    fn advance(&mut self);

    fn skip_to(&mut self, target: DocId);

    /// Bounds on the number of postings left, counting the current one.
    fn remaining(&self) -> CountBounds;

    /// Positions of the term in the current document, ascending. Empty when the
    /// backend stores none or the cursor is exhausted.
    fn positions(&self) -> &[TermPos];

    /// Length of the current document, 0 when exhausted.
    fn doc_length(&self) -> u32;

    fn docid(&self) -> Option<DocId> {
        self.current().map(|p| p.docid)
    }
}

/// A cursor over nothing, used for terms a collection has never seen.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyCursor;

impl PostingCursor for EmptyCursor {
    fn current(&self) -> Option<Posting> {
        None
    }

    fn advance(&mut self) {}

    fn skip_to(&mut self, _target: DocId) {}

    fn remaining(&self) -> CountBounds {
        CountBounds::exact(0)
    }

    fn positions(&self) -> &[TermPos] {
        &[]
    }

    fn doc_length(&self) -> u32 {
        0
    }
}

/// Index of the first entry at or after `from` whose id is `>= target`.
///
/// Gallops forward from `from` and then binary-searches the bracketed range, so
/// short skips stay cheap while long ones are logarithmic.
pub fn seek_from(entries: &[PostingEntry], from: usize, target: DocId) -> usize {
    let len = entries.len();
    if from >= len || entries[from].docid >= target {
        return from;
    }

    // entries[lo].docid < target holds throughout.
    let mut lo = from;
    let mut step = 1;
    let mut hi = loop {
        let probe = lo + step;
        if probe >= len {
            break len;
        }
        if entries[probe].docid >= target {
            break probe;
        }
        lo = probe;
        step *= 2;
    };

    hi = hi.min(len);
    lo + 1 + entries[lo + 1..hi].partition_point(|e| e.docid < target)
}
