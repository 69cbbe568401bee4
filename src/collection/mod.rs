// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Collections: where documents, postings and term statistics come from.
//!
//! The match engine never looks inside a storage backend. It talks to the
//! `Collection` trait, which answers statistics questions and opens cursors.
//! `InMemoryCollection` is the backend this crate ships; anything else (an
//! on-disk index, a remote shard) plugs in by implementing the same trait.
//!
//! A `Database` is a handle on an ordered list of collections. Matching against
//! it interleaves their document ids into one global id space, see `database`.
//!
//! # Lifetimes
//!
//! Cursors handed out by a collection keep its data alive. Dropping the
//! `Database` (or the collection) while a cursor is still open is fine.

mod database;
mod load;
mod memory;

pub use database::{global_docid, local_docid, local_lower_bound, Database, DatabaseSnapshot};
pub use load::{CollectionFile, DocumentRecord};
pub use memory::{CollectionBuilder, InMemoryCollection, IndexedDocument};

use crate::error::Result;
use crate::postings::PostingCursor;
use crate::types::{DocCount, DocId, Document, Wdf};
use std::fmt;

/// A source of documents and postings.
///
/// Implementations must be shareable across threads: several matches may read
/// the same collection at once.
pub trait Collection: Send + Sync + fmt::Debug {
    /// Number of documents present (unused ids do not count).
    fn doc_count(&self) -> DocCount;

    /// Highest document id ever handed out, 0 when empty.
    fn last_docid(&self) -> u32;

    /// Sum of all document lengths.
    fn total_length(&self) -> u64;

    /// Number of documents containing `term`.
    fn term_freq(&self, term: &str) -> DocCount;

    /// Total occurrences of `term`.
    fn coll_freq(&self, term: &str) -> u64;

    /// Open a cursor over the postings of `term`. Unknown terms give an exhausted cursor.
    fn postings(&self, term: &str) -> Box<dyn PostingCursor>;

    fn document(&self, docid: DocId) -> Result<Document>;

    fn doc_length(&self, docid: DocId) -> Result<u32>;

    /// Open a cursor over the terms of one document, in ascending term order.
    fn termlist(&self, docid: DocId) -> Result<Box<dyn TermCursor>>;

    fn avg_length(&self) -> f64 {
        match self.doc_count() {
            0 => 0.0,
            n => self.total_length() as f64 / f64::from(n),
        }
    }

    fn term_exists(&self, term: &str) -> bool {
        self.term_freq(term) > 0
    }
}

/// Forward-only cursor over the terms of one document.
///
/// Restart by asking the collection for a new one.
pub trait TermCursor: fmt::Debug + Send {
    /// Term under the cursor, `None` once exhausted.
    fn term(&self) -> Option<&str>;

    /// Occurrences of the current term in the document, 0 once exhausted.
    fn wdf(&self) -> Wdf;

    fn advance(&mut self);

    /// Move to the first term `>= target`. Never moves backward.
    fn skip_to(&mut self, target: &str);

    /// Number of distinct terms in the document.
    fn term_count(&self) -> usize;

    fn doc_length(&self) -> u32;
}

/// Drain a term cursor into `(term, wdf)` pairs.
pub fn collect_terms(mut cursor: Box<dyn TermCursor>) -> Vec<(String, Wdf)> {
    let mut out = Vec::with_capacity(cursor.term_count());
    while let Some(term) = cursor.term() {
        out.push((term.to_string(), cursor.wdf()));
        cursor.advance();
    }
    out
}
