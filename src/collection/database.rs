// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! A `Database` groups collections into one searchable view.
//!
//! # Global document ids
//!
//! With `n` sub-collections, local id `l` of sub-collection `k` (zero-based) is
//! exposed as
//!
//! ```text
//!   global = (l - 1) * n + k + 1
//!   k      = (global - 1) % n
//!   l      = (global - 1) / n + 1
//! ```
//!
//! so ids interleave: with two collections, globals 1, 3, 5, ... come from the
//! first and 2, 4, 6, ... from the second. The mapping is a bijection, cheap in
//! both directions, and keeps each sub-collection's ids ascending in global order.
//!
//! # Sharing
//!
//! `Database` is a handle. Clones share the collection list, and
//! `add_database` through any clone is seen by all of them. Every match takes a
//! `DatabaseSnapshot` first, so collections added mid-match only affect the
//! next one.

use super::{Collection, TermCursor};
use crate::error::{MatchError, Result};
use crate::types::{DocCount, DocId, Document};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// ID MAPPING
// =============================================================================

/// Global id of local id `local` in sub-collection `sub` of `n`. `None` on overflow.
#[inline]
pub fn global_docid(local: DocId, sub: usize, n: usize) -> Option<DocId> {
    let global = (u64::from(local.get()) - 1) * n as u64 + sub as u64 + 1;
    u32::try_from(global).ok().and_then(DocId::new)
}

/// `(sub-collection, local id)` of a global id.
#[inline]
pub fn local_docid(global: DocId, n: usize) -> (usize, DocId) {
    let g = u64::from(global.get()) - 1;
    let n = n.max(1) as u64;
    let local = (g / n + 1) as u32;
    ((g % n) as usize, DocId::new(local).unwrap_or(DocId::FIRST))
}

/// Smallest local id in sub-collection `sub` whose global id is `>= global`.
#[inline]
pub fn local_lower_bound(global: DocId, sub: usize, n: usize) -> DocId {
    let target = u64::from(global.get());
    let offset = sub as u64 + 1;
    if target <= offset {
        return DocId::FIRST;
    }
    let n = n.max(1) as u64;
    let local = (target - offset).div_ceil(n) + 1;
    DocId::new(u32::try_from(local).unwrap_or(u32::MAX)).unwrap_or(DocId::FIRST)
}

fn relabel_not_found(global: DocId) -> impl FnOnce(MatchError) -> MatchError {
    move |err| match err {
        MatchError::DocNotFound { .. } => MatchError::DocNotFound {
            docid: global.get(),
        },
        other => other,
    }
}

// =============================================================================
// DATABASE HANDLE
// =============================================================================

/// Shared, growable list of collections.
#[derive(Clone, Default)]
pub struct Database {
    collections: Arc<RwLock<Vec<Arc<dyn Collection>>>>,
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("collections", &self.collections.read().len())
            .finish()
    }
}

impl Database {
    /// A database with no collections. Every query against it matches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_collection<C: Collection + 'static>(collection: C) -> Self {
        let db = Self::new();
        db.add_collection(Arc::new(collection));
        db
    }

    pub fn add_collection(&self, collection: Arc<dyn Collection>) {
        self.collections.write().push(collection);
    }

    /// Append every collection `other` currently holds.
    pub fn add_database(&self, other: &Database) {
        let theirs: Vec<_> = other.collections.read().clone();
        tracing::debug!(added = theirs.len(), "extending database");
        self.collections.write().extend(theirs);
    }

    /// Freeze the current collection list for one operation.
    pub fn snapshot(&self) -> DatabaseSnapshot {
        DatabaseSnapshot {
            collections: self.collections.read().iter().cloned().collect(),
        }
    }

    pub fn collection_count(&self) -> usize {
        self.collections.read().len()
    }

    pub fn doc_count(&self) -> DocCount {
        self.snapshot().doc_count()
    }

    pub fn avg_length(&self) -> f64 {
        self.snapshot().avg_length()
    }

    pub fn term_freq(&self, term: &str) -> DocCount {
        self.snapshot().term_freq(term)
    }

    pub fn term_exists(&self, term: &str) -> bool {
        self.snapshot().term_exists(term)
    }

    /// Fetch a document by global id.
    ///
    /// Id 0 is `InvalidArgument`; unused or out-of-range ids are `DocNotFound`.
    pub fn document(&self, docid: u32) -> Result<Document> {
        self.snapshot().document(docid)
    }

    /// Open a term cursor over a document by global id. Same errors as `document`.
    pub fn termlist(&self, docid: u32) -> Result<Box<dyn TermCursor>> {
        let docid = DocId::from_user(docid)?;
        self.snapshot().termlist(docid)
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Immutable view of a database's collections at one point in time.
#[derive(Clone)]
pub struct DatabaseSnapshot {
    collections: Arc<[Arc<dyn Collection>]>,
}

impl fmt::Debug for DatabaseSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSnapshot")
            .field("collections", &self.collections.len())
            .finish()
    }
}

impl DatabaseSnapshot {
    pub fn collections(&self) -> &[Arc<dyn Collection>] {
        &self.collections
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn doc_count(&self) -> DocCount {
        self.collections.iter().map(|c| c.doc_count()).sum()
    }

    pub fn total_length(&self) -> u64 {
        self.collections.iter().map(|c| c.total_length()).sum()
    }

    pub fn avg_length(&self) -> f64 {
        match self.doc_count() {
            0 => 0.0,
            n => self.total_length() as f64 / f64::from(n),
        }
    }

    pub fn term_freq(&self, term: &str) -> DocCount {
        self.collections.iter().map(|c| c.term_freq(term)).sum()
    }

    pub fn term_exists(&self, term: &str) -> bool {
        self.collections.iter().any(|c| c.term_exists(term))
    }

    /// The collection holding `global` and the local id inside it.
    pub fn locate(&self, global: DocId) -> Result<(&Arc<dyn Collection>, DocId)> {
        let (sub, local) = local_docid(global, self.collections.len());
        self.collections
            .get(sub)
            .map(|c| (c, local))
            .ok_or(MatchError::DocNotFound {
                docid: global.get(),
            })
    }

    pub fn document(&self, docid: u32) -> Result<Document> {
        let global = DocId::from_user(docid)?;
        let (sub, local) = self.locate(global)?;
        sub.document(local).map_err(relabel_not_found(global))
    }

    pub fn doc_length(&self, global: DocId) -> Result<u32> {
        let (sub, local) = self.locate(global)?;
        sub.doc_length(local).map_err(relabel_not_found(global))
    }

    pub fn termlist(&self, global: DocId) -> Result<Box<dyn TermCursor>> {
        let (sub, local) = self.locate(global)?;
        sub.termlist(local).map_err(relabel_not_found(global))
    }
}
