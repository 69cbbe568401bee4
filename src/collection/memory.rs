// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! In-memory collection backend.
//!
//! Documents are added to a `CollectionBuilder`, which assigns ids, inverts the
//! term occurrences into posting lists and validates every list. The finished
//! `InMemoryCollection` is immutable and cheap to clone; all clones and every
//! cursor they open share one `Arc`'d store.
//!
//! Posting lists are sorted by term, so term lookup is a binary search over the
//! list array and needs no separate dictionary.

use super::{Collection, TermCursor};
use crate::error::{MatchError, Result};
use crate::postings::{seek_from, EmptyCursor, PostingCursor, PostingEntry};
use crate::types::{CountBounds, DocCount, DocId, Document, Posting, TermPos, Wdf};
use crate::verify::{InvariantError, ValidatedPostingList};
use std::collections::BTreeMap;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// =============================================================================
// INPUT DOCUMENTS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Occurrences {
    wdf: Wdf,
    positions: Vec<TermPos>,
}

/// A document together with the terms it should be indexed under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexedDocument {
    document: Document,
    terms: BTreeMap<String, Occurrences>,
}

impl IndexedDocument {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            terms: BTreeMap::new(),
        }
    }

    /// Index `text` word by word: lowercase alphanumeric runs, positions from 1.
    pub fn from_text(data: impl Into<String>, text: &str) -> Self {
        let mut doc = Self::new(Document::new(data));
        let words = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty());
        for (pos, word) in (1..).zip(words) {
            doc.add_posting(word.to_lowercase(), pos);
        }
        doc
    }

    /// Record one occurrence of `term` at `pos`.
    pub fn add_posting(&mut self, term: impl Into<String>, pos: TermPos) {
        let occ = self.terms.entry(term.into()).or_default();
        occ.wdf += 1;
        let at = occ.positions.partition_point(|&p| p < pos);
        occ.positions.insert(at, pos);
    }

    /// Record `wdf` occurrences of `term` without positions.
    pub fn add_term(&mut self, term: impl Into<String>, wdf: Wdf) {
        self.terms.entry(term.into()).or_default().wdf += wdf;
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Sum of the wdf of every term.
    pub fn length(&self) -> u64 {
        self.terms.values().map(|o| u64::from(o.wdf)).sum()
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Accumulates documents and produces an immutable `InMemoryCollection`.
#[derive(Debug, Clone, Default)]
pub struct CollectionBuilder {
    slots: Vec<Option<IndexedDocument>>,
}

impl CollectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document under the next free id and return that id.
    pub fn add_document(&mut self, doc: IndexedDocument) -> u32 {
        self.slots.push(Some(doc));
        self.slots.len() as u32
    }

    /// Store a document under an explicit id, leaving any skipped ids unused.
    pub fn set_document(&mut self, docid: DocId, doc: IndexedDocument) {
        let index = docid.index();
        if self.slots.len() <= index {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(doc);
    }

    /// Remove a document, leaving its id unused.
    pub fn delete_document(&mut self, docid: DocId) -> Result<()> {
        match self.slots.get_mut(docid.index()) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                Ok(())
            }
            _ => Err(MatchError::DocNotFound { docid: docid.get() }),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invert, validate and freeze.
    pub fn build(self) -> Result<InMemoryCollection> {
        if self.slots.len() > u32::MAX as usize {
            return Err(InvariantError::TooManyDocuments {
                count: self.slots.len(),
            }
            .into());
        }

        let mut postings: BTreeMap<String, Vec<PostingEntry>> = BTreeMap::new();
        let mut docs = Vec::with_capacity(self.slots.len());
        let mut doc_count: DocCount = 0;
        let mut total_length = 0u64;

        for (docid, slot) in (1u32..).zip(self.slots) {
            let Some(indexed) = slot else {
                docs.push(None);
                continue;
            };
            let docid = DocId::new(docid).ok_or(InvariantError::TooManyDocuments {
                count: docid as usize,
            })?;
            let length = u32::try_from(indexed.length())
                .map_err(|_| InvariantError::DocumentTooLong { docid: docid.get() })?;

            let mut terms = Vec::with_capacity(indexed.terms.len());
            for (term, occ) in indexed.terms {
                if occ.wdf == 0 {
                    continue;
                }
                terms.push((term.clone(), occ.wdf));
                postings.entry(term).or_default().push(PostingEntry {
                    docid,
                    wdf: occ.wdf,
                    positions: occ.positions,
                });
            }

            doc_count += 1;
            total_length += u64::from(length);
            docs.push(Some(StoredDoc {
                document: indexed.document,
                length,
                terms,
            }));
        }

        let lists = validate_lists(postings)?;
        tracing::debug!(
            documents = doc_count,
            terms = lists.len(),
            "built in-memory collection"
        );

        Ok(InMemoryCollection {
            inner: Arc::new(Store {
                docs,
                lists,
                doc_count,
                total_length,
            }),
        })
    }
}

#[cfg(feature = "parallel")]
fn validate_lists(
    postings: BTreeMap<String, Vec<PostingEntry>>,
) -> Result<Vec<ValidatedPostingList>, InvariantError> {
    postings
        .into_par_iter()
        .map(|(term, entries)| ValidatedPostingList::new(term, entries))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn validate_lists(
    postings: BTreeMap<String, Vec<PostingEntry>>,
) -> Result<Vec<ValidatedPostingList>, InvariantError> {
    postings
        .into_iter()
        .map(|(term, entries)| ValidatedPostingList::new(term, entries))
        .collect()
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Debug)]
struct StoredDoc {
    document: Document,
    length: u32,
    /// Ascending by term.
    terms: Vec<(String, Wdf)>,
}

#[derive(Debug)]
struct Store {
    docs: Vec<Option<StoredDoc>>,
    /// Ascending by term.
    lists: Vec<ValidatedPostingList>,
    doc_count: DocCount,
    total_length: u64,
}

impl Store {
    fn list(&self, term: &str) -> Option<usize> {
        self.lists
            .binary_search_by(|l| l.term().cmp(term))
            .ok()
    }

    fn doc(&self, docid: DocId) -> Result<&StoredDoc> {
        match self.docs.get(docid.index()) {
            Some(Some(doc)) => Ok(doc),
            _ => Err(MatchError::DocNotFound { docid: docid.get() }),
        }
    }
}

/// Immutable in-memory collection. Clones share storage.
#[derive(Debug, Clone)]
pub struct InMemoryCollection {
    inner: Arc<Store>,
}

impl InMemoryCollection {
    /// All indexed terms, ascending.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.inner.lists.iter().map(ValidatedPostingList::term)
    }
}

impl Collection for InMemoryCollection {
    fn doc_count(&self) -> DocCount {
        self.inner.doc_count
    }

    fn last_docid(&self) -> u32 {
        self.inner.docs.len() as u32
    }

    fn total_length(&self) -> u64 {
        self.inner.total_length
    }

    fn term_freq(&self, term: &str) -> DocCount {
        self.inner
            .list(term)
            .map_or(0, |i| self.inner.lists[i].doc_freq())
    }

    fn coll_freq(&self, term: &str) -> u64 {
        self.inner
            .list(term)
            .map_or(0, |i| self.inner.lists[i].coll_freq())
    }

    fn postings(&self, term: &str) -> Box<dyn PostingCursor> {
        match self.inner.list(term) {
            Some(list) => Box::new(MemoryPostingCursor {
                store: Arc::clone(&self.inner),
                list,
                pos: 0,
            }),
            None => Box::new(EmptyCursor),
        }
    }

    fn document(&self, docid: DocId) -> Result<Document> {
        self.inner.doc(docid).map(|d| d.document.clone())
    }

    fn doc_length(&self, docid: DocId) -> Result<u32> {
        self.inner.doc(docid).map(|d| d.length)
    }

    fn termlist(&self, docid: DocId) -> Result<Box<dyn TermCursor>> {
        self.inner.doc(docid)?;
        Ok(Box::new(MemoryTermCursor {
            store: Arc::clone(&self.inner),
            doc: docid.index(),
            pos: 0,
        }))
    }
}

// =============================================================================
// CURSORS
// =============================================================================

struct MemoryPostingCursor {
    store: Arc<Store>,
    list: usize,
    pos: usize,
}

impl MemoryPostingCursor {
    fn entries(&self) -> &[PostingEntry] {
        self.store.lists[self.list].entries()
    }
}

impl PostingCursor for MemoryPostingCursor {
    fn current(&self) -> Option<Posting> {
        self.entries().get(self.pos).map(|e| Posting {
            docid: e.docid,
            wdf: e.wdf,
        })
    }

    fn advance(&mut self) {
        if self.pos < self.entries().len() {
            self.pos += 1;
        }
    }

    fn skip_to(&mut self, target: DocId) {
        self.pos = seek_from(self.entries(), self.pos, target);
    }

    fn remaining(&self) -> CountBounds {
        CountBounds::exact(self.entries().len().saturating_sub(self.pos) as DocCount)
    }

    fn positions(&self) -> &[TermPos] {
        self.entries()
            .get(self.pos)
            .map(|e| e.positions.as_slice())
            .unwrap_or(&[])
    }

    fn doc_length(&self) -> u32 {
        self.entries()
            .get(self.pos)
            .and_then(|e| self.store.docs.get(e.docid.index()))
            .and_then(Option::as_ref)
            .map_or(0, |d| d.length)
    }
}

#[derive(Debug)]
struct MemoryTermCursor {
    store: Arc<Store>,
    doc: usize,
    pos: usize,
}

impl MemoryTermCursor {
    fn stored(&self) -> Option<&StoredDoc> {
        self.store.docs.get(self.doc).and_then(Option::as_ref)
    }

    fn terms(&self) -> &[(String, Wdf)] {
        self.stored().map(|d| d.terms.as_slice()).unwrap_or(&[])
    }
}

impl TermCursor for MemoryTermCursor {
    fn term(&self) -> Option<&str> {
        self.terms().get(self.pos).map(|(t, _)| t.as_str())
    }

    fn wdf(&self) -> Wdf {
        self.terms().get(self.pos).map_or(0, |(_, w)| *w)
    }

    fn advance(&mut self) {
        if self.pos < self.terms().len() {
            self.pos += 1;
        }
    }

    fn skip_to(&mut self, target: &str) {
        let terms = self.terms();
        let start = self.pos.min(terms.len());
        self.pos = start + terms[start..].partition_point(|(t, _)| t.as_str() < target);
    }

    fn term_count(&self) -> usize {
        self.terms().len()
    }

    fn doc_length(&self) -> u32 {
        self.stored().map_or(0, |d| d.length)
    }
}
