// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a match: document ids, postings, documents, candidates.
//!
//! Everything the engine passes between layers is defined here. The types are
//! deliberately small and `Copy` where they can be, because cursors hand them out
//! once per posting in the hot loop.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **DocId**: never zero. Zero is the "no document" sentinel of the on-disk world,
//!   so we make it unrepresentable instead of checking for it everywhere.
//!
//! - **Posting**: `wdf >= 1`. A posting with zero occurrences is not a posting.
//!
//! - **CountBounds**: `min <= est <= max`. Every constructor clamps into that order.
//!
//! - **MatchCandidate**: `weight` is finite and non-negative. The contracts in
//!   `verify::contracts` abort a match that produces anything else.

use crate::error::MatchError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;

// =============================================================================
// SCALAR ALIASES
// =============================================================================

/// Count of documents (collection size, term frequency, match counts).
pub type DocCount = u32;

/// Within-document frequency of a term.
pub type Wdf = u32;

/// Within-query frequency of a term.
pub type Wqf = u32;

/// Position of a term, either in a document or in a query.
///
/// Query position 0 means "no explicit position".
pub type TermPos = u32;

// =============================================================================
// NEWTYPES
// =============================================================================

/// Type-safe document identifier.
///
/// Unique within one collection; in a multi-collection view the global id is
/// derived from `(sub-collection, local id)` by `collection::database`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(transparent)]
pub struct DocId(NonZeroU32);

impl DocId {
    /// The first id a collection hands out.
    pub const FIRST: DocId = DocId(NonZeroU32::MIN);

    /// Create a DocId, rejecting the reserved zero value.
    #[inline]
    pub fn new(id: u32) -> Option<Self> {
        NonZeroU32::new(id).map(DocId)
    }

    /// Get the underlying value.
    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Zero-based slot for array indexing.
    #[inline]
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// The id immediately after this one, if it fits.
    #[inline]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(DocId)
    }

    /// Parse a caller-supplied id, mapping zero to InvalidArgument.
    pub fn from_user(id: u32) -> Result<Self, MatchError> {
        DocId::new(id).ok_or_else(|| {
            MatchError::InvalidArgument("document id 0 is reserved and never valid".to_string())
        })
    }
}

impl TryFrom<u32> for DocId {
    type Error = MatchError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        DocId::from_user(id)
    }
}

impl From<DocId> for u32 {
    fn from(id: DocId) -> Self {
        id.get()
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// POSTINGS AND CANDIDATES
// =============================================================================

/// One entry of a posting cursor: a document and how often the term occurs in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub docid: DocId,
    pub wdf: Wdf,
}

/// A document produced by the evaluation tree together with its accumulated weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub docid: DocId,
    pub weight: f64,
}

/// Lower bound, best estimate and upper bound of a document count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountBounds {
    pub min: DocCount,
    pub est: DocCount,
    pub max: DocCount,
}

impl CountBounds {
    /// All three figures equal: the count is known exactly.
    pub fn exact(count: DocCount) -> Self {
        Self {
            min: count,
            est: count,
            max: count,
        }
    }

    /// Build bounds, forcing `min <= est <= max`.
    pub fn new(min: DocCount, est: DocCount, max: DocCount) -> Self {
        let max = max.max(min);
        Self {
            min,
            est: est.clamp(min, max),
            max,
        }
    }

    pub fn is_exact(&self) -> bool {
        self.min == self.max
    }
}

// =============================================================================
// DOCUMENTS
// =============================================================================

/// Stored document: an opaque data blob plus numbered metadata values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    data: String,
    #[serde(default)]
    values: BTreeMap<u32, String>,
}

impl Document {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn set_data(&mut self, data: impl Into<String>) {
        self.data = data.into();
    }

    /// Value stored in `slot`, if any.
    pub fn value(&self, slot: u32) -> Option<&str> {
        self.values.get(&slot).map(String::as_str)
    }

    pub fn set_value(&mut self, slot: u32, value: impl Into<String>) {
        self.values.insert(slot, value.into());
    }

    pub fn values(&self) -> &BTreeMap<u32, String> {
        &self.values
    }
}
