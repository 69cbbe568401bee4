// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Type wrappers that make invalid posting data unrepresentable.
//!
//! Every cursor in the engine assumes its postings are strictly ascending by
//! document id, carry at least one occurrence, and list positions in order. The
//! leapfrog intersection and the positional filters silently return wrong answers
//! if any of that fails. So instead of re-checking in the hot loop, posting lists
//! are wrapped in `ValidatedPostingList` once, at collection build time, and the
//! cursors only ever see the wrapped form.
//!
//! | Type                   | What's Guaranteed                                  |
//! |------------------------|----------------------------------------------------|
//! | `ValidatedPostingList` | non-empty, strictly ascending ids, wdf >= 1,       |
//! |                        | positions ascending, collection frequency correct  |

use crate::postings::PostingEntry;
use std::fmt;

/// Error type for invariant violations in collection data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// Posting list ids are not strictly ascending.
    UnsortedPostingList { position: usize, term: String },
    /// A posting claims zero occurrences of its term.
    ZeroWdf { term: String, docid: u32 },
    /// Term positions within one posting are not ascending.
    UnsortedPositions { term: String, docid: u32 },
    /// Posting list is empty (every indexed term has at least one posting).
    EmptyPostingList { term: String },
    /// More documents than a 32-bit id space can address.
    TooManyDocuments { count: usize },
    /// A document's total term count does not fit in a `u32`.
    DocumentTooLong { docid: u32 },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantError::UnsortedPostingList { position, term } => {
                write!(
                    f,
                    "posting list for '{}' not sorted at position {}",
                    term, position
                )
            }
            InvariantError::ZeroWdf { term, docid } => {
                write!(f, "posting for '{}' in document {} has wdf 0", term, docid)
            }
            InvariantError::UnsortedPositions { term, docid } => {
                write!(
                    f,
                    "positions for '{}' in document {} are not ascending",
                    term, docid
                )
            }
            InvariantError::EmptyPostingList { term } => {
                write!(f, "posting list for '{}' is empty", term)
            }
            InvariantError::TooManyDocuments { count } => {
                write!(f, "{} documents exceed the document id space", count)
            }
            InvariantError::DocumentTooLong { docid } => {
                write!(f, "length of document {} overflows", docid)
            }
        }
    }
}

impl std::error::Error for InvariantError {}

/// A posting list whose ordering and frequency invariants have been checked.
///
/// # Invariants (enforced at construction)
/// - at least one entry
/// - `entries[i].docid < entries[i + 1].docid`
/// - every `wdf >= 1`
/// - every positions list ascending
/// - `coll_freq == sum(wdf)`
#[derive(Debug, Clone)]
pub struct ValidatedPostingList {
    term: String,
    entries: Vec<PostingEntry>,
    coll_freq: u64,
}

impl ValidatedPostingList {
    /// Validate `entries` as the posting list of `term`.
    pub fn new(term: impl Into<String>, entries: Vec<PostingEntry>) -> Result<Self, InvariantError> {
        let term = term.into();

        if entries.is_empty() {
            return Err(InvariantError::EmptyPostingList { term });
        }

        let mut coll_freq = 0u64;
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 && entries[i - 1].docid >= entry.docid {
                return Err(InvariantError::UnsortedPostingList { position: i, term });
            }
            if entry.wdf == 0 {
                return Err(InvariantError::ZeroWdf {
                    term,
                    docid: entry.docid.get(),
                });
            }
            if entry.positions.windows(2).any(|w| w[0] > w[1]) {
                return Err(InvariantError::UnsortedPositions {
                    term,
                    docid: entry.docid.get(),
                });
            }
            coll_freq += u64::from(entry.wdf);
        }

        Ok(Self {
            term,
            entries,
            coll_freq,
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn entries(&self) -> &[PostingEntry] {
        &self.entries
    }

    /// Number of documents containing the term.
    pub fn doc_freq(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Total occurrences of the term across the collection.
    pub fn coll_freq(&self) -> u64 {
        self.coll_freq
    }
}
