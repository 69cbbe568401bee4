// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides the canonical fixture corpora so every test builds identical
//! collections.

#![doc(hidden)]

use crate::collection::{CollectionBuilder, Database, InMemoryCollection, IndexedDocument};
use crate::types::DocId;

/// Text of the main fixture. "word" occurs in documents 2 (twice) and 4 only;
/// "this" occurs in all six.
pub const SIMPLE_TEXTS: [&str; 6] = [
    "This is a test document used with the API test",
    "This paragraph contains the word we search for and the word appears twice",
    "This is another paragraph of simple text",
    "This document mentions word once and is rather longer than most of the others in the simple collection",
    "This one is simple",
    "This paragraph is the last one, another test",
];

/// A second small collection to merge with the first. Document 1 holds "inmemory" and "word".
pub const SIMPLE_TEXTS2: [&str; 3] = [
    "inmemory word this",
    "another simple document",
    "this word again in a separate collection",
];

/// Documents built to exercise relevance feedback: "cat" and "mouse" cluster together.
pub const RSET_TEXTS: [&str; 6] = [
    "cat dog",
    "cat mouse cheese",
    "dog bird",
    "fish bird water",
    "cat dog mouse cheese",
    "fish water",
];

/// Build a collection, one document per text. The data blob is the text itself.
pub fn collection(texts: &[&str]) -> InMemoryCollection {
    let mut builder = CollectionBuilder::new();
    for text in texts {
        builder.add_document(IndexedDocument::from_text(*text, text));
    }
    match builder.build() {
        Ok(collection) => collection,
        Err(e) => panic!("fixture collection failed to build: {}", e),
    }
}

pub fn database(texts: &[&str]) -> Database {
    Database::from_collection(collection(texts))
}

/// One database holding a sub-collection per entry of `parts`, in order.
pub fn multi_database(parts: &[&[&str]]) -> Database {
    let db = Database::new();
    for part in parts {
        db.add_database(&database(part));
    }
    db
}

/// A single collection laid out on the global ids `multi_database(parts)` would use.
///
/// Document `l` of part `k` lands on id `(l - 1) * n + k + 1`; ids no part fills
/// stay unused. Matching it must give exactly what matching the merged view gives.
pub fn interleaved(parts: &[&[&str]]) -> Database {
    let n = parts.len() as u32;
    let mut builder = CollectionBuilder::new();
    for (k, part) in (0u32..).zip(parts) {
        for (l, text) in (1u32..).zip(part.iter()) {
            builder.set_document(docid((l - 1) * n + k + 1), IndexedDocument::from_text(*text, text));
        }
    }
    match builder.build() {
        Ok(collection) => Database::from_collection(collection),
        Err(e) => panic!("interleaved fixture failed to build: {}", e),
    }
}

pub fn simple_data() -> Database {
    database(&SIMPLE_TEXTS)
}

pub fn simple_data2() -> Database {
    database(&SIMPLE_TEXTS2)
}

/// Terms whose alphabetical order differs from their order in the text.
pub fn term_order() -> Database {
    database(&["zebra yak xylophone walrus", "walrus zebra"])
}

pub fn one_doc() -> Database {
    database(&["the only document in here"])
}

pub fn rset_data() -> Database {
    database(&RSET_TEXTS)
}

/// Shorthand for a non-zero id in tests.
pub fn docid(n: u32) -> DocId {
    match DocId::new(n) {
        Some(id) => id,
        None => panic!("document id 0 used in a test"),
    }
}
