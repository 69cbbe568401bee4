// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! JSON collection files.
//!
//! ```json
//! {
//!   "documents": [
//!     { "data": "first", "text": "free text, tokenized into positioned terms" },
//!     { "id": 7, "data": "explicit id", "values": { "0": "meta" },
//!       "positions": { "word": [1, 4] }, "wdf": { "tag": 3 } }
//!   ]
//! }
//! ```
//!
//! Documents without an `id` take the next id after the previous document.
//! `positions` adds positioned occurrences, `wdf` adds unpositioned ones, and
//! both combine with `text`.

use super::{CollectionBuilder, InMemoryCollection, IndexedDocument};
use crate::error::{MatchError, Result};
use crate::types::{DocId, Document, TermPos, Wdf};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Deserialize, Clone, Debug)]
pub struct CollectionFile {
    pub documents: Vec<DocumentRecord>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct DocumentRecord {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub values: BTreeMap<u32, String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub positions: BTreeMap<String, Vec<TermPos>>,
    #[serde(default)]
    pub wdf: BTreeMap<String, Wdf>,
}

impl DocumentRecord {
    fn into_indexed(self) -> IndexedDocument {
        let mut doc = match &self.text {
            Some(text) => IndexedDocument::from_text(self.data.clone(), text),
            None => IndexedDocument::new(Document::new(self.data.clone())),
        };
        for (slot, value) in self.values {
            doc.document_mut().set_value(slot, value);
        }
        for (term, positions) in self.positions {
            for pos in positions {
                doc.add_posting(term.clone(), pos);
            }
        }
        for (term, wdf) in self.wdf {
            doc.add_term(term, wdf);
        }
        doc
    }
}

impl CollectionFile {
    pub fn into_collection(self) -> Result<InMemoryCollection> {
        let mut builder = CollectionBuilder::new();
        let mut next = 1u32;
        for record in self.documents {
            let id = record.id.unwrap_or(next);
            let docid = DocId::new(id).ok_or_else(|| {
                MatchError::invalid("collection file uses reserved document id 0")
            })?;
            next = id.saturating_add(1);
            builder.set_document(docid, record.into_indexed());
        }
        builder.build()
    }
}

impl InMemoryCollection {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CollectionFile = serde_json::from_str(json)?;
        file.into_collection()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading collection file");
        Self::from_json_str(&json)
    }
}
