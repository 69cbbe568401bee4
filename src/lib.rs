// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Ranked boolean and probabilistic matching over term-indexed collections.
//!
//! Given one or more collections and a query tree, the engine produces a ranked
//! page of documents (an `MSet`) with match-count bounds, weights and
//! percentages. It merges results across collections as if they were one, and
//! turns a set of relevant documents into suggested expansion terms (an `ESet`).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────────────────────┐
//! │   query     │────▶│  QueryPlan   │────▶│          matcher             │
//! │ (Query tree,│     │ (normalised, │     │ tree ─▶ multi ─▶ collector   │
//! │  mutators)  │     │  frozen)     │     │              │               │
//! └─────────────┘     └──────────────┘     └──────────────┼───────────────┘
//!                                                         ▼
//! ┌─────────────┐     ┌──────────────┐           ┌────────────────┐
//! │ collection  │────▶│   scoring    │──────────▶│  MSet / ESet   │
//! │ (Database,  │     │ (stats, BM25,│           └────────────────┘
//! │  postings)  │     │  Trad, Bool) │                    ▲
//! └─────────────┘     └──────────────┘           ┌────────┴───────┐
//!        │                                       │    expand      │
//!        └──────────────────────────────────────▶│ (RSet, offer   │
//!                                                │  weight)       │
//!                                                └────────────────┘
//!        all of the above check their invariants through `verify`
//! ```
//!
//! # Modules
//!
//! | Module       | Role                                                      |
//! |--------------|-----------------------------------------------------------|
//! | `types`      | `DocId`, postings, counts, stored documents               |
//! | `collection` | `Collection` trait, in-memory backend, `Database` handle  |
//! | `postings`   | posting cursor protocol                                   |
//! | `query`      | query trees and their frozen plans                        |
//! | `scoring`    | statistics, weighting schemes, rank order                 |
//! | `matcher`    | evaluation tree, multi-collection merge, top-k, `Enquire` |
//! | `expand`     | relevance sets and term expansion                         |
//! | `config`     | JSON-loadable engine configuration                        |
//! | `verify`     | runtime contracts and validated posting lists             |
//!
//! # Usage
//!
//! ```
//! use quarry::{CollectionBuilder, Database, Enquire, IndexedDocument, Op, Query, RSet};
//!
//! let mut builder = CollectionBuilder::new();
//! for text in ["the cat sat", "the dog sat", "a cat and a dog"] {
//!     builder.add_document(IndexedDocument::from_text(text, text));
//! }
//! let db = Database::from_collection(builder.build().unwrap());
//!
//! let mut enquire = Enquire::new(&db);
//! enquire.set_query(&Query::from_terms(Op::Or, ["cat", "dog"])).unwrap();
//! let mset = enquire.get_mset(0, 10).unwrap();
//! assert_eq!(mset.matches_estimated(), 3);
//!
//! let mut rset = RSet::new();
//! rset.add_document(mset.get(0).unwrap().docid.get()).unwrap();
//! let eset = enquire.get_eset(5, &rset).unwrap();
//! assert!(eset.iter().all(|item| item.weight > 0.0));
//! ```

pub mod collection;
pub mod config;
mod error;
pub mod expand;
pub mod matcher;
pub mod postings;
pub mod query;
pub mod scoring;
pub mod testing;
mod types;
pub mod verify;

// Re-exports for public API
pub use collection::{
    Collection, CollectionBuilder, CollectionFile, Database, DatabaseSnapshot, DocumentRecord,
    InMemoryCollection, IndexedDocument, TermCursor,
};
pub use config::{EngineConfig, ExpandConfig, WeightingConfig};
pub use error::{MatchError, Result};
pub use expand::{ESet, ESetItem, ExpandDecider, ExpandOptions, ExpandWeight, RSet};
pub use matcher::{percent, Enquire, MSet, MSetItem, TermInfo};
pub use postings::{PostingCursor, PostingEntry};
pub use query::{Op, Query, QueryNode, QueryPlan};
pub use scoring::ranking::RankOrder;
pub use scoring::{
    Bm25Params, Bm25Weight, BoolWeight, CollectionStats, TermInput, TermStats, TradWeight,
    Weighting,
};
pub use types::{
    CountBounds, DocCount, DocId, Document, MatchCandidate, Posting, TermPos, Wdf, Wqf,
};
pub use verify::{InvariantError, ValidatedPostingList};
