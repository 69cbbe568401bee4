// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! BM25 probabilistic weighting.
//!
//! ```text
//!   term part  = idf * (k3 + 1) wqf / (k3 + wqf)
//!                    * (k1 + 1) wdf / (k1 (b L + 1 - b) + wdf)
//!   doc extra  = k2 * query_length * 2 / (1 + L)
//!   L          = max(doc_length / avg_length, min_normlen)
//! ```
//!
//! `idf` is the relevance weight from `scoring::relevance_weight`, so an RSet
//! feeds straight into the ranking.
//!
//! # Constants
//!
//! | Param        | Default | Effect                                              |
//! |--------------|---------|-----------------------------------------------------|
//! | k1           | 1.0     | wdf saturation; 0 makes wdf irrelevant              |
//! | k2           | 0.0     | weight of the short-document bonus                  |
//! | k3           | 1.0     | wqf saturation                                      |
//! | b            | 0.5     | strength of length normalisation, in [0, 1]         |
//! | min_normlen  | 0.5     | floor on L so tiny documents can't run away         |
//!
//! `xtask verify` checks that the config defaults agree with this table.

use super::core::{normalised_length, relevance_weight, TermInput, Weighting};
use super::stats::CollectionStats;
use crate::error::{MatchError, Result};
use crate::types::Wdf;
use serde::{Deserialize, Serialize};

pub const BM25_DEFAULT_K1: f64 = 1.0;
pub const BM25_DEFAULT_K2: f64 = 0.0;
pub const BM25_DEFAULT_K3: f64 = 1.0;
pub const BM25_DEFAULT_B: f64 = 0.5;
pub const BM25_DEFAULT_MIN_NORMLEN: f64 = 0.5;

/// Tunable BM25 parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bm25Params {
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub b: f64,
    pub min_normlen: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: BM25_DEFAULT_K1,
            k2: BM25_DEFAULT_K2,
            k3: BM25_DEFAULT_K3,
            b: BM25_DEFAULT_B,
            min_normlen: BM25_DEFAULT_MIN_NORMLEN,
        }
    }
}

impl Bm25Params {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("k1", self.k1),
            ("k2", self.k2),
            ("k3", self.k3),
            ("min_normlen", self.min_normlen),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::invalid(format!(
                    "bm25 {} must be finite and >= 0, got {}",
                    name, value
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(MatchError::invalid(format!(
                "bm25 b must be in [0, 1], got {}",
                self.b
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Bm25Weight {
    params: Bm25Params,
}

impl Bm25Weight {
    pub fn new(params: Bm25Params) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &Bm25Params {
        &self.params
    }

    fn term_weight(&self, term: &TermInput<'_>) -> f64 {
        let k3 = self.params.k3;
        let wqf = f64::from(term.wqf);
        let wqf_part = if wqf == 0.0 { 0.0 } else { (k3 + 1.0) * wqf / (k3 + wqf) };
        relevance_weight(term.collection, term.stats) * wqf_part
    }

    fn length(&self, collection: &CollectionStats, doc_length: u32) -> f64 {
        normalised_length(collection, doc_length).max(self.params.min_normlen)
    }
}

impl Weighting for Bm25Weight {
    fn name(&self) -> &'static str {
        "bm25"
    }

    fn score(&self, term: &TermInput<'_>, wdf: Wdf, doc_length: u32) -> f64 {
        let Bm25Params { k1, b, .. } = self.params;
        let wdf = f64::from(wdf);
        let norm = self.length(term.collection, doc_length);
        let denom = k1 * (norm * b + 1.0 - b) + wdf;
        if denom <= 0.0 {
            return 0.0;
        }
        self.term_weight(term) * wdf * (k1 + 1.0) / denom
    }

    fn max_score(&self, term: &TermInput<'_>) -> f64 {
        self.term_weight(term) * (self.params.k1 + 1.0)
    }

    fn extra(&self, collection: &CollectionStats, query_length: u32, doc_length: u32) -> f64 {
        let norm = self.length(collection, doc_length);
        self.params.k2 * f64::from(query_length) * 2.0 / (1.0 + norm)
    }

    fn max_extra(&self, _collection: &CollectionStats, query_length: u32) -> f64 {
        self.params.k2 * f64::from(query_length) * 2.0 / (1.0 + self.params.min_normlen)
    }
}
