// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Traditional probabilistic weighting: the pre-BM25 formula.
//!
//! `idf * wqf * (k + 1) wdf / (k L + wdf)` with `L = doc_length / avg_length`.
//! No length floor, no wqf saturation.

use super::core::{normalised_length, relevance_weight, TermInput, Weighting};
use crate::error::{MatchError, Result};
use crate::types::Wdf;

pub const TRAD_DEFAULT_K: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct TradWeight {
    k: f64,
}

impl Default for TradWeight {
    fn default() -> Self {
        Self { k: TRAD_DEFAULT_K }
    }
}

impl TradWeight {
    pub fn new(k: f64) -> Result<Self> {
        if !k.is_finite() || k < 0.0 {
            return Err(MatchError::invalid(format!(
                "trad k must be finite and >= 0, got {}",
                k
            )));
        }
        Ok(Self { k })
    }

    pub fn k(&self) -> f64 {
        self.k
    }

    fn term_weight(term: &TermInput<'_>) -> f64 {
        relevance_weight(term.collection, term.stats) * f64::from(term.wqf)
    }
}

impl Weighting for TradWeight {
    fn name(&self) -> &'static str {
        "trad"
    }

    fn score(&self, term: &TermInput<'_>, wdf: Wdf, doc_length: u32) -> f64 {
        let wdf = f64::from(wdf);
        let denom = self.k * normalised_length(term.collection, doc_length) + wdf;
        if denom <= 0.0 {
            return 0.0;
        }
        Self::term_weight(term) * wdf * (self.k + 1.0) / denom
    }

    fn max_score(&self, term: &TermInput<'_>) -> f64 {
        Self::term_weight(term) * (self.k + 1.0)
    }
}
