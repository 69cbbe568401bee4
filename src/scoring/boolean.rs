// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Pure boolean matching: every document weighs 0 and ranks by id.

use super::core::{TermInput, Weighting};
use crate::types::Wdf;

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolWeight;

impl Weighting for BoolWeight {
    fn name(&self) -> &'static str {
        "bool"
    }

    fn score(&self, _term: &TermInput<'_>, _wdf: Wdf, _doc_length: u32) -> f64 {
        0.0
    }

    fn max_score(&self, _term: &TermInput<'_>) -> f64 {
        0.0
    }

    fn is_boolean(&self) -> bool {
        true
    }
}
