// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Engine configuration, loadable from JSON.
//!
//! Every field has a default, so `{}` is a valid config and a file only needs
//! to name what it changes. Unknown keys are ignored, which lets a newer config
//! file load on an older build.
//!
//! ```json
//! {
//!   "weighting": { "scheme": "bm25", "k1": 1.2, "b": 0.75 },
//!   "sort_forward": true,
//!   "percent_cutoff": 0,
//!   "weight_cutoff": 0.0,
//!   "check_at_least": 0,
//!   "expand": { "include_query_terms": false }
//! }
//! ```
//!
//! The BM25 defaults here come from `scoring::Bm25Params::default()`;
//! `xtask verify` checks that the documented table in `scoring/bm25.rs` agrees.

use crate::error::{MatchError, Result};
use crate::scoring::{Bm25Params, Bm25Weight, BoolWeight, TradWeight, Weighting, TRAD_DEFAULT_K};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Which weighting scheme to rank with, and its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum WeightingConfig {
    Bm25 {
        #[serde(flatten)]
        params: Bm25Params,
    },
    Trad {
        #[serde(default = "default_trad_k")]
        k: f64,
    },
    Bool,
}

fn default_trad_k() -> f64 {
    TRAD_DEFAULT_K
}

impl Default for WeightingConfig {
    fn default() -> Self {
        WeightingConfig::Bm25 {
            params: Bm25Params::default(),
        }
    }
}

impl WeightingConfig {
    /// Out-of-range parameters are reported as `MatchError::Config`.
    pub fn build(&self) -> Result<Arc<dyn Weighting>> {
        let weighting: Arc<dyn Weighting> = match self {
            WeightingConfig::Bm25 { params } => {
                Arc::new(Bm25Weight::new(*params).map_err(into_config)?)
            }
            WeightingConfig::Trad { k } => Arc::new(TradWeight::new(*k).map_err(into_config)?),
            WeightingConfig::Bool => Arc::new(BoolWeight),
        };
        Ok(weighting)
    }
}

fn into_config(e: MatchError) -> MatchError {
    match e {
        MatchError::Config(_) => e,
        other => MatchError::Config(other.to_string()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpandConfig {
    pub include_query_terms: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weighting: WeightingConfig,
    pub sort_forward: bool,
    pub percent_cutoff: u8,
    pub weight_cutoff: f64,
    pub check_at_least: u32,
    pub expand: ExpandConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weighting: WeightingConfig::default(),
            sort_forward: true,
            percent_cutoff: 0,
            weight_cutoff: 0.0,
            check_at_least: 0,
            expand: ExpandConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading engine config");
        Self::from_json_str(&json)
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<()> {
        if self.percent_cutoff > 100 {
            return Err(MatchError::Config(format!(
                "percent_cutoff must be at most 100, got {}",
                self.percent_cutoff
            )));
        }
        if !self.weight_cutoff.is_finite() || self.weight_cutoff < 0.0 {
            return Err(MatchError::Config(format!(
                "weight_cutoff must be finite and >= 0, got {}",
                self.weight_cutoff
            )));
        }
        self.weighting.build().map(drop)
    }
}
