// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking: how matching documents get their numbers.
//!
//! Schemes (`Bm25Weight`, `TradWeight`, `BoolWeight`) are pure functions of
//! merged statistics. Ranking (`ranking`) decides the order the collector keeps.

mod bm25;
mod boolean;
mod core;
pub mod ranking;
pub mod stats;
mod trad;

pub use self::core::*;
pub use bm25::*;
pub use boolean::BoolWeight;
pub use stats::{CollectionStats, MatchStats, TermStats};
pub use trad::*;
