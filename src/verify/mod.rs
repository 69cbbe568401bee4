// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The verification layer: type-level invariants and runtime contracts.
//!
//! Two complementary approaches to catching bugs:
//!
//! 1. **Type-level wrappers** (`ValidatedPostingList`) that reject malformed
//!    collection data once, at build time. Cursors built from them never need
//!    to re-check ordering.
//!
//! 2. **Runtime contracts** that panic when the match engine breaks one of its
//!    own promises: a cursor moving backwards, a negative weight, two
//!    sub-collections claiming the same global id. Constant-time checks run in
//!    every build; the ones that scan a whole list are debug-only.
//!
//! Use both. The wrappers catch bad input. The contracts catch bad algorithms.

mod types;
pub mod contracts;

pub use types::*;
