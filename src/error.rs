// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error type for every fallible operation in the crate.
//!
//! Two kinds of failure matter to callers: the request itself was malformed
//! (`InvalidArgument`, `UnknownQueryTerm`, `Config`) or it named something that
//! does not exist (`DocNotFound`). The classifiers below let callers branch on
//! that without matching every variant.
//!
//! Broken internal invariants are *not* errors. They panic through
//! `verify::contracts` with a "Contract violation" message, because a match that
//! trips one has already produced garbage.

use crate::verify::InvariantError;
use thiserror::Error;

/// Everything that can go wrong when building, querying or expanding.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The caller passed something the engine cannot act on.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A document id that is unused, out of range, or otherwise absent.
    #[error("document {docid} not found")]
    DocNotFound { docid: u32 },

    /// Term statistics were requested for a term the query never mentioned.
    #[error("term '{term}' is not part of the query")]
    UnknownQueryTerm { term: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Collection data failed validation while being built or loaded.
    #[error("malformed collection data: {0}")]
    Invariant(#[from] InvariantError),
}

impl MatchError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        MatchError::InvalidArgument(msg.into())
    }

    /// True for errors caused by a malformed request.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            MatchError::InvalidArgument(_)
                | MatchError::UnknownQueryTerm { .. }
                | MatchError::Config(_)
        )
    }

    /// True when the request named a document that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MatchError::DocNotFound { .. })
    }
}

/// Crate-wide result alias.
pub type Result<T, E = MatchError> = std::result::Result<T, E>;
