// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `Enquire`: a query session against one database.
//!
//! An enquire binds a frozen query plan, a weighting scheme and ranking
//! options to a `Database` handle. Each `get_mset` or `get_eset` call takes a
//! fresh snapshot of the database, so collections added to the handle between
//! calls are picked up by the next call and never by one already running.
//!
//! # Example
//!
//! ```
//! use quarry::{CollectionBuilder, Database, Enquire, IndexedDocument, Query};
//!
//! let mut builder = CollectionBuilder::new();
//! builder.add_document(IndexedDocument::from_text("first", "the quick brown fox"));
//! builder.add_document(IndexedDocument::from_text("second", "the lazy dog"));
//! let db = Database::from_collection(builder.build().unwrap());
//!
//! let mut enquire = Enquire::new(&db);
//! enquire.set_query(&Query::term("fox")).unwrap();
//! let mset = enquire.get_mset(0, 10).unwrap();
//! assert_eq!(mset.docids(), vec![1]);
//! ```

use super::{run_match, MSet, MatchRequest};
use crate::collection::Database;
use crate::config::EngineConfig;
use crate::error::{MatchError, Result};
use crate::expand::{expand, ESet, ExpandOptions, RSet};
use crate::query::{check_threshold, Query, QueryPlan};
use crate::scoring::{Bm25Weight, Weighting};
use crate::types::DocId;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Enquire {
    database: Database,
    plan: Option<Arc<QueryPlan>>,
    weighting: Arc<dyn Weighting>,
    sort_forward: bool,
    percent_cutoff: u8,
    weight_cutoff: f64,
    check_at_least: usize,
    include_query_terms: bool,
}

impl Enquire {
    /// Start a session on `database` with BM25 weighting and no query.
    pub fn new(database: &Database) -> Self {
        Self {
            database: database.clone(),
            plan: None,
            weighting: Arc::new(Bm25Weight::default()),
            sort_forward: true,
            percent_cutoff: 0,
            weight_cutoff: 0.0,
            check_at_least: 0,
            include_query_terms: false,
        }
    }

    /// Bind a query. The query is copied; changing it afterwards has no effect here.
    pub fn set_query(&mut self, query: &Query) -> Result<()> {
        let plan = QueryPlan::new(query)?;
        tracing::debug!(query = plan.description(), "query bound");
        self.plan = Some(Arc::new(plan));
        Ok(())
    }

    pub fn query_plan(&self) -> Option<&QueryPlan> {
        self.plan.as_deref()
    }

    pub fn set_weighting_scheme(&mut self, weighting: impl Weighting + 'static) {
        self.weighting = Arc::new(weighting);
    }

    pub fn weighting_scheme(&self) -> &dyn Weighting {
        self.weighting.as_ref()
    }

    /// Direction of the document id part of the ranking order.
    pub fn set_sort_forward(&mut self, forward: bool) {
        self.sort_forward = forward;
    }

    /// Drop results below `percent` percent or below `weight`. Zero disables either cutoff.
    pub fn set_cutoff(&mut self, percent: u8, weight: f64) -> Result<()> {
        if percent > 100 {
            return Err(MatchError::invalid(format!(
                "percent cutoff {} is above 100",
                percent
            )));
        }
        check_threshold(weight)?;
        self.percent_cutoff = percent;
        self.weight_cutoff = weight;
        Ok(())
    }

    /// Replace scheme and options with the ones in `config`.
    pub fn apply_config(&mut self, config: &EngineConfig) -> Result<()> {
        config.validate()?;
        self.weighting = config.weighting.build()?;
        self.sort_forward = config.sort_forward;
        self.set_cutoff(config.percent_cutoff, config.weight_cutoff)?;
        self.check_at_least = config.check_at_least as usize;
        self.include_query_terms = config.expand.include_query_terms;
        Ok(())
    }

    /// Ranked results `first .. first + maxitems`.
    pub fn get_mset(&self, first: usize, maxitems: usize) -> Result<MSet> {
        self.get_mset_with(first, maxitems, self.check_at_least, None)
    }

    /// Like `get_mset`, examining at least `check_at_least` documents and
    /// weighting terms with relevance information from `rset`.
    pub fn get_mset_with(
        &self,
        first: usize,
        maxitems: usize,
        check_at_least: usize,
        rset: Option<&RSet>,
    ) -> Result<MSet> {
        let snapshot = self.database.snapshot();
        let span = tracing::debug_span!(
            "get_mset",
            first,
            maxitems,
            check_at_least,
            collections = snapshot.len()
        );
        let _guard = span.enter();

        let Some(plan) = self.plan.as_deref() else {
            tracing::debug!("no query bound");
            return Ok(MSet::default());
        };
        run_match(&MatchRequest {
            snapshot: &snapshot,
            plan,
            weighting: &self.weighting,
            first,
            maxitems,
            check_at_least,
            forward: self.sort_forward,
            percent_cutoff: self.percent_cutoff,
            weight_cutoff: self.weight_cutoff,
            rset,
        })
    }

    /// Up to `maxitems` terms suggested by the documents in `rset`.
    pub fn get_eset(&self, maxitems: usize, rset: &RSet) -> Result<ESet> {
        let options = ExpandOptions {
            include_query_terms: self.include_query_terms,
            ..ExpandOptions::default()
        };
        self.get_eset_with(maxitems, rset, &options)
    }

    pub fn get_eset_with(
        &self,
        maxitems: usize,
        rset: &RSet,
        options: &ExpandOptions<'_>,
    ) -> Result<ESet> {
        let snapshot = self.database.snapshot();
        let span = tracing::debug_span!(
            "get_eset",
            maxitems,
            rset_size = rset.len(),
            collections = snapshot.len()
        );
        let _guard = span.enter();
        expand(&snapshot, rset, maxitems, options, self.plan.as_deref())
    }

    /// Query terms present in `docid`, in query order, each once.
    pub fn matching_terms(&self, docid: u32) -> Result<Vec<String>> {
        let plan = self
            .plan
            .as_deref()
            .ok_or_else(|| MatchError::invalid("no query bound"))?;
        let global = DocId::from_user(docid)?;
        let mut cursor = self.database.snapshot().termlist(global)?;

        let mut sorted: Vec<&str> = plan.terms().iter().map(String::as_str).collect();
        sorted.sort_unstable();
        let mut present = Vec::new();
        for term in sorted {
            cursor.skip_to(term);
            if cursor.term() == Some(term) {
                present.push(term);
            }
        }

        Ok(plan
            .terms()
            .iter()
            .filter(|t| present.binary_search(&t.as_str()).is_ok())
            .cloned()
            .collect())
    }
}
