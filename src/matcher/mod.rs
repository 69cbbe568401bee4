// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The match pipeline.
//!
//! ```text
//!   QueryPlan ──resolve──▶ PlanNode ──per collection──▶ MatchTree ─┐
//!       │                                                          ├─▶ MergedCursor ──▶ collector ──▶ MSet
//!   MatchStats (merged over every collection, plus RSet) ──────────┘
//! ```
//!
//! 1. Merge statistics for the query terms across every collection of the
//!    snapshot, so weights never depend on how documents are split up.
//! 2. Resolve elite sets against those statistics.
//! 3. Build one evaluation tree per collection and merge them on global ids.
//! 4. Drive the merged cursor through the top-k collector.
//!
//! Matching is single-threaded and holds no locks: the snapshot pins the
//! collection list for the whole run.

mod collector;
mod enquire;
pub(crate) mod estimate;
mod mset;
mod multi;
mod positional;
mod tree;

pub use enquire::Enquire;
pub use mset::{percent, MSet, MSetItem, TermInfo};

use crate::collection::DatabaseSnapshot;
use crate::error::Result;
use crate::expand::RSet;
use crate::query::{PlanContext, QueryPlan};
use crate::scoring::ranking::RankOrder;
use crate::scoring::{MatchStats, TermInput, Weighting};
use collector::{CollectParams, ExtraWeight};
use multi::{MergedCursor, SubTree};
use std::collections::BTreeMap;
use std::sync::Arc;
use tree::TreeBuilder;

/// Everything one `get_mset` call needs.
pub(crate) struct MatchRequest<'a> {
    pub snapshot: &'a DatabaseSnapshot,
    pub plan: &'a QueryPlan,
    pub weighting: &'a Arc<dyn Weighting>,
    pub first: usize,
    pub maxitems: usize,
    pub check_at_least: usize,
    pub forward: bool,
    pub percent_cutoff: u8,
    pub weight_cutoff: f64,
    pub rset: Option<&'a RSet>,
}

pub(crate) fn run_match(req: &MatchRequest<'_>) -> Result<MSet> {
    let snapshot = req.snapshot;
    let plan = req.plan;
    let weighting = req.weighting.as_ref();

    if plan.is_empty() && plan.terms().is_empty() {
        tracing::debug!("empty query matches nothing");
        return Ok(MSet::new(
            Vec::new(),
            req.first,
            Default::default(),
            0.0,
            0.0,
            BTreeMap::new(),
            Some(snapshot.clone()),
        ));
    }

    let stats = MatchStats::gather(snapshot, plan.terms().iter().map(String::as_str), req.rset)?;
    let query_length = plan.length();

    let term_info: BTreeMap<String, TermInfo> = plan
        .terms()
        .iter()
        .map(|term| {
            let term_stats = stats.term(term);
            let term_weight = weighting.max_score(&TermInput {
                collection: &stats.collection,
                stats: &term_stats,
                wqf: plan.wqf(term),
                query_length,
            });
            let info = TermInfo {
                term_freq: term_stats.term_freq,
                term_weight,
            };
            (term.clone(), info)
        })
        .collect();

    let ctx = PlanContext {
        stats: &stats,
        weighting,
        query_length,
    };
    let root = plan.root().resolve(&ctx);

    let boolean = weighting.is_boolean();
    let max_extra = if boolean {
        0.0
    } else {
        weighting.max_extra(&stats.collection, query_length)
    };
    let max_possible = if boolean || root.is_empty() {
        0.0
    } else {
        root.max_weight(&ctx) + max_extra
    };
    let has_cutoff = req.percent_cutoff > 0 || req.weight_cutoff > 0.0;

    let finish = |items, matches, max_attained| {
        MSet::new(
            items,
            req.first,
            matches,
            max_possible,
            max_attained,
            term_info.clone(),
            Some(snapshot.clone()),
        )
    };

    if req.first.saturating_add(req.maxitems) == 0 && req.check_at_least == 0 {
        let estimate = root.estimate(&ctx);
        let estimate = if has_cutoff {
            estimate.filtered()
        } else {
            estimate
        };
        let bounds = estimate.bounds();
        tracing::debug!(?bounds, "counted without matching");
        return Ok(finish(Vec::new(), bounds, 0.0));
    }

    let subs = snapshot
        .collections()
        .iter()
        .enumerate()
        .map(|(index, collection)| {
            let builder = TreeBuilder {
                collection: collection.as_ref(),
                ctx,
                weighting: req.weighting,
            };
            SubTree {
                tree: builder.build(&root),
                index,
                doc_count: f64::from(collection.doc_count()),
            }
        })
        .collect();
    let mut cursor = MergedCursor::new(subs, snapshot.len());

    let params = CollectParams {
        first: req.first,
        maxitems: req.maxitems,
        check_at_least: req.check_at_least,
        order: RankOrder::new(boolean, req.forward),
        max_possible,
        weight_cutoff: req.weight_cutoff,
        percent_cutoff: req.percent_cutoff,
        extra: (max_extra > 0.0).then(|| ExtraWeight {
            weighting,
            collection: &stats.collection,
            query_length,
            max: max_extra,
        }),
    };
    let collected = collector::collect(&mut cursor, &params);

    tracing::debug!(
        docs_matched = collected.matches.min,
        estimated = collected.matches.est,
        upper = collected.matches.max,
        exhausted = collected.exhausted,
        max_possible,
        "match complete"
    );

    let items = collected
        .page
        .into_iter()
        .map(|c| MSetItem {
            docid: c.docid,
            weight: c.weight,
            percent: percent(c.weight, max_possible),
        })
        .collect();
    Ok(finish(items, collected.matches, collected.max_attained))
}
