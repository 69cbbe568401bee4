// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Frozen, normalised form of a query.
//!
//! `QueryPlan::new` deep-copies a `Query` and rewrites it into the shape the
//! matcher wants:
//!
//! - `Empty` children vanish from `Or`/`Xor`/`EliteSet`, and empty the
//!   whole `And`/`Near`/`Phrase` they sit in.
//! - Nested `And`s (and nested `Or`s) are flattened into their parent.
//! - Inside one `And`/`Or`, term leaves with the same term *and* the same query
//!   position collapse into one leaf whose wqf is the sum.
//! - Operators left with one child become that child.
//! - `Near`/`Phrase` windows are raised to at least the number of terms.
//!
//! Elite sets need collection statistics to pick their members, so they stay
//! in the plan until a match resolves them with `PlanNode::resolve`.

use super::{check_threshold, Query, QueryNode};
use crate::error::{MatchError, Result};
use crate::matcher::estimate::Estimate;
use crate::scoring::{MatchStats, TermInput, Weighting};
use crate::types::{TermPos, Wqf};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanTerm {
    pub term: String,
    pub wqf: Wqf,
    pub pos: TermPos,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlanNode {
    Empty,
    Term(PlanTerm),
    And(Vec<PlanNode>),
    Or(Vec<PlanNode>),
    Xor(Vec<PlanNode>),
    AndNot(Box<PlanNode>, Box<PlanNode>),
    Near {
        window: u32,
        ordered: bool,
        terms: Vec<PlanTerm>,
    },
    EliteSet {
        size: u32,
        children: Vec<PlanNode>,
    },
    WeightCutoff {
        threshold: f64,
        child: Box<PlanNode>,
    },
}

#[derive(Clone, Copy)]
enum Kind {
    And,
    Or,
    Xor,
}

/// What a match knows when it resolves and bounds a plan.
#[derive(Clone, Copy)]
pub(crate) struct PlanContext<'a> {
    pub stats: &'a MatchStats,
    pub weighting: &'a dyn Weighting,
    pub query_length: u32,
}

impl PlanContext<'_> {
    /// Upper bound of one leaf's contribution. Terms no document contains contribute nothing.
    pub fn term_max(&self, term: &PlanTerm) -> f64 {
        let stats = self.stats.term(&term.term);
        if stats.term_freq == 0 {
            return 0.0;
        }
        self.weighting.max_score(&TermInput {
            collection: &self.stats.collection,
            stats: &stats,
            wqf: term.wqf,
            query_length: self.query_length,
        })
    }

    fn doc_count(&self) -> f64 {
        f64::from(self.stats.collection.doc_count)
    }
}

// =============================================================================
// LOWERING
// =============================================================================

fn lower(query: &Query) -> Result<PlanNode> {
    let node = match query.node() {
        QueryNode::Empty => PlanNode::Empty,
        QueryNode::Term { term, wqf, pos } => PlanNode::Term(PlanTerm {
            term: term.clone(),
            wqf: *wqf,
            pos: *pos,
        }),
        QueryNode::And { children } => {
            let kids = lower_all(children)?;
            if kids.iter().any(PlanNode::is_empty) {
                PlanNode::Empty
            } else {
                finish(Kind::And, collapse(flatten(Kind::And, kids)))
            }
        }
        QueryNode::Or { children } => {
            let kids = non_empty(lower_all(children)?);
            finish(Kind::Or, collapse(flatten(Kind::Or, kids)))
        }
        QueryNode::Xor { children } => finish(Kind::Xor, non_empty(lower_all(children)?)),
        QueryNode::AndNot { left, right } => match (lower(left)?, lower(right)?) {
            (PlanNode::Empty, _) => PlanNode::Empty,
            (left, PlanNode::Empty) => left,
            (left, right) => PlanNode::AndNot(Box::new(left), Box::new(right)),
        },
        QueryNode::Near { window, children } => positional(*window, children, false)?,
        QueryNode::Phrase { window, children } => positional(*window, children, true)?,
        QueryNode::EliteSet { size, children } => {
            if *size == 0 {
                return Err(MatchError::invalid("elite set size must be at least 1"));
            }
            let mut kids = non_empty(lower_all(children)?);
            match kids.len() {
                0 => PlanNode::Empty,
                1 => kids.remove(0),
                _ => PlanNode::EliteSet {
                    size: *size,
                    children: kids,
                },
            }
        }
        QueryNode::WeightCutoff { threshold, child } => {
            check_threshold(*threshold)?;
            match lower(child)? {
                PlanNode::Empty => PlanNode::Empty,
                child => PlanNode::WeightCutoff {
                    threshold: *threshold,
                    child: Box::new(child),
                },
            }
        }
    };
    Ok(node)
}

fn lower_all(children: &[Query]) -> Result<Vec<PlanNode>> {
    children.iter().map(lower).collect()
}

fn non_empty(kids: Vec<PlanNode>) -> Vec<PlanNode> {
    kids.into_iter().filter(|k| !k.is_empty()).collect()
}

fn flatten(kind: Kind, kids: Vec<PlanNode>) -> Vec<PlanNode> {
    let mut out = Vec::with_capacity(kids.len());
    for kid in kids {
        match (kind, kid) {
            (Kind::And, PlanNode::And(inner)) | (Kind::Or, PlanNode::Or(inner)) => {
                out.extend(inner)
            }
            (_, kid) => out.push(kid),
        }
    }
    out
}

/// Merge term leaves sharing term and position; the first one keeps its place.
fn collapse(kids: Vec<PlanNode>) -> Vec<PlanNode> {
    let mut out: Vec<PlanNode> = Vec::with_capacity(kids.len());
    for kid in kids {
        if let PlanNode::Term(leaf) = &kid {
            let twin = out.iter_mut().find_map(|n| match n {
                PlanNode::Term(t) if t.term == leaf.term && t.pos == leaf.pos => Some(t),
                _ => None,
            });
            if let Some(twin) = twin {
                twin.wqf = twin.wqf.saturating_add(leaf.wqf);
                continue;
            }
        }
        out.push(kid);
    }
    out
}

fn finish(kind: Kind, mut kids: Vec<PlanNode>) -> PlanNode {
    match kids.len() {
        0 => PlanNode::Empty,
        1 => kids.remove(0),
        _ => match kind {
            Kind::And => PlanNode::And(kids),
            Kind::Or => PlanNode::Or(kids),
            Kind::Xor => PlanNode::Xor(kids),
        },
    }
}

fn positional(window: u32, children: &[Query], ordered: bool) -> Result<PlanNode> {
    let mut terms = Vec::with_capacity(children.len());
    for child in children {
        match child.node() {
            QueryNode::Term { term, wqf, pos } => terms.push(PlanTerm {
                term: term.clone(),
                wqf: *wqf,
                pos: *pos,
            }),
            _ => {
                return Err(MatchError::invalid(format!(
                    "{} operands must be terms, got {}",
                    if ordered { "phrase" } else { "near" },
                    child
                )))
            }
        }
    }
    Ok(match terms.len() {
        0 => PlanNode::Empty,
        1 => PlanNode::Term(terms.remove(0)),
        n => PlanNode::Near {
            window: window.max(n as u32),
            ordered,
            terms,
        },
    })
}

// =============================================================================
// RESOLUTION AND BOUNDS
// =============================================================================

impl PlanNode {
    pub fn is_empty(&self) -> bool {
        matches!(self, PlanNode::Empty)
    }

    /// Replace every elite set by an `Or` of its chosen members.
    ///
    /// Members are ranked by their maximum possible weight; operands that can
    /// match nothing are never chosen, and ties keep query order.
    pub fn resolve(&self, ctx: &PlanContext<'_>) -> PlanNode {
        match self {
            PlanNode::Empty | PlanNode::Term(_) | PlanNode::Near { .. } => self.clone(),
            PlanNode::And(kids) => PlanNode::And(kids.iter().map(|k| k.resolve(ctx)).collect()),
            PlanNode::Or(kids) => PlanNode::Or(kids.iter().map(|k| k.resolve(ctx)).collect()),
            PlanNode::Xor(kids) => PlanNode::Xor(kids.iter().map(|k| k.resolve(ctx)).collect()),
            PlanNode::AndNot(l, r) => {
                PlanNode::AndNot(Box::new(l.resolve(ctx)), Box::new(r.resolve(ctx)))
            }
            PlanNode::WeightCutoff { threshold, child } => PlanNode::WeightCutoff {
                threshold: *threshold,
                child: Box::new(child.resolve(ctx)),
            },
            PlanNode::EliteSet { size, children } => {
                let resolved: Vec<PlanNode> = children.iter().map(|c| c.resolve(ctx)).collect();
                let mut ranked: Vec<(usize, f64)> = resolved
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.estimate(ctx).max > 0.0)
                    .map(|(i, c)| (i, c.max_weight(ctx)))
                    .collect();
                ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
                ranked.truncate(*size as usize);

                let mut chosen: Vec<usize> = ranked.into_iter().map(|(i, _)| i).collect();
                chosen.sort_unstable();
                tracing::trace!(size, chosen = ?chosen, "resolved elite set");

                let kids = resolved
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| chosen.binary_search(i).is_ok())
                    .map(|(_, c)| c)
                    .collect();
                finish(Kind::Or, kids)
            }
        }
    }

    /// Upper bound on the weight any document can get from this node.
    pub fn max_weight(&self, ctx: &PlanContext<'_>) -> f64 {
        match self {
            PlanNode::Empty => 0.0,
            PlanNode::Term(t) => ctx.term_max(t),
            PlanNode::And(kids) | PlanNode::Or(kids) | PlanNode::Xor(kids) => {
                kids.iter().map(|k| k.max_weight(ctx)).sum()
            }
            PlanNode::EliteSet { children, .. } => {
                children.iter().map(|k| k.max_weight(ctx)).sum()
            }
            PlanNode::AndNot(l, _) => l.max_weight(ctx),
            PlanNode::Near { terms, .. } => terms.iter().map(|t| ctx.term_max(t)).sum(),
            PlanNode::WeightCutoff { child, .. } => child.max_weight(ctx),
        }
    }

    /// Match-count bounds from statistics alone, before any cursor opens.
    pub fn estimate(&self, ctx: &PlanContext<'_>) -> Estimate {
        let n = ctx.doc_count();
        let term_estimate = |t: &PlanTerm| {
            let tf = f64::from(ctx.stats.term(&t.term).term_freq);
            Estimate {
                min: tf,
                est: tf,
                max: tf,
            }
        };
        match self {
            PlanNode::Empty => Estimate::default(),
            PlanNode::Term(t) => term_estimate(t),
            PlanNode::And(kids) => Estimate::and(kids.iter().map(|k| k.estimate(ctx)), n),
            PlanNode::Or(kids) | PlanNode::EliteSet { children: kids, .. } => {
                Estimate::or(kids.iter().map(|k| k.estimate(ctx)), n)
            }
            PlanNode::Xor(kids) => Estimate::xor(kids.iter().map(|k| k.estimate(ctx)), n),
            PlanNode::AndNot(l, r) => Estimate::and_not(l.estimate(ctx), r.estimate(ctx), n),
            PlanNode::Near { terms, .. } => {
                Estimate::positional(Estimate::and(terms.iter().map(term_estimate), n))
            }
            PlanNode::WeightCutoff { child, .. } => child.estimate(ctx).filtered(),
        }
    }
}

// =============================================================================
// PLAN
// =============================================================================

/// A frozen query, ready to be matched any number of times.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    root: PlanNode,
    length: u32,
    terms: Vec<String>,
    wqf: BTreeMap<String, Wqf>,
    description: String,
}

impl QueryPlan {
    pub fn new(query: &Query) -> Result<Self> {
        let root = lower(query)?;
        let mut wqf: BTreeMap<String, Wqf> = BTreeMap::new();
        query.visit_terms(&mut |term, w, _| {
            let total = wqf.entry(term.to_string()).or_insert(0);
            *total = total.saturating_add(w);
        });
        Ok(Self {
            root,
            length: query.length(),
            terms: query.terms(),
            wqf,
            description: query.to_string(),
        })
    }

    /// True when the plan can match nothing without looking at any collection.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    /// Distinct query terms, ordered by first query position.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.wqf.contains_key(term)
    }

    /// Summed wqf of every leaf of `term`, 0 if absent.
    pub fn wqf(&self, term: &str) -> Wqf {
        self.wqf.get(term).copied().unwrap_or(0)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn root(&self) -> &PlanNode {
        &self.root
    }
}
