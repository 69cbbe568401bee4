// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query trees.
//!
//! A `Query` is an immutable-looking value: leaves are terms (with a query
//! frequency and a query position), inner nodes are operators over ordered
//! children. Mutators (`set_window`, `set_length`, ...) exist for building, but a
//! query handed to `Enquire::set_query` is frozen into a `QueryPlan` right away,
//! so changing the caller's copy later has no effect on matching.
//!
//! # Operators
//!
//! | Operator       | Matches                                                   |
//! |----------------|-----------------------------------------------------------|
//! | `And`          | documents matching every child                            |
//! | `Or`           | documents matching any child                              |
//! | `AndNot`       | documents matching the left child but not the right       |
//! | `Xor`          | documents matching an odd number of children              |
//! | `Near`         | all terms within a window, any order                      |
//! | `Phrase`       | all terms within a window, in query order                 |
//! | `EliteSet`     | `Or` of the `size` most valuable children                 |
//! | `WeightCutoff` | documents whose weight under the child reaches a threshold|
//!
//! `Empty` matches nothing.

mod plan;

pub use plan::QueryPlan;
pub(crate) use plan::{PlanContext, PlanNode, PlanTerm};

use crate::error::{MatchError, Result};
use crate::types::{TermPos, Wqf};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Elite set size used when none is given.
pub const DEFAULT_ELITE_SET_SIZE: u32 = 10;

/// Operators that take a list of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    And,
    Or,
    Xor,
    Near,
    Phrase,
    EliteSet,
}

/// One node of a query tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum QueryNode {
    Empty,
    Term {
        term: String,
        #[serde(default = "default_wqf")]
        wqf: Wqf,
        #[serde(default)]
        pos: TermPos,
    },
    And {
        children: Vec<Query>,
    },
    Or {
        children: Vec<Query>,
    },
    AndNot {
        left: Box<Query>,
        right: Box<Query>,
    },
    Xor {
        children: Vec<Query>,
    },
    Near {
        /// 0 means "as many positions as there are terms".
        #[serde(default)]
        window: u32,
        children: Vec<Query>,
    },
    Phrase {
        #[serde(default)]
        window: u32,
        children: Vec<Query>,
    },
    EliteSet {
        #[serde(default = "default_elite_size")]
        size: u32,
        children: Vec<Query>,
    },
    WeightCutoff {
        threshold: f64,
        child: Box<Query>,
    },
}

fn default_wqf() -> Wqf {
    1
}

fn default_elite_size() -> u32 {
    DEFAULT_ELITE_SET_SIZE
}

/// A query tree with an optional explicit query length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    #[serde(flatten)]
    node: QueryNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    length: Option<u32>,
}

impl Default for Query {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<QueryNode> for Query {
    fn from(node: QueryNode) -> Self {
        Self { node, length: None }
    }
}

impl Query {
    pub fn empty() -> Self {
        QueryNode::Empty.into()
    }

    /// A single term with wqf 1 and no position.
    pub fn term(term: impl Into<String>) -> Self {
        Self::term_at(term, 1, 0)
    }

    pub fn term_at(term: impl Into<String>, wqf: Wqf, pos: TermPos) -> Self {
        QueryNode::Term {
            term: term.into(),
            wqf,
            pos,
        }
        .into()
    }

    /// Combine sub-queries under `op`.
    pub fn combine(op: Op, children: impl IntoIterator<Item = Query>) -> Self {
        let children: Vec<Query> = children.into_iter().collect();
        match op {
            Op::And => QueryNode::And { children },
            Op::Or => QueryNode::Or { children },
            Op::Xor => QueryNode::Xor { children },
            Op::Near => QueryNode::Near {
                window: 0,
                children,
            },
            Op::Phrase => QueryNode::Phrase {
                window: 0,
                children,
            },
            Op::EliteSet => QueryNode::EliteSet {
                size: DEFAULT_ELITE_SET_SIZE,
                children,
            },
        }
        .into()
    }

    /// Combine plain terms under `op`, giving them query positions 1, 2, 3, ...
    pub fn from_terms<I, S>(op: Op, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let leaves = (1..).zip(terms).map(|(pos, t)| Query::term_at(t, 1, pos));
        Self::combine(op, leaves)
    }

    pub fn and(children: impl IntoIterator<Item = Query>) -> Self {
        Self::combine(Op::And, children)
    }

    pub fn or(children: impl IntoIterator<Item = Query>) -> Self {
        Self::combine(Op::Or, children)
    }

    pub fn and_not(left: Query, right: Query) -> Self {
        QueryNode::AndNot {
            left: Box::new(left),
            right: Box::new(right),
        }
        .into()
    }

    pub fn weight_cutoff(child: Query, threshold: f64) -> Self {
        QueryNode::WeightCutoff {
            threshold,
            child: Box::new(child),
        }
        .into()
    }

    pub fn node(&self) -> &QueryNode {
        &self.node
    }

    /// True only for the `Empty` query.
    pub fn is_empty(&self) -> bool {
        matches!(self.node, QueryNode::Empty)
    }

    /// Window of a `Near` or `Phrase` query.
    pub fn set_window(&mut self, window: u32) -> Result<()> {
        match &mut self.node {
            QueryNode::Near { window: w, .. } | QueryNode::Phrase { window: w, .. } => {
                *w = window;
                Ok(())
            }
            _ => Err(MatchError::invalid(
                "window can only be set on a near or phrase query",
            )),
        }
    }

    pub fn set_elite_set_size(&mut self, size: u32) -> Result<()> {
        if size == 0 {
            return Err(MatchError::invalid("elite set size must be at least 1"));
        }
        match &mut self.node {
            QueryNode::EliteSet { size: s, .. } => {
                *s = size;
                Ok(())
            }
            _ => Err(MatchError::invalid(
                "elite set size can only be set on an elite set query",
            )),
        }
    }

    /// Threshold of a `WeightCutoff` query.
    pub fn set_cutoff(&mut self, threshold: f64) -> Result<()> {
        check_threshold(threshold)?;
        match &mut self.node {
            QueryNode::WeightCutoff { threshold: t, .. } => {
                *t = threshold;
                Ok(())
            }
            _ => Err(MatchError::invalid(
                "cutoff can only be set on a weight cutoff query",
            )),
        }
    }

    /// Override the query length used by weighting.
    pub fn set_length(&mut self, length: u32) {
        self.length = Some(length);
    }

    /// Explicit length if one was set, otherwise the sum of every leaf's wqf.
    pub fn length(&self) -> u32 {
        self.length.unwrap_or_else(|| {
            let mut total = 0u32;
            self.visit_terms(&mut |_, wqf, _| total = total.saturating_add(wqf));
            total
        })
    }

    /// Distinct terms, ordered by first query position then first appearance.
    pub fn terms(&self) -> Vec<String> {
        let mut leaves: Vec<(TermPos, usize, &str)> = Vec::new();
        self.visit_terms(&mut |term, _, pos| {
            let seq = leaves.len();
            leaves.push((pos, seq, term));
        });
        leaves.sort_unstable_by_key(|&(pos, seq, _)| (pos, seq));

        let mut seen = std::collections::HashSet::new();
        leaves
            .into_iter()
            .filter(|&(_, _, term)| seen.insert(term))
            .map(|(_, _, term)| term.to_string())
            .collect()
    }

    /// Call `f(term, wqf, pos)` for every leaf, left to right.
    pub(crate) fn visit_terms<'a>(&'a self, f: &mut impl FnMut(&'a str, Wqf, TermPos)) {
        match &self.node {
            QueryNode::Empty => {}
            QueryNode::Term { term, wqf, pos } => f(term, *wqf, *pos),
            QueryNode::And { children }
            | QueryNode::Or { children }
            | QueryNode::Xor { children }
            | QueryNode::Near { children, .. }
            | QueryNode::Phrase { children, .. }
            | QueryNode::EliteSet { children, .. } => {
                for child in children {
                    child.visit_terms(f);
                }
            }
            QueryNode::AndNot { left, right } => {
                left.visit_terms(f);
                right.visit_terms(f);
            }
            QueryNode::WeightCutoff { child, .. } => child.visit_terms(f),
        }
    }
}

pub(crate) fn check_threshold(threshold: f64) -> Result<()> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(())
    } else {
        Err(MatchError::invalid(format!(
            "weight cutoff must be finite and >= 0, got {}",
            threshold
        )))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list(f: &mut fmt::Formatter<'_>, sep: &str, children: &[Query]) -> fmt::Result {
            write!(f, "(")?;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", sep)?;
                }
                write!(f, "{}", child)?;
            }
            write!(f, ")")
        }

        match &self.node {
            QueryNode::Empty => write!(f, "<empty>"),
            QueryNode::Term { term, wqf, pos } => {
                write!(f, "{}", term)?;
                if *pos > 0 {
                    write!(f, "@{}", pos)?;
                }
                if *wqf != 1 {
                    write!(f, "#{}", wqf)?;
                }
                Ok(())
            }
            QueryNode::And { children } => list(f, "AND", children),
            QueryNode::Or { children } => list(f, "OR", children),
            QueryNode::Xor { children } => list(f, "XOR", children),
            QueryNode::AndNot { left, right } => write!(f, "({} AND_NOT {})", left, right),
            QueryNode::Near { window, children } => list(f, &format!("NEAR {}", window), children),
            QueryNode::Phrase { window, children } => {
                list(f, &format!("PHRASE {}", window), children)
            }
            QueryNode::EliteSet { size, children } => {
                list(f, &format!("ELITE_SET {}", size), children)
            }
            QueryNode::WeightCutoff { threshold, child } => {
                write!(f, "({} WEIGHT_CUTOFF {})", child, threshold)
            }
        }
    }
}
