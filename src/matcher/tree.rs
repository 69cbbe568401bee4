// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The evaluation tree: a resolved plan bound to one collection's cursors.
//!
//! Every node follows the posting-cursor protocol. It is positioned on its
//! first matching document as soon as it is built, `advance` moves strictly
//! forward, and `skip_to` never moves backward. Nodes also report
//!
//! - `weight()`: the summed contribution of the leaves matching the current document,
//! - `max_weight()`: an upper bound on the weight of any document still ahead,
//!   shrinking as children run dry,
//! - `remaining(n)`: bounds on the number of documents still ahead, counting the
//!   current one.
//!
//! # Combinators
//!
//! ```text
//!   And      leapfrog: skip the lagging child to the leader until all agree
//!   Or       smallest current id among live children
//!   Xor      smallest id held by an odd number of children
//!   AndNot   left child, skipping ids the right child also holds
//!   Near     And of term leaves, filtered on positions
//!   Cutoff   child, skipping documents below a weight threshold
//! ```

use super::estimate::Estimate;
use super::positional::{near_match, phrase_match};
use crate::collection::Collection;
use crate::postings::PostingCursor;
use crate::query::{PlanContext, PlanNode, PlanTerm};
use crate::scoring::{CollectionStats, TermInput, TermStats, Weighting};
use crate::types::{DocId, TermPos, Wqf};
use crate::verify::contracts;
use std::sync::Arc;

// =============================================================================
// LEAF
// =============================================================================

pub(crate) struct TermLeaf {
    cursor: Box<dyn PostingCursor>,
    weighting: Arc<dyn Weighting>,
    collection: CollectionStats,
    stats: TermStats,
    wqf: Wqf,
    query_length: u32,
    max: f64,
}

impl TermLeaf {
    fn docid(&self) -> Option<DocId> {
        self.cursor.docid()
    }

    fn advance(&mut self) {
        if let Some(before) = self.docid() {
            self.cursor.advance();
            contracts::check_advanced(before, self.docid());
        }
    }

    fn skip_to(&mut self, target: DocId) {
        let before = self.docid();
        self.cursor.skip_to(target);
        contracts::check_skipped(before, target, self.docid());
    }

    fn weight(&self) -> f64 {
        let Some(posting) = self.cursor.current() else {
            return 0.0;
        };
        let input = TermInput {
            collection: &self.collection,
            stats: &self.stats,
            wqf: self.wqf,
            query_length: self.query_length,
        };
        self.weighting
            .score(&input, posting.wdf, self.cursor.doc_length())
    }
}

// =============================================================================
// INNER NODES
// =============================================================================

pub(crate) struct AndNode {
    children: Vec<MatchTree>,
    current: Option<DocId>,
}

impl AndNode {
    fn new(children: Vec<MatchTree>) -> Self {
        let mut node = Self {
            children,
            current: None,
        };
        node.align();
        node
    }

    /// Skip the lowest child to the highest current id until every child agrees.
    fn align(&mut self) {
        loop {
            let mut lowest: Option<(usize, DocId)> = None;
            let mut highest: Option<DocId> = None;
            for (i, child) in self.children.iter().enumerate() {
                let Some(d) = child.docid() else {
                    self.current = None;
                    return;
                };
                if lowest.map_or(true, |(_, l)| d < l) {
                    lowest = Some((i, d));
                }
                if highest.map_or(true, |h| d > h) {
                    highest = Some(d);
                }
            }
            match (lowest, highest) {
                (Some((_, lo)), Some(hi)) if lo == hi => {
                    self.current = Some(lo);
                    return;
                }
                (Some((i, _)), Some(hi)) => self.children[i].skip_to(hi),
                _ => {
                    self.current = None;
                    return;
                }
            }
        }
    }

    fn advance(&mut self) {
        if self.current.is_some() {
            self.children[0].advance();
            self.align();
        }
    }

    fn skip_to(&mut self, target: DocId) {
        if self.current.is_some_and(|c| c < target) {
            self.children[0].skip_to(target);
            self.align();
        }
    }

    fn weight(&self) -> f64 {
        self.children.iter().map(MatchTree::weight).sum()
    }

    fn max_weight(&self) -> f64 {
        if self.current.is_none() {
            return 0.0;
        }
        self.children.iter().map(MatchTree::max_weight).sum()
    }

    fn remaining(&self, n: f64) -> Estimate {
        if self.current.is_none() {
            return Estimate::default();
        }
        Estimate::and(self.children.iter().map(|c| c.remaining(n)), n)
    }
}

pub(crate) struct OrNode {
    children: Vec<MatchTree>,
    current: Option<DocId>,
}

impl OrNode {
    fn new(children: Vec<MatchTree>) -> Self {
        let mut node = Self {
            children,
            current: None,
        };
        node.settle();
        node
    }

    fn settle(&mut self) {
        self.current = self.children.iter().filter_map(MatchTree::docid).min();
    }

    fn advance(&mut self) {
        if let Some(current) = self.current {
            for child in &mut self.children {
                if child.docid() == Some(current) {
                    child.advance();
                }
            }
            self.settle();
        }
    }

    fn skip_to(&mut self, target: DocId) {
        if self.current.is_some_and(|c| c < target) {
            for child in &mut self.children {
                if child.docid().is_some_and(|d| d < target) {
                    child.skip_to(target);
                }
            }
            self.settle();
        }
    }

    fn at_current(&self) -> impl Iterator<Item = &MatchTree> + '_ {
        let current = self.current;
        self.children
            .iter()
            .filter(move |c| current.is_some() && c.docid() == current)
    }

    fn weight(&self) -> f64 {
        self.at_current().map(MatchTree::weight).sum()
    }

    fn max_weight(&self) -> f64 {
        self.children.iter().map(MatchTree::max_weight).sum()
    }

    fn remaining(&self, n: f64) -> Estimate {
        Estimate::or(self.children.iter().map(|c| c.remaining(n)), n)
    }
}

pub(crate) struct XorNode {
    children: Vec<MatchTree>,
    current: Option<DocId>,
}

impl XorNode {
    fn new(children: Vec<MatchTree>) -> Self {
        let mut node = Self {
            children,
            current: None,
        };
        node.settle();
        node
    }

    /// Move to the smallest id held by an odd number of children.
    fn settle(&mut self) {
        loop {
            let Some(min) = self.children.iter().filter_map(MatchTree::docid).min() else {
                self.current = None;
                return;
            };
            let holders = self
                .children
                .iter()
                .filter(|c| c.docid() == Some(min))
                .count();
            if holders % 2 == 1 {
                self.current = Some(min);
                return;
            }
            for child in &mut self.children {
                if child.docid() == Some(min) {
                    child.advance();
                }
            }
        }
    }

    fn advance(&mut self) {
        if let Some(current) = self.current {
            for child in &mut self.children {
                if child.docid() == Some(current) {
                    child.advance();
                }
            }
            self.settle();
        }
    }

    fn skip_to(&mut self, target: DocId) {
        if self.current.is_some_and(|c| c < target) {
            for child in &mut self.children {
                if child.docid().is_some_and(|d| d < target) {
                    child.skip_to(target);
                }
            }
            self.settle();
        }
    }

    fn weight(&self) -> f64 {
        self.children
            .iter()
            .filter(|c| self.current.is_some() && c.docid() == self.current)
            .map(MatchTree::weight)
            .sum()
    }

    fn max_weight(&self) -> f64 {
        self.children.iter().map(MatchTree::max_weight).sum()
    }

    fn remaining(&self, n: f64) -> Estimate {
        Estimate::xor(self.children.iter().map(|c| c.remaining(n)), n)
    }
}

pub(crate) struct AndNotNode {
    left: Box<MatchTree>,
    right: Box<MatchTree>,
    current: Option<DocId>,
}

impl AndNotNode {
    fn new(left: MatchTree, right: MatchTree) -> Self {
        let mut node = Self {
            left: Box::new(left),
            right: Box::new(right),
            current: None,
        };
        node.settle();
        node
    }

    fn settle(&mut self) {
        while let Some(d) = self.left.docid() {
            if self.right.docid().is_some_and(|r| r < d) {
                self.right.skip_to(d);
            }
            if self.right.docid() == Some(d) {
                self.left.advance();
                continue;
            }
            self.current = Some(d);
            return;
        }
        self.current = None;
    }

    fn advance(&mut self) {
        if self.current.is_some() {
            self.left.advance();
            self.settle();
        }
    }

    fn skip_to(&mut self, target: DocId) {
        if self.current.is_some_and(|c| c < target) {
            self.left.skip_to(target);
            self.settle();
        }
    }

    fn remaining(&self, n: f64) -> Estimate {
        if self.current.is_none() {
            return Estimate::default();
        }
        Estimate::and_not(self.left.remaining(n), self.right.remaining(n), n)
    }
}

pub(crate) struct NearNode {
    terms: AndNode,
    window: u32,
    ordered: bool,
    current: Option<DocId>,
}

impl NearNode {
    fn new(terms: Vec<MatchTree>, window: u32, ordered: bool) -> Self {
        let mut node = Self {
            terms: AndNode::new(terms),
            window,
            ordered,
            current: None,
        };
        node.settle();
        node
    }

    fn positions_match(&self) -> bool {
        let lists: Vec<&[TermPos]> = self.terms.children.iter().map(MatchTree::positions).collect();
        if self.ordered {
            phrase_match(&lists, self.window)
        } else {
            near_match(&lists, self.window)
        }
    }

    fn settle(&mut self) {
        while let Some(d) = self.terms.current {
            if self.positions_match() {
                self.current = Some(d);
                return;
            }
            self.terms.advance();
        }
        self.current = None;
    }

    fn advance(&mut self) {
        if self.current.is_some() {
            self.terms.advance();
            self.settle();
        }
    }

    fn skip_to(&mut self, target: DocId) {
        if self.current.is_some_and(|c| c < target) {
            self.terms.skip_to(target);
            self.settle();
        }
    }

    fn remaining(&self, n: f64) -> Estimate {
        if self.current.is_none() {
            return Estimate::default();
        }
        Estimate::positional(self.terms.remaining(n))
    }
}

pub(crate) struct CutoffNode {
    child: Box<MatchTree>,
    threshold: f64,
    current: Option<DocId>,
}

impl CutoffNode {
    fn new(child: MatchTree, threshold: f64) -> Self {
        let mut node = Self {
            child: Box::new(child),
            threshold,
            current: None,
        };
        node.settle();
        node
    }

    fn settle(&mut self) {
        while let Some(d) = self.child.docid() {
            if self.child.weight() >= self.threshold {
                self.current = Some(d);
                return;
            }
            self.child.advance();
        }
        self.current = None;
    }

    fn advance(&mut self) {
        if self.current.is_some() {
            self.child.advance();
            self.settle();
        }
    }

    fn skip_to(&mut self, target: DocId) {
        if self.current.is_some_and(|c| c < target) {
            self.child.skip_to(target);
            self.settle();
        }
    }
}

// =============================================================================
// TREE
// =============================================================================

pub(crate) enum MatchTree {
    Empty,
    Term(TermLeaf),
    And(AndNode),
    Or(OrNode),
    Xor(XorNode),
    AndNot(AndNotNode),
    Near(NearNode),
    Cutoff(CutoffNode),
}

impl MatchTree {
    pub fn docid(&self) -> Option<DocId> {
        match self {
            MatchTree::Empty => None,
            MatchTree::Term(t) => t.docid(),
            MatchTree::And(n) => n.current,
            MatchTree::Or(n) => n.current,
            MatchTree::Xor(n) => n.current,
            MatchTree::AndNot(n) => n.current,
            MatchTree::Near(n) => n.current,
            MatchTree::Cutoff(n) => n.current,
        }
    }

    pub fn advance(&mut self) {
        let before = self.docid();
        match self {
            MatchTree::Empty => {}
            MatchTree::Term(t) => t.advance(),
            MatchTree::And(n) => n.advance(),
            MatchTree::Or(n) => n.advance(),
            MatchTree::Xor(n) => n.advance(),
            MatchTree::AndNot(n) => n.advance(),
            MatchTree::Near(n) => n.advance(),
            MatchTree::Cutoff(n) => n.advance(),
        }
        if let Some(before) = before {
            contracts::check_advanced(before, self.docid());
        }
    }

    pub fn skip_to(&mut self, target: DocId) {
        let before = self.docid();
        match self {
            MatchTree::Empty => {}
            MatchTree::Term(t) => t.skip_to(target),
            MatchTree::And(n) => n.skip_to(target),
            MatchTree::Or(n) => n.skip_to(target),
            MatchTree::Xor(n) => n.skip_to(target),
            MatchTree::AndNot(n) => n.skip_to(target),
            MatchTree::Near(n) => n.skip_to(target),
            MatchTree::Cutoff(n) => n.skip_to(target),
        }
        contracts::check_skipped(before, target, self.docid());
    }

    /// Weight of the current document, 0 when exhausted.
    pub fn weight(&self) -> f64 {
        match self {
            MatchTree::Empty => 0.0,
            MatchTree::Term(t) => t.weight(),
            MatchTree::And(n) => n.weight(),
            MatchTree::Or(n) => n.weight(),
            MatchTree::Xor(n) => n.weight(),
            MatchTree::AndNot(n) => n.left.weight(),
            MatchTree::Near(n) => n.terms.weight(),
            MatchTree::Cutoff(n) => n.child.weight(),
        }
    }

    pub fn max_weight(&self) -> f64 {
        match self {
            MatchTree::Empty => 0.0,
            MatchTree::Term(t) => {
                if t.docid().is_some() {
                    t.max
                } else {
                    0.0
                }
            }
            MatchTree::And(n) => n.max_weight(),
            MatchTree::Or(n) => n.max_weight(),
            MatchTree::Xor(n) => n.max_weight(),
            MatchTree::AndNot(n) => n.left.max_weight(),
            MatchTree::Near(n) => {
                if n.current.is_some() {
                    n.terms.max_weight()
                } else {
                    0.0
                }
            }
            MatchTree::Cutoff(n) => n.child.max_weight(),
        }
    }

    /// Bounds on documents still to come, counting the current one. `n` is the
    /// size of the collection this tree runs over.
    pub fn remaining(&self, n: f64) -> Estimate {
        match self {
            MatchTree::Empty => Estimate::default(),
            MatchTree::Term(t) => Estimate::from_bounds(t.cursor.remaining()),
            MatchTree::And(node) => node.remaining(n),
            MatchTree::Or(node) => node.remaining(n),
            MatchTree::Xor(node) => node.remaining(n),
            MatchTree::AndNot(node) => node.remaining(n),
            MatchTree::Near(node) => node.remaining(n),
            MatchTree::Cutoff(node) => node.child.remaining(n).filtered(),
        }
    }

    /// Length of the current document, 0 when exhausted.
    pub fn doc_length(&self) -> u32 {
        match self {
            MatchTree::Empty => 0,
            MatchTree::Term(t) => t.cursor.doc_length(),
            MatchTree::And(n) => n.children.first().map_or(0, MatchTree::doc_length),
            MatchTree::Or(n) => n.at_current().next().map_or(0, MatchTree::doc_length),
            MatchTree::Xor(n) => n
                .children
                .iter()
                .find(|c| n.current.is_some() && c.docid() == n.current)
                .map_or(0, MatchTree::doc_length),
            MatchTree::AndNot(n) => n.left.doc_length(),
            MatchTree::Near(n) => n.terms.children.first().map_or(0, MatchTree::doc_length),
            MatchTree::Cutoff(n) => n.child.doc_length(),
        }
    }

    /// Positions of the current document. Only leaves have any.
    fn positions(&self) -> &[TermPos] {
        match self {
            MatchTree::Term(t) => t.cursor.positions(),
            _ => &[],
        }
    }
}

// =============================================================================
// CONSTRUCTION
// =============================================================================

/// Binds a resolved plan to one collection.
pub(crate) struct TreeBuilder<'a> {
    pub collection: &'a dyn Collection,
    pub ctx: PlanContext<'a>,
    pub weighting: &'a Arc<dyn Weighting>,
}

impl TreeBuilder<'_> {
    pub fn build(&self, node: &PlanNode) -> MatchTree {
        match node {
            PlanNode::Empty => MatchTree::Empty,
            PlanNode::Term(t) => MatchTree::Term(self.leaf(t)),
            PlanNode::And(kids) => MatchTree::And(AndNode::new(self.build_all(kids))),
            PlanNode::Or(kids) | PlanNode::EliteSet { children: kids, .. } => {
                MatchTree::Or(OrNode::new(self.build_all(kids)))
            }
            PlanNode::Xor(kids) => MatchTree::Xor(XorNode::new(self.build_all(kids))),
            PlanNode::AndNot(l, r) => MatchTree::AndNot(AndNotNode::new(self.build(l), self.build(r))),
            PlanNode::Near {
                window,
                ordered,
                terms,
            } => {
                let leaves = terms.iter().map(|t| MatchTree::Term(self.leaf(t))).collect();
                MatchTree::Near(NearNode::new(leaves, *window, *ordered))
            }
            PlanNode::WeightCutoff { threshold, child } => {
                MatchTree::Cutoff(CutoffNode::new(self.build(child), *threshold))
            }
        }
    }

    fn build_all(&self, kids: &[PlanNode]) -> Vec<MatchTree> {
        kids.iter().map(|k| self.build(k)).collect()
    }

    fn leaf(&self, term: &PlanTerm) -> TermLeaf {
        TermLeaf {
            cursor: self.collection.postings(&term.term),
            weighting: Arc::clone(self.weighting),
            collection: self.ctx.stats.collection,
            stats: self.ctx.stats.term(&term.term),
            wqf: term.wqf,
            query_length: self.ctx.query_length,
            max: self.ctx.term_max(term),
        }
    }
}
