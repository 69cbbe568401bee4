//! Differential testing: the match engine against brute-force oracles.
//!
//! Boolean structure is checked with `BoolWeight`, where every match weighs 0
//! and the result is simply the matching ids in ascending order. Weights are
//! checked against textbook BM25 and offer-weight formulas.

use super::oracles::{corpus_strategy, oracle_percent, term_strategy, Corpus};
use crate::common::{assert_mset_consistent, database, enquire, enquire_with, rset_of};
use proptest::prelude::*;
use quarry::{BoolWeight, Database, Op, Query};
use std::collections::{BTreeMap, BTreeSet};

fn db_of(texts: &[String]) -> Database {
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    database(&refs)
}

fn boolean_matches(db: &Database, query: &Query) -> Vec<u32> {
    enquire_with(db, query, BoolWeight)
        .get_mset(0, 1000)
        .unwrap()
        .docids()
}

fn positions(corpus_text: &str, term: &str) -> Vec<usize> {
    corpus_text
        .split(' ')
        .enumerate()
        .filter(|(_, w)| *w == term)
        .map(|(i, _)| i + 1)
        .collect()
}

// =============================================================================
// BOOLEAN STRUCTURE: engine vs set algebra
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn diff_and(texts in corpus_strategy(), a in term_strategy(), b in term_strategy()) {
        let corpus = Corpus::new(&texts);
        let expected = corpus.matching(|d| corpus.contains(d, a) && corpus.contains(d, b));
        let query = Query::and([Query::term(a), Query::term(b)]);
        prop_assert_eq!(boolean_matches(&db_of(&texts), &query), expected);
    }

    #[test]
    fn diff_or(texts in corpus_strategy(), a in term_strategy(), b in term_strategy()) {
        let corpus = Corpus::new(&texts);
        let expected = corpus.matching(|d| corpus.contains(d, a) || corpus.contains(d, b));
        let query = Query::or([Query::term(a), Query::term(b)]);
        prop_assert_eq!(boolean_matches(&db_of(&texts), &query), expected);
    }

    #[test]
    fn diff_and_not(texts in corpus_strategy(), a in term_strategy(), b in term_strategy()) {
        let corpus = Corpus::new(&texts);
        let expected = corpus.matching(|d| corpus.contains(d, a) && !corpus.contains(d, b));
        let query = Query::and_not(Query::term(a), Query::term(b));
        prop_assert_eq!(boolean_matches(&db_of(&texts), &query), expected);
    }

    #[test]
    fn diff_xor(
        texts in corpus_strategy(),
        a in term_strategy(),
        b in term_strategy(),
        c in term_strategy(),
    ) {
        prop_assume!(a != b && b != c && a != c);
        let corpus = Corpus::new(&texts);
        let expected = corpus.matching(|d| {
            let hits = [a, b, c].iter().filter(|t| corpus.contains(d, t)).count();
            hits % 2 == 1
        });
        let query = Query::from_terms(Op::Xor, [a, b, c]);
        prop_assert_eq!(boolean_matches(&db_of(&texts), &query), expected);
    }

    #[test]
    fn diff_phrase(
        texts in corpus_strategy(),
        a in term_strategy(),
        b in term_strategy(),
        window in 2u32..5,
    ) {
        prop_assume!(a != b);
        let expected: Vec<u32> = (1u32..)
            .zip(&texts)
            .filter(|(_, text)| {
                let (pa, pb) = (positions(text, a), positions(text, b));
                pa.iter().any(|&x| pb.iter().any(|&y| y > x && y - x < window as usize))
            })
            .map(|(d, _)| d)
            .collect();
        let mut query = Query::from_terms(Op::Phrase, [a, b]);
        query.set_window(window).unwrap();
        prop_assert_eq!(boolean_matches(&db_of(&texts), &query), expected);
    }

    #[test]
    fn diff_near(
        texts in corpus_strategy(),
        a in term_strategy(),
        b in term_strategy(),
        window in 2u32..5,
    ) {
        prop_assume!(a != b);
        let expected: Vec<u32> = (1u32..)
            .zip(&texts)
            .filter(|(_, text)| {
                let (pa, pb) = (positions(text, a), positions(text, b));
                pa.iter().any(|&x| pb.iter().any(|&y| x.abs_diff(y) < window as usize))
            })
            .map(|(d, _)| d)
            .collect();
        let mut query = Query::from_terms(Op::Near, [a, b]);
        query.set_window(window).unwrap();
        prop_assert_eq!(boolean_matches(&db_of(&texts), &query), expected);
    }

    #[test]
    fn diff_nested(
        texts in corpus_strategy(),
        a in term_strategy(),
        b in term_strategy(),
        c in term_strategy(),
    ) {
        let corpus = Corpus::new(&texts);
        let expected = corpus.matching(|d| {
            (corpus.contains(d, a) || corpus.contains(d, b)) && !corpus.contains(d, c)
        });
        let query = Query::and_not(Query::from_terms(Op::Or, [a, b]), Query::term(c));
        prop_assert_eq!(boolean_matches(&db_of(&texts), &query), expected);
    }
}

// =============================================================================
// WEIGHTS: engine vs textbook formulas
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// An OR of distinct terms weighs each document by the sum of its term weights.
    #[test]
    fn diff_bm25_or(texts in corpus_strategy(), a in term_strategy(), b in term_strategy()) {
        prop_assume!(a != b);
        let corpus = Corpus::new(&texts);
        let db = db_of(&texts);
        let mset = enquire(&db, &Query::from_terms(Op::Or, [a, b])).get_mset(0, 1000).unwrap();
        assert_mset_consistent(&mset);

        let expected = corpus.matching(|d| corpus.contains(d, a) || corpus.contains(d, b));
        let mut got = mset.docids();
        got.sort_unstable();
        prop_assert_eq!(got, expected);

        for item in mset.iter() {
            let d = item.docid.get();
            let oracle = corpus.bm25(d, a) + corpus.bm25(d, b);
            prop_assert!(
                (item.weight - oracle).abs() < 1e-9,
                "doc {}: engine {} oracle {}", d, item.weight, oracle
            );
            prop_assert_eq!(item.percent, oracle_percent(item.weight, mset.max_possible()));
        }
    }

    #[test]
    fn diff_expand(
        texts in corpus_strategy(),
        picks in prop::collection::btree_set(1u32..16, 1..4),
    ) {
        let corpus = Corpus::new(&texts);
        let rset: BTreeSet<u32> = picks
            .into_iter()
            .filter(|&d| d as usize <= corpus.doc_count())
            .collect();
        prop_assume!(!rset.is_empty());

        let db = db_of(&texts);
        let ids: Vec<u32> = rset.iter().copied().collect();
        let eset = enquire(&db, &Query::empty()).get_eset(1000, &rset_of(&ids)).unwrap();

        let expected = corpus.offer_weights(&rset);
        prop_assert_eq!(eset.ebound(), expected.len());
        let got: BTreeMap<String, f64> =
            eset.iter().map(|i| (i.term.clone(), i.weight)).collect();
        prop_assert_eq!(got.keys().collect::<Vec<_>>(), expected.keys().collect::<Vec<_>>());
        for (term, weight) in &expected {
            prop_assert!((got[term] - weight).abs() < 1e-9, "term {}", term);
        }
    }
}
