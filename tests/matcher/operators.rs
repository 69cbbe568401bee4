//! Boolean structure of every operator, checked with boolean weighting so the
//! result is plain document-id order.

use crate::common::*;
use quarry::{BoolWeight, Bm25Weight, Database, Op, Query};

fn ids(db: &Database, query: &Query) -> Vec<u32> {
    enquire_with(db, query, BoolWeight)
        .get_mset(0, 100)
        .unwrap()
        .docids()
}

fn t(term: &str) -> Query {
    Query::term(term)
}

#[test]
fn and_or_and_not() {
    let db = simple_data();
    assert_eq!(ids(&db, &Query::and([t("this"), t("word")])), vec![2, 4]);
    assert_eq!(ids(&db, &Query::and([t("word"), t("paragraph")])), vec![2]);
    assert_eq!(ids(&db, &Query::or([t("word"), t("paragraph")])), vec![2, 3, 4, 6]);
    assert_eq!(ids(&db, &Query::and_not(t("paragraph"), t("word"))), vec![3, 6]);
    assert_eq!(ids(&db, &Query::and_not(t("this"), t("this"))), Vec::<u32>::new());
}

#[test]
fn xor_keeps_odd_membership() {
    let db = simple_data();
    // paragraph: 2 3 6, simple: 3 4 5
    let query = Query::combine(Op::Xor, [t("paragraph"), t("simple")]);
    assert_eq!(ids(&db, &query), vec![2, 4, 5, 6]);
    // adding "this" (everywhere) flips membership
    let query = Query::combine(Op::Xor, [t("paragraph"), t("simple"), t("this")]);
    assert_eq!(ids(&db, &query), vec![1, 3]);
}

#[test]
fn nested_operators() {
    let db = simple_data();
    let query = Query::and([
        Query::or([t("word"), t("simple")]),
        Query::and_not(t("this"), t("test")),
    ]);
    assert_eq!(ids(&db, &query), vec![2, 3, 4, 5]);
}

#[test]
fn phrase_needs_order_and_adjacency() {
    let db = simple_data();
    assert_eq!(ids(&db, &Query::from_terms(Op::Phrase, ["word", "appears"])), vec![2]);
    assert_eq!(ids(&db, &Query::from_terms(Op::Phrase, ["appears", "word"])), Vec::<u32>::new());
    assert_eq!(ids(&db, &Query::from_terms(Op::Phrase, ["the", "word"])), vec![2]);
    assert_eq!(ids(&db, &Query::from_terms(Op::Phrase, ["this", "is"])), vec![1, 3]);
}

#[test]
fn phrase_window_allows_gaps() {
    let db = simple_data();
    // doc 3: "this is another paragraph"
    let mut query = Query::from_terms(Op::Phrase, ["this", "paragraph"]);
    assert_eq!(ids(&db, &query), vec![2, 6]);
    query.set_window(4).unwrap();
    assert_eq!(ids(&db, &query), vec![2, 3, 6]);
}

#[test]
fn near_ignores_order() {
    let db = simple_data();
    assert_eq!(ids(&db, &Query::from_terms(Op::Near, ["appears", "word"])), vec![2]);
    let mut query = Query::from_terms(Op::Near, ["paragraph", "this"]);
    assert_eq!(ids(&db, &query), vec![2, 6]);
    query.set_window(3).unwrap();
    assert_eq!(ids(&db, &query), vec![2, 6]);
    query.set_window(4).unwrap();
    assert_eq!(ids(&db, &query), vec![2, 3, 6]);
}

#[test]
fn positional_operands_must_be_terms() {
    let db = simple_data();
    let mut enquire = quarry::Enquire::new(&db);
    let query = Query::combine(Op::Phrase, [t("this"), Query::and([t("is"), t("a")])]);
    assert!(enquire.set_query(&query).unwrap_err().is_invalid_argument());
}

#[test]
fn mutators_reject_the_wrong_operator() {
    let mut and = Query::and([t("a"), t("b")]);
    assert!(and.set_window(3).unwrap_err().is_invalid_argument());
    assert!(and.set_elite_set_size(3).unwrap_err().is_invalid_argument());
    assert!(and.set_cutoff(1.0).unwrap_err().is_invalid_argument());
}

#[test]
fn elite_set_keeps_the_strongest_terms() {
    let db = simple_data();
    let mut query = Query::from_terms(Op::EliteSet, ["this", "word", "simple"]);
    query.set_elite_set_size(1).unwrap();

    // Under BM25 "word" has the highest maximum weight.
    let mset = enquire_with(&db, &query, Bm25Weight::default())
        .get_mset(0, 10)
        .unwrap();
    assert_eq!(mset.docids(), vec![2, 4]);

    query.set_elite_set_size(2).unwrap();
    let mut docids = enquire_with(&db, &query, Bm25Weight::default())
        .get_mset(0, 10)
        .unwrap()
        .docids();
    docids.sort_unstable();
    assert_eq!(docids, vec![2, 3, 4, 5]);
}

#[test]
fn elite_set_skips_terms_that_match_nothing() {
    let db = simple_data();
    let mut query = Query::from_terms(Op::EliteSet, ["nosuchterm", "word"]);
    query.set_elite_set_size(1).unwrap();
    assert_eq!(all_docids(&db, &query), vec![2, 4]);
}

#[test]
fn weight_cutoff_node_drops_light_documents() {
    let db = simple_data();
    let or = Query::from_terms(Op::Or, ["word", "this"]);
    let full = mset(&db, &or, 0, 10);
    assert_eq!(full.len(), 6);

    let mut cut = Query::weight_cutoff(or, 0.5);
    let mset = mset(&db, &cut, 0, 10);
    assert_eq!(mset.docids(), vec![2, 4]);
    assert_eq!(mset.matches_estimated(), 2);

    cut.set_cutoff(0.0).unwrap();
    assert_eq!(all_docids(&db, &cut).len(), 6);
}
