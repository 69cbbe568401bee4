//! Single-term and small queries against `simple_data`.

use crate::common::*;
use quarry::{Enquire, Op, Query};

#[test]
fn word_matches_two_documents() {
    let mset = mset(&simple_data(), &Query::term("word"), 0, 10);
    assert_eq!(mset.docids(), vec![2, 4]);
    assert_eq!(mset.matches_lower_bound(), 2);
    assert_eq!(mset.matches_estimated(), 2);
    assert_eq!(mset.matches_upper_bound(), 2);
    assert_mset_consistent(&mset);
}

#[test]
fn word_weights_follow_bm25() {
    let db = simple_data();
    let mset = mset(&db, &Query::term("word"), 0, 10);
    let avg = db.avg_length();
    assert_close(avg, 10.0);

    // Document 2: "word" twice in 13 words. Document 4: once in 18.
    assert_close(mset.items()[0].weight, bm25_oracle(6.0, 2.0, 2.0, 13.0, avg));
    assert_close(mset.items()[1].weight, bm25_oracle(6.0, 2.0, 1.0, 18.0, avg));
    assert_close(mset.max_attained(), mset.items()[0].weight);

    let idf = ((6.0f64 - 2.0 + 0.5) / 2.5 * 0.5 + 1.0).ln();
    assert_close(mset.max_possible(), idf * 2.0);
}

#[test]
fn word_percentages() {
    let mset = mset(&simple_data(), &Query::term("word"), 0, 10);
    let percents: Vec<u8> = mset.iter().map(|i| i.percent).collect();
    assert_eq!(percents, vec![64, 42]);
    for item in &mset {
        assert_eq!(mset.percent(item.weight), item.percent);
    }
}

#[test]
fn common_term_ranks_short_documents_first() {
    let mset = mset(&simple_data(), &Query::term("this"), 0, 10);
    assert_eq!(mset.docids(), vec![5, 3, 6, 1, 2, 4]);
    assert_mset_consistent(&mset);
}

#[test]
fn empty_query_matches_nothing() {
    let mset = mset(&simple_data(), &Query::empty(), 0, 10);
    assert!(mset.is_empty());
    assert_eq!(mset.matches_upper_bound(), 0);
    assert_eq!(mset.max_possible(), 0.0);
}

#[test]
fn and_with_empty_child_matches_nothing() {
    let query = Query::and([Query::term("this"), Query::empty()]);
    let mset = mset(&simple_data(), &query, 0, 10);
    assert!(mset.is_empty());
    assert_eq!(mset.matches_upper_bound(), 0);
    // The term still has statistics.
    assert_eq!(mset.termfreq("this").unwrap(), 6);
}

#[test]
fn empty_combinators_are_not_errors() {
    let db = simple_data();
    for op in [Op::And, Op::Or, Op::Xor, Op::Near, Op::Phrase, Op::EliteSet] {
        let mset = mset(&db, &Query::combine(op, []), 0, 10);
        assert!(mset.is_empty(), "{:?} with no children matched something", op);
    }
}

#[test]
fn absent_term_matches_nothing() {
    let mset = mset(&simple_data(), &Query::term("nosuchterm"), 0, 10);
    assert!(mset.is_empty());
    assert_eq!(mset.matches_upper_bound(), 0);
    assert_eq!(mset.termfreq("nosuchterm").unwrap(), 0);
}

#[test]
fn term_statistics_on_the_mset() {
    let query = Query::from_terms(Op::Or, ["word", "this", "nosuchterm"]);
    let mset = mset(&simple_data(), &query, 0, 10);
    assert_eq!(mset.termfreq("word").unwrap(), 2);
    assert_eq!(mset.termfreq("this").unwrap(), 6);
    assert!(mset.termweight("word").unwrap() > mset.termweight("this").unwrap());
    // Absent terms still carry a weight under BM25.
    assert!(mset.termweight("nosuchterm").unwrap() > 0.0);
    assert!(mset.termfreq("paragraph").unwrap_err().is_invalid_argument());
}

#[test]
fn documents_come_back_through_the_mset() {
    let mset = mset(&simple_data(), &Query::term("word"), 0, 10);
    let doc = mset.document(0).unwrap();
    assert_eq!(doc.data(), SIMPLE_TEXTS[1]);
    assert!(mset.document(5).unwrap_err().is_invalid_argument());
}

#[test]
fn repeated_identical_leaves_add_wqf() {
    let db = simple_data();
    let doubled = Query::or([Query::term_at("this", 1, 1), Query::term_at("this", 1, 1)]);
    let single = Query::term_at("this", 2, 1);
    let a = mset(&db, &doubled, 0, 10);
    let b = mset(&db, &single, 0, 10);
    assert_eq!(a.items(), b.items());
}

#[test]
fn query_length_override_changes_nothing_without_k2() {
    let db = simple_data();
    let mut query = Query::term("word");
    let before = mset(&db, &query, 0, 10);
    query.set_length(40);
    assert_eq!(query.length(), 40);
    let after = mset(&db, &query, 0, 10);
    assert_eq!(before.items(), after.items());
}

#[test]
fn matching_terms_in_query_order() {
    let db = term_order();
    let mut enquire = Enquire::new(&db);
    let query = Query::from_terms(Op::Or, ["zebra", "walrus", "yak", "absent"]);
    enquire.set_query(&query).unwrap();
    assert_eq!(enquire.matching_terms(1).unwrap(), vec!["zebra", "walrus", "yak"]);
    assert_eq!(enquire.matching_terms(2).unwrap(), vec!["zebra", "walrus"]);
}
