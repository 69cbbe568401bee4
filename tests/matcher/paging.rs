//! Pages, check_at_least, count-only matches and sort direction.

use crate::common::*;
use quarry::{BoolWeight, Op, Query};

#[test]
fn pages_are_slices_of_the_full_ranking() {
    let db = simple_data();
    let query = Query::term("this");
    let full = mset(&db, &query, 0, 10).docids();
    for first in 0..7 {
        for maxitems in 0..7 {
            let page = mset(&db, &query, first, maxitems);
            let expected: Vec<u32> = full.iter().copied().skip(first).take(maxitems).collect();
            assert_eq!(page.docids(), expected, "first={} maxitems={}", first, maxitems);
            assert_eq!(page.first(), first);
        }
    }
}

#[test]
fn page_past_the_end_is_empty_but_counted() {
    let mset = mset(&simple_data(), &Query::term("word"), 5, 10);
    assert!(mset.is_empty());
    assert_eq!(mset.matches_estimated(), 2);
}

#[test]
fn unbounded_page_size_returns_everything_after_first() {
    let db = simple_data();
    let query = Query::term("this");
    let full = mset(&db, &query, 0, 10).docids();

    let page = mset(&db, &query, 1, usize::MAX);
    assert_eq!(page.docids(), full[1..].to_vec());
    assert_eq!(page.matches_lower_bound(), 6);
    assert_eq!(page.matches_upper_bound(), 6);

    let far = mset(&db, &query, usize::MAX, usize::MAX);
    assert!(far.is_empty());
    assert_eq!(far.matches_estimated(), 6);
}

#[test]
fn exhausted_match_has_exact_counts() {
    let db = simple_data();
    let query = Query::from_terms(Op::Or, ["word", "paragraph"]);
    let mset = mset(&db, &query, 0, 100);
    assert_eq!(mset.len(), 4);
    assert_eq!(mset.matches_lower_bound(), 4);
    assert_eq!(mset.matches_estimated(), 4);
    assert_eq!(mset.matches_upper_bound(), 4);
}

#[test]
fn boolean_term_query_counts_exactly_without_draining() {
    let db = simple_data();
    let enquire = enquire_with(&db, &Query::term("this"), BoolWeight);
    let mset = enquire.get_mset(0, 2).unwrap();
    assert_eq!(mset.docids(), vec![1, 2]);
    assert_eq!(mset.matches_lower_bound(), 6);
    assert_eq!(mset.matches_estimated(), 6);
    assert_eq!(mset.matches_upper_bound(), 6);
}

#[test]
fn truncated_boolean_and_keeps_bounds_around_the_truth() {
    let db = simple_data();
    let query = Query::and([Query::term("this"), Query::term("paragraph")]);
    let mset = enquire_with(&db, &query, BoolWeight).get_mset(0, 1).unwrap();
    assert_eq!(mset.docids(), vec![2]);
    assert!(mset.matches_lower_bound() <= 3);
    assert!(mset.matches_upper_bound() >= 3);
    assert_mset_consistent(&mset);
}

#[test]
fn check_at_least_forces_an_exact_count() {
    let db = simple_data();
    let query = Query::and([Query::term("this"), Query::term("paragraph")]);
    let enquire = enquire_with(&db, &query, BoolWeight);
    let mset = enquire.get_mset_with(0, 1, 100, None).unwrap();
    assert_eq!(mset.docids(), vec![2]);
    assert_eq!(mset.matches_lower_bound(), 3);
    assert_eq!(mset.matches_estimated(), 3);
    assert_eq!(mset.matches_upper_bound(), 3);
}

#[test]
fn count_only_match_uses_statistics() {
    let db = simple_data();
    let word = mset(&db, &Query::term("word"), 0, 0);
    assert!(word.is_empty());
    assert_eq!(word.matches_lower_bound(), 2);
    assert_eq!(word.matches_upper_bound(), 2);
    assert!(word.max_possible() > 0.0);
    assert_eq!(word.termfreq("word").unwrap(), 2);

    let and = mset(&db, &Query::and([Query::term("word"), Query::term("paragraph")]), 0, 0);
    assert!(and.matches_lower_bound() <= 1);
    assert!(and.matches_upper_bound() >= 1);
    assert_mset_consistent(&and);
}

#[test]
fn count_only_with_check_at_least_drives_the_match() {
    let db = simple_data();
    let query = Query::and([Query::term("word"), Query::term("paragraph")]);
    let mset = enquire(&db, &query).get_mset_with(0, 0, 10, None).unwrap();
    assert!(mset.is_empty());
    assert_eq!(mset.matches_estimated(), 1);
    assert_eq!(mset.matches_lower_bound(), 1);
    assert_eq!(mset.matches_upper_bound(), 1);
}

#[test]
fn reverse_boolean_order_is_the_reversed_forward_order() {
    let db = simple_data();
    let query = Query::from_terms(Op::Or, ["paragraph", "simple"]);
    let mut enquire = enquire_with(&db, &query, BoolWeight);
    let forward = enquire.get_mset(0, 10).unwrap().docids();
    assert_eq!(forward, vec![2, 3, 4, 5, 6]);

    enquire.set_sort_forward(false);
    let backward = enquire.get_mset(0, 10).unwrap().docids();
    assert_eq!(backward, vec![6, 5, 4, 3, 2]);

    // A truncated reverse page is the tail of the forward order, reversed.
    let page = enquire.get_mset(0, 2).unwrap();
    assert_eq!(page.docids(), vec![6, 5]);
    assert_eq!(page.matches_estimated(), 5);
}

#[test]
fn reverse_direction_breaks_weight_ties_by_higher_id() {
    // Identical documents tie on weight.
    let db = database(&["same text", "same text", "other"]);
    let query = Query::term("same");
    let mut enquire = enquire(&db, &query);
    assert_eq!(enquire.get_mset(0, 10).unwrap().docids(), vec![1, 2]);
    enquire.set_sort_forward(false);
    assert_eq!(enquire.get_mset(0, 10).unwrap().docids(), vec![2, 1]);
    assert_eq!(enquire.get_mset(0, 1).unwrap().docids(), vec![2]);
}

#[test]
fn weighted_match_can_stop_early_and_still_be_right() {
    let db = simple_data();
    let query = Query::from_terms(Op::Or, ["word", "this"]);
    let full = mset(&db, &query, 0, 10);
    let top = mset(&db, &query, 0, 1);
    assert_eq!(top.docids(), full.docids()[..1].to_vec());
    assert!(top.matches_upper_bound() >= 6);
    assert!(top.matches_lower_bound() <= 6);
    assert_mset_consistent(&top);
}
