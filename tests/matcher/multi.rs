//! Matching across several collections at once.

use crate::common::*;
use quarry::{BoolWeight, Database, Op, Query};

fn both() -> Database {
    let db = simple_data();
    db.add_database(&simple_data2());
    db
}

#[test]
fn ids_interleave_across_collections() {
    let db = both();
    // "word": simple_data docs 2, 4 -> 3, 7; simple_data2 docs 1, 3 -> 2, 6.
    let mset = enquire_with(&db, &Query::term("word"), BoolWeight)
        .get_mset(0, 10)
        .unwrap();
    assert_eq!(mset.docids(), vec![2, 3, 6, 7]);
    assert_eq!(mset.matches_estimated(), 4);
}

#[test]
fn term_only_in_second_collection() {
    let db = both();
    let mset = mset(&db, &Query::term("inmemory"), 0, 10);
    assert_eq!(mset.docids(), vec![2]);
    assert_eq!(mset.document(0).unwrap().data(), SIMPLE_TEXTS2[0]);
    assert_eq!(db.document(2).unwrap().data(), SIMPLE_TEXTS2[0]);
    assert_eq!(db.document(1).unwrap().data(), SIMPLE_TEXTS[0]);
}

#[test]
fn statistics_are_merged() {
    let db = both();
    let mset = mset(&db, &Query::term("word"), 0, 10);
    assert_eq!(mset.termfreq("word").unwrap(), 4);
    assert_eq!(db.doc_count(), 9);
}

#[test]
fn merged_view_ranks_like_one_collection() {
    let parts: [&[&str]; 2] = [&SIMPLE_TEXTS, &SIMPLE_TEXTS2];
    let merged = multi_database(&parts);
    let single = interleaved(&parts);
    let queries = [
        Query::term("word"),
        Query::from_terms(Op::Or, ["this", "simple", "another"]),
        Query::and([Query::term("this"), Query::term("word")]),
        Query::from_terms(Op::Phrase, ["the", "word"]),
    ];
    for query in &queries {
        for maxitems in [1, 3, 20] {
            let a = mset(&merged, query, 0, maxitems);
            let b = mset(&single, query, 0, maxitems);
            assert_eq!(a.items(), b.items(), "{} maxitems={}", query, maxitems);
            assert_eq!(a.max_possible(), b.max_possible());
        }
    }
}

#[test]
fn three_uneven_collections() {
    let parts: [&[&str]; 3] = [&["a b", "b"], &["a"], &["b c", "a c", "a", "a b c"]];
    let merged = multi_database(&parts);
    let single = interleaved(&parts);
    let query = Query::from_terms(Op::Or, ["a", "c"]);
    assert_eq!(all_docids(&merged, &query), all_docids(&single, &query));
    assert_eq!(mset(&merged, &query, 0, 50).items(), mset(&single, &query, 0, 50).items());
}

#[test]
fn added_collections_show_up_in_the_next_match() {
    let db = simple_data();
    let enquire = enquire(&db, &Query::term("inmemory"));
    assert!(enquire.get_mset(0, 10).unwrap().is_empty());
    db.add_database(&simple_data2());
    assert_eq!(enquire.get_mset(0, 10).unwrap().docids(), vec![2]);
}

#[test]
fn empty_database_matches_nothing() {
    let db = Database::new();
    let mset = mset(&db, &Query::term("word"), 0, 10);
    assert!(mset.is_empty());
    assert_eq!(mset.matches_upper_bound(), 0);
}

#[test]
fn adding_a_database_to_itself_duplicates_its_collections() {
    let db = one_doc();
    db.add_database(&db.clone());
    assert_eq!(db.doc_count(), 2);
    let mset = mset(&db, &Query::term("only"), 0, 10);
    assert_eq!(mset.docids(), vec![1, 2]);
}
