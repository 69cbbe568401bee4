//! Invariants of a single match that must hold for any corpus.

use super::oracles::{corpus_strategy, term_strategy};
use crate::common::{assert_mset_consistent, database, enquire, enquire_with};
use proptest::prelude::*;
use quarry::{BoolWeight, Database, MSet, Op, Query};

fn db_of(texts: &[String]) -> Database {
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    database(&refs)
}

fn full(db: &Database, query: &Query) -> MSet {
    enquire(db, query).get_mset(0, 1000).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any window of the ranking equals the same slice of the full ranking.
    #[test]
    fn page_is_a_slice_of_the_full_ranking(
        texts in corpus_strategy(),
        a in term_strategy(),
        b in term_strategy(),
        first in 0usize..6,
        maxitems in 1usize..6,
    ) {
        let db = db_of(&texts);
        let query = Query::from_terms(Op::Or, [a, b]);
        let all = full(&db, &query);
        let page = enquire(&db, &query).get_mset(first, maxitems).unwrap();

        let expected: Vec<_> = all.items().iter().skip(first).take(maxitems).cloned().collect();
        prop_assert_eq!(page.items(), expected.as_slice());
        prop_assert_eq!(page.first(), first);
        assert_mset_consistent(&page);
    }

    /// Weights never increase down the page; ties fall back to ascending ids.
    #[test]
    fn ranking_is_sorted(texts in corpus_strategy(), a in term_strategy(), b in term_strategy()) {
        let mset = full(&db_of(&texts), &Query::from_terms(Op::Or, [a, b]));
        for pair in mset.items().windows(2) {
            prop_assert!(pair[0].weight >= pair[1].weight);
            if pair[0].weight == pair[1].weight {
                prop_assert!(pair[0].docid < pair[1].docid);
            }
        }
        if let Some(top) = mset.get(0) {
            prop_assert_eq!(top.weight, mset.max_attained());
        }
        prop_assert!(mset.max_attained() <= mset.max_possible() + 1e-9);
    }

    /// Boolean ranking is by id alone, in the chosen direction.
    #[test]
    fn boolean_reverse_is_descending_ids(texts in corpus_strategy(), a in term_strategy()) {
        let db = db_of(&texts);
        let query = Query::term(a);
        let forward = enquire_with(&db, &query, BoolWeight).get_mset(0, 1000).unwrap();
        let mut reverse = enquire_with(&db, &query, BoolWeight);
        reverse.set_sort_forward(false);
        let reverse = reverse.get_mset(0, 1000).unwrap();

        let mut ids = forward.docids();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        ids.reverse();
        prop_assert_eq!(reverse.docids(), ids);
    }

    /// A percent cutoff keeps exactly the full-ranking items at or above it.
    #[test]
    fn percent_cutoff_filters_the_full_ranking(
        texts in corpus_strategy(),
        a in term_strategy(),
        b in term_strategy(),
        cutoff in 0u8..=100,
    ) {
        let db = db_of(&texts);
        let query = Query::from_terms(Op::Or, [a, b]);
        let all = full(&db, &query);

        let mut cut = enquire(&db, &query);
        cut.set_cutoff(cutoff, 0.0).unwrap();
        let cut = cut.get_mset(0, 1000).unwrap();

        let expected: Vec<_> = all.iter().filter(|i| i.percent >= cutoff).cloned().collect();
        prop_assert_eq!(cut.items(), expected.as_slice());
        prop_assert!(cut.matches_lower_bound() as usize >= cut.len());
    }

    /// A weight cutoff keeps exactly the full-ranking items weighing at least the threshold.
    #[test]
    fn weight_cutoff_filters_the_full_ranking(
        texts in corpus_strategy(),
        a in term_strategy(),
        threshold in 0.0f64..2.0,
    ) {
        let db = db_of(&texts);
        let query = Query::term(a);
        let all = full(&db, &query);

        let mut cut = enquire(&db, &query);
        cut.set_cutoff(0, threshold).unwrap();
        let cut = cut.get_mset(0, 1000).unwrap();

        let expected: Vec<u32> = all
            .iter()
            .filter(|i| i.weight >= threshold)
            .map(|i| i.docid.get())
            .collect();
        prop_assert_eq!(cut.docids(), expected);
    }

    /// Checking every document gives exact counts however short the page.
    #[test]
    fn check_at_least_makes_counts_exact(
        texts in corpus_strategy(),
        a in term_strategy(),
        b in term_strategy(),
        maxitems in 0usize..3,
    ) {
        let db = db_of(&texts);
        let query = Query::from_terms(Op::Or, [a, b]);
        let total = full(&db, &query).len() as u32;
        let mset = enquire(&db, &query)
            .get_mset_with(0, maxitems, 1000, None)
            .unwrap();
        prop_assert_eq!(mset.matches_lower_bound(), total);
        prop_assert_eq!(mset.matches_upper_bound(), total);
        prop_assert_eq!(mset.matches_estimated(), total);
    }

    /// Estimates always bracket the true count.
    #[test]
    fn bounds_bracket_the_true_count(
        texts in corpus_strategy(),
        a in term_strategy(),
        b in term_strategy(),
        maxitems in 0usize..3,
    ) {
        let db = db_of(&texts);
        let query = Query::and([Query::term(a), Query::term(b)]);
        let total = full(&db, &query).len() as u32;
        let mset = enquire(&db, &query).get_mset(0, maxitems).unwrap();
        prop_assert!(mset.matches_lower_bound() <= total);
        prop_assert!(total <= mset.matches_upper_bound());
        assert_mset_consistent(&mset);
    }
}
