//! Multi-collection merge: a database split across collections must behave
//! exactly like one collection holding the same documents on the same ids.

use super::oracles::{document_strategy, term_strategy};
use crate::common::{enquire, interleaved, multi_database, rset_of};
use proptest::prelude::*;
use quarry::{Database, Op, Query};

fn parts_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(document_strategy(), 0..6), 1..4)
        .prop_filter("at least one document", |parts| parts.iter().any(|p| !p.is_empty()))
}

fn databases(parts: &[Vec<String>]) -> (Database, Database) {
    let owned: Vec<Vec<&str>> = parts
        .iter()
        .map(|p| p.iter().map(String::as_str).collect())
        .collect();
    let refs: Vec<&[&str]> = owned.iter().map(Vec::as_slice).collect();
    (multi_database(&refs), interleaved(&refs))
}

/// Every global id in use, ascending.
fn global_ids(parts: &[Vec<String>]) -> Vec<u32> {
    let n = parts.len() as u32;
    let mut ids: Vec<u32> = (0u32..)
        .zip(parts)
        .flat_map(|(k, part)| (1..=part.len() as u32).map(move |l| (l - 1) * n + k + 1))
        .collect();
    ids.sort_unstable();
    ids
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(150))]

    #[test]
    fn merged_ranking_equals_single_collection(
        parts in parts_strategy(),
        a in term_strategy(),
        b in term_strategy(),
        c in term_strategy(),
    ) {
        let (merged, single) = databases(&parts);
        let queries = [
            Query::from_terms(Op::Or, [a, b, c]),
            Query::and_not(Query::from_terms(Op::Or, [a, b]), Query::term(c)),
            Query::from_terms(Op::Phrase, [a, b]),
        ];
        for query in &queries {
            let m = enquire(&merged, query).get_mset(0, 1000).unwrap();
            let s = enquire(&single, query).get_mset(0, 1000).unwrap();
            prop_assert_eq!(m.items(), s.items(), "query {}", query);
            prop_assert_eq!(m.max_possible(), s.max_possible());
            prop_assert_eq!(m.matches_estimated(), s.matches_estimated());
        }
    }

    #[test]
    fn merged_page_equals_single_page(
        parts in parts_strategy(),
        a in term_strategy(),
        first in 0usize..4,
        maxitems in 1usize..4,
    ) {
        let (merged, single) = databases(&parts);
        let query = Query::term(a);
        let m = enquire(&merged, &query).get_mset(first, maxitems).unwrap();
        let s = enquire(&single, &query).get_mset(first, maxitems).unwrap();
        prop_assert_eq!(m.items(), s.items());
    }

    #[test]
    fn merged_expansion_equals_single_expansion(
        parts in parts_strategy(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..4),
    ) {
        let (merged, single) = databases(&parts);
        let ids = global_ids(&parts);
        let chosen: Vec<u32> = picks.iter().map(|i| ids[i.index(ids.len())]).collect();
        let rset = rset_of(&chosen);

        let m = enquire(&merged, &Query::empty()).get_eset(100, &rset).unwrap();
        let s = enquire(&single, &Query::empty()).get_eset(100, &rset).unwrap();
        prop_assert_eq!(m, s);
    }
}
