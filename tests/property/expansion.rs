//! Expansion with a decider: a limited ESet is the filtered full ranking, cut short.

use super::oracles::{corpus_strategy, Corpus, VOCAB};
use crate::common::{database, enquire, rset_of};
use proptest::prelude::*;
use quarry::{ESetItem, ExpandOptions, Query};
use std::collections::BTreeSet;

proptest! {
    #[test]
    fn decider_then_truncate_matches_filtered_ranking(
        texts in corpus_strategy(),
        picks in prop::collection::btree_set(1u32..16, 1..4),
        accepted in prop::collection::btree_set(prop::sample::select(VOCAB.to_vec()), 0..=VOCAB.len()),
    ) {
        let corpus = Corpus::new(&texts);
        let ids: Vec<u32> = picks
            .into_iter()
            .filter(|&d| d as usize <= corpus.doc_count())
            .collect();
        prop_assume!(!ids.is_empty());

        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let db = database(&refs);
        let enquire = enquire(&db, &Query::empty());
        let rset = rset_of(&ids);

        let accepted: BTreeSet<String> = accepted.into_iter().map(str::to_string).collect();
        let keep = |term: &str| accepted.contains(term);
        let options = ExpandOptions {
            decider: Some(&keep),
            ..ExpandOptions::default()
        };

        let full = enquire.get_eset(usize::MAX, &rset).unwrap();
        let filtered: Vec<ESetItem> = full
            .iter()
            .filter(|i| accepted.contains(&i.term))
            .cloned()
            .collect();

        let unlimited = enquire.get_eset_with(usize::MAX, &rset, &options).unwrap();
        prop_assert_eq!(unlimited.ebound(), filtered.len());
        prop_assert_eq!(unlimited.items(), filtered.as_slice());

        for n in 0..=unlimited.ebound() + 1 {
            let eset = enquire.get_eset_with(n, &rset, &options).unwrap();
            let expected: Vec<ESetItem> = filtered.iter().take(n).cloned().collect();
            prop_assert_eq!(eset.items(), expected.as_slice(), "n = {}", n);
            prop_assert_eq!(eset.ebound(), filtered.len());
        }
    }
}
