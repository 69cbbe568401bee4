//! Shared test utilities and fixtures.

#![allow(dead_code)]

use quarry::{Database, Enquire, MSet, Query, RSet, Weighting};

// Re-export canonical fixtures from quarry::testing
pub use quarry::testing::{
    database, interleaved, multi_database, one_doc, rset_data, simple_data, simple_data2,
    term_order, RSET_TEXTS, SIMPLE_TEXTS, SIMPLE_TEXTS2,
};

// ============================================================================
// MATCH HELPERS
// ============================================================================

/// An enquire on `db` with `query` bound and default settings.
pub fn enquire(db: &Database, query: &Query) -> Enquire {
    let mut enquire = Enquire::new(db);
    enquire.set_query(query).expect("query should bind");
    enquire
}

/// Same as `enquire` but ranking with `weighting`.
pub fn enquire_with(db: &Database, query: &Query, weighting: impl Weighting + 'static) -> Enquire {
    let mut enquire = enquire(db, query);
    enquire.set_weighting_scheme(weighting);
    enquire
}

pub fn mset(db: &Database, query: &Query, first: usize, maxitems: usize) -> MSet {
    enquire(db, query)
        .get_mset(first, maxitems)
        .expect("match should succeed")
}

/// Every match of `query`, in rank order.
pub fn all_docids(db: &Database, query: &Query) -> Vec<u32> {
    mset(db, query, 0, 1000).docids()
}

pub fn rset_of(docids: &[u32]) -> RSet {
    let mut rset = RSet::new();
    for &d in docids {
        rset.add_document(d).expect("non-zero docid");
    }
    rset
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {} but got {}",
        expected,
        actual
    );
}

/// Bounds are ordered and the page never claims more items than the upper bound.
pub fn assert_mset_consistent(mset: &MSet) {
    assert!(mset.matches_lower_bound() <= mset.matches_estimated());
    assert!(mset.matches_estimated() <= mset.matches_upper_bound());
    assert!(mset.len() as u32 <= mset.matches_upper_bound());
    let percents: Vec<u8> = mset.iter().map(|i| i.percent).collect();
    assert!(
        percents.windows(2).all(|w| w[0] >= w[1]),
        "percentages not descending: {:?}",
        percents
    );
    assert!(mset.iter().all(|i| i.percent <= 100));
    assert!(mset.iter().all(|i| i.weight <= mset.max_attained() + 1e-12));
}

// ============================================================================
// BM25 ORACLE
// ============================================================================

/// Textbook BM25 with default parameters, for one term in one document.
///
/// `n` documents out of `big_n` contain the term; `wdf`, `len` and `avg` describe
/// the document. No relevance information.
pub fn bm25_oracle(big_n: f64, n: f64, wdf: f64, len: f64, avg: f64) -> f64 {
    let (k1, b, min_normlen) = (1.0, 0.5, 0.5);
    let mut ratio = (big_n - n + 0.5) / (n + 0.5);
    if ratio < 2.0 {
        ratio = ratio * 0.5 + 1.0;
    }
    let idf = ratio.ln();
    let l = (len / avg).max(min_normlen);
    idf * wdf * (k1 + 1.0) / (k1 * (l * b + 1.0 - b) + wdf)
}
