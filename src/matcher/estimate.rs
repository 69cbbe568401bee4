// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Match-count arithmetic.
//!
//! Every node of a query (or of a live evaluation tree) can say how many
//! documents it will produce: a lower bound, an estimate and an upper bound.
//! The bounds must be *correct*: no run may produce fewer than `min` or more
//! than `max`. The estimate only has to be plausible; it assumes children are
//! independent.
//!
//! ```text
//!   AND      min = max(0, Σmin - (k-1)N)     est = N Π(est/N)          max = min(max)
//!   OR       min = max(min)                  est = N (1 - Π(1 - est/N)) max = min(N, Σmax)
//!   XOR      min = 0                         est = a + b - 2ab/N        max = min(N, Σmax)
//!   AND_NOT  min = max(0, L.min - R.max)     est = L.est (1 - R.est/N)  max = L.max
//!   NEAR     min = 0                         est = AND.est / 2          max = AND.max
//!   CUTOFF   min = 0                         est = child.est            max = child.max
//! ```
//!
//! `N` is the number of documents in the collection being counted over.

use crate::types::CountBounds;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Estimate {
    pub min: f64,
    pub est: f64,
    pub max: f64,
}

impl Estimate {
    pub fn from_bounds(bounds: CountBounds) -> Self {
        Self {
            min: f64::from(bounds.min),
            est: f64::from(bounds.est),
            max: f64::from(bounds.max),
        }
    }

    pub fn and(parts: impl IntoIterator<Item = Estimate>, n: f64) -> Self {
        if n <= 0.0 {
            return Self::default();
        }
        let mut parts = parts.into_iter();
        let Some(first) = parts.next() else {
            return Self::default();
        };
        let (mut min_sum, mut frac, mut max, mut k) = (first.min, first.est / n, first.max, 1.0);
        for p in parts {
            min_sum += p.min;
            frac *= p.est / n;
            max = max.min(p.max);
            k += 1.0;
        }
        Self {
            min: (min_sum - (k - 1.0) * n).max(0.0),
            est: frac * n,
            max,
        }
        .normalised()
    }

    pub fn or(parts: impl IntoIterator<Item = Estimate>, n: f64) -> Self {
        if n <= 0.0 {
            return Self::default();
        }
        let (mut min, mut miss, mut max_sum) = (0.0f64, 1.0, 0.0);
        for p in parts {
            min = min.max(p.min);
            miss *= 1.0 - (p.est / n).min(1.0);
            max_sum += p.max;
        }
        Self {
            min,
            est: n * (1.0 - miss),
            max: max_sum.min(n),
        }
        .normalised()
    }

    pub fn xor(parts: impl IntoIterator<Item = Estimate>, n: f64) -> Self {
        if n <= 0.0 {
            return Self::default();
        }
        let (mut est, mut max_sum) = (0.0, 0.0);
        for p in parts {
            est = est + p.est - 2.0 * est * p.est / n;
            max_sum += p.max;
        }
        Self {
            min: 0.0,
            est,
            max: max_sum.min(n),
        }
        .normalised()
    }

    pub fn and_not(left: Estimate, right: Estimate, n: f64) -> Self {
        if n <= 0.0 {
            return Self::default();
        }
        Self {
            min: (left.min - right.max).max(0.0),
            est: left.est * (1.0 - (right.est / n).min(1.0)),
            max: left.max,
        }
        .normalised()
    }

    /// A positional filter over an AND of the same terms.
    pub fn positional(and: Estimate) -> Self {
        Self {
            min: 0.0,
            est: and.est / 2.0,
            max: and.max,
        }
        .normalised()
    }

    /// A filter that may reject any document.
    pub fn filtered(self) -> Self {
        Self { min: 0.0, ..self }
    }

    /// Counts over disjoint document sets.
    pub fn plus(self, other: Estimate) -> Self {
        Self {
            min: self.min + other.min,
            est: self.est + other.est,
            max: self.max + other.max,
        }
    }

    fn normalised(self) -> Self {
        let min = self.min.max(0.0);
        let max = self.max.max(min);
        Self {
            min,
            est: self.est.clamp(min, max),
            max,
        }
    }

    /// Integer bounds. Rounding only ever widens the range.
    pub fn bounds(self) -> CountBounds {
        let n = self.normalised();
        CountBounds::new(n.min.floor() as u32, n.est.round() as u32, n.max.ceil() as u32)
    }
}
