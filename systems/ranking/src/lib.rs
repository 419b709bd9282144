#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic ranking of scored routes.

use std::cmp::Ordering;

use log::debug;
use saferoute_core::{Path, ScoredCandidate};

/// Combines step counts with weighted risk and keeps the best routes.
#[derive(Clone, Copy, Debug)]
pub struct Ranker {
    risk_weight: f64,
}

impl Ranker {
    /// Creates a ranker applying the provided risk weight.
    #[must_use]
    pub fn new(risk_weight: f64) -> Self {
        Self { risk_weight }
    }

    /// Scores every candidate and returns the best `k` in ascending order.
    ///
    /// Candidates are ordered by score, then by step count. The sort is
    /// stable, so candidates equal on both keys keep their discovery order.
    /// `k = 0` yields nothing and a `k` beyond the candidate count yields all
    /// of them.
    #[must_use]
    pub fn rank<I>(&self, candidates: I, k: usize) -> Vec<ScoredCandidate>
    where
        I: IntoIterator<Item = (Path, f64)>,
    {
        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|(path, risk_sum)| ScoredCandidate::new(path, risk_sum, self.risk_weight))
            .collect();
        let found = scored.len();

        scored.sort_by(compare);
        scored.truncate(k);

        debug!("ranked {found} candidates, kept {}", scored.len());
        scored
    }
}

fn compare(left: &ScoredCandidate, right: &ScoredCandidate) -> Ordering {
    left.score()
        .total_cmp(&right.score())
        .then_with(|| left.steps().cmp(&right.steps()))
}
