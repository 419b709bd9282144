use saferoute_core::{EffectiveParams, GridStats, RankedResult, ScoredCandidate};

/// Packages ranked routes with the request echo and grid statistics.
#[derive(Clone, Copy, Debug)]
pub struct ResultAssembler {
    requested: usize,
    params: EffectiveParams,
    stats: GridStats,
}

impl ResultAssembler {
    /// Captures the request echo shared by every result of a plan.
    #[must_use]
    pub fn new(requested: usize, params: EffectiveParams, stats: GridStats) -> Self {
        Self {
            requested,
            params,
            stats,
        }
    }

    /// Result for a request whose endpoints admit no route.
    #[must_use]
    pub fn empty(&self) -> RankedResult {
        self.assemble(0, Vec::new())
    }

    /// Result carrying the ranked routes and the pre-truncation candidate count.
    #[must_use]
    pub fn assemble(&self, found_candidates: usize, solutions: Vec<ScoredCandidate>) -> RankedResult {
        RankedResult::new(
            self.requested,
            found_candidates,
            self.params,
            self.stats,
            solutions,
        )
    }
}
