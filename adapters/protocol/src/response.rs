use saferoute_core::{EffectiveParams, GridStats, MalformedInputError, RankedResult, ScoredCandidate};
use serde::Serialize;

/// Response envelope written for every request.
///
/// Successful responses carry `"ok": true` with the ranked routes; failures
/// carry `"ok": false` and an `error` message and nothing else.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SolveResponse {
    /// The request was planned.
    Solved(Solution),
    /// The request was rejected.
    Failed(Failure),
}

impl SolveResponse {
    /// Whether the request was planned.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, SolveResponse::Solved(_))
    }

    /// Compact JSON rendering of the envelope.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Indented JSON rendering of the envelope.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl From<Result<RankedResult, MalformedInputError>> for SolveResponse {
    fn from(outcome: Result<RankedResult, MalformedInputError>) -> Self {
        match outcome {
            Ok(result) => SolveResponse::Solved(Solution::from(result)),
            Err(error) => SolveResponse::Failed(Failure::from(&error)),
        }
    }
}

/// Body of a successful response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Solution {
    ok: bool,
    /// Number of routes the caller asked for.
    pub requested: usize,
    /// Number of routes enumerated before truncation.
    pub found_candidates: usize,
    /// Number of routes in `solutions`.
    pub returned: usize,
    /// Tuning actually used.
    pub params: EffectiveParams,
    /// Grid summary.
    pub stats: GridStats,
    /// Ranked routes, best first.
    pub solutions: Vec<Route>,
}

impl From<RankedResult> for Solution {
    fn from(result: RankedResult) -> Self {
        let requested = result.requested();
        let found_candidates = result.found_candidates();
        let returned = result.returned();
        let params = *result.params();
        let stats = *result.stats();

        Self {
            ok: true,
            requested,
            found_candidates,
            returned,
            params,
            stats,
            solutions: result.into_solutions().iter().map(Route::from).collect(),
        }
    }
}

/// One ranked route on the wire.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route {
    /// Visited cells as `[row, col]` pairs.
    pub path: Vec<[u32; 2]>,
    /// Number of cells on the route.
    pub steps: usize,
    /// Accumulated hazard exposure.
    pub risk_sum: f64,
    /// Combined ranking score.
    pub score: f64,
}

impl From<&ScoredCandidate> for Route {
    fn from(candidate: &ScoredCandidate) -> Self {
        Self {
            path: candidate
                .path()
                .cells()
                .iter()
                .map(|cell| [cell.row(), cell.column()])
                .collect(),
            steps: candidate.steps(),
            risk_sum: candidate.risk_sum(),
            score: candidate.score(),
        }
    }
}

/// Body of a rejected request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Failure {
    ok: bool,
    /// Human-readable reason.
    pub error: String,
}

impl Failure {
    /// Failure carrying an arbitrary message.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

impl From<&MalformedInputError> for Failure {
    fn from(error: &MalformedInputError) -> Self {
        Self::new(error.to_string())
    }
}
