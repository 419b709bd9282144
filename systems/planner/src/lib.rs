#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sequential planning pipeline for SafeRoute.
//!
//! [`plan`] runs one request end to end: the raw grid is normalized, the
//! endpoints are checked, routes are enumerated over the walkability mask,
//! scored against the hazards, ranked, and finally assembled with the request
//! echo and grid statistics. Every buffer is owned by the call, so independent
//! requests may be planned from as many threads as the caller likes.

mod assembler;

use log::debug;
use saferoute_core::{Cell, MalformedInputError, Path, RankedResult, SearchParams};
use saferoute_grid::{normalize, RawCellValue};
use saferoute_system_enumeration::{PathEnumerator, SearchBounds};
use saferoute_system_ranking::Ranker;
use saferoute_system_risk::RiskScorer;

pub use assembler::ResultAssembler;

/// Caller-supplied endpoint coordinates, which may lie outside any grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Requested row index.
    pub row: i64,
    /// Requested column index.
    pub column: i64,
}

impl Endpoint {
    /// Creates an endpoint from signed coordinates.
    #[must_use]
    pub const fn new(row: i64, column: i64) -> Self {
        Self { row, column }
    }

    /// Grid cell named by the endpoint, if its coordinates are representable.
    #[must_use]
    pub fn to_cell(self) -> Option<Cell> {
        let row = u32::try_from(self.row).ok()?;
        let column = u32::try_from(self.column).ok()?;
        Some(Cell::new(row, column))
    }
}

impl From<Cell> for Endpoint {
    fn from(cell: Cell) -> Self {
        Self::new(i64::from(cell.row()), i64::from(cell.column()))
    }
}

/// Plans the lowest-risk routes between two endpoints of a raw grid.
///
/// Malformed grids and unusable tuning values are rejected before any search
/// work happens. Endpoints outside the grid or on a wall are not errors: they
/// produce a result with no candidates.
pub fn plan<T>(
    raw_grid: &[Vec<T>],
    start: Endpoint,
    goal: Endpoint,
    params: &SearchParams,
) -> Result<RankedResult, MalformedInputError>
where
    T: RawCellValue,
{
    params.validate()?;
    let grid = normalize(raw_grid)?;

    let effective = params.effective(grid.rows(), grid.columns());
    let assembler = ResultAssembler::new(params.k, effective, grid.stats());

    let endpoints = start
        .to_cell()
        .zip(goal.to_cell())
        .filter(|(start, goal)| grid.endpoints_usable(*start, *goal));
    let Some((start, goal)) = endpoints else {
        debug!("endpoints {start:?} -> {goal:?} are outside the grid or on a wall");
        return Ok(assembler.empty());
    };

    let mask = grid.walkability(params.strict_hazard);
    let enumerator = PathEnumerator::new(SearchBounds {
        cap: effective.cap,
        max_depth: effective.max_depth,
    });
    let enumeration = enumerator.enumerate(&mask, start, goal);
    if enumeration.reached_cap() {
        debug!(
            "candidate cap of {} reached; further routes were not explored",
            effective.cap
        );
    }

    let hazards = grid.hazards();
    let scorer = RiskScorer::new(&hazards, params.radius);
    let found = enumeration.len();
    let candidates = enumeration.into_paths().into_iter().map(|path: Path| {
        let risk = scorer.score(path.cells());
        (path, risk)
    });

    let solutions = Ranker::new(params.risk_weight).rank(candidates, params.k);
    Ok(assembler.assemble(found, solutions))
}
