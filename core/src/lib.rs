#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the SafeRoute planner.
//!
//! This crate defines the data model that flows through the planning
//! pipeline. The grid crate classifies raw cell codes into [`CellKind`]
//! values, the enumeration system produces [`Path`] candidates between two
//! [`Cell`] endpoints, the risk and ranking systems turn those into
//! [`ScoredCandidate`] values, and the planner packages the survivors into a
//! [`RankedResult`] for the caller. Every value is created fresh per request
//! and none of them carry shared mutable state.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of ranked routes returned when the caller does not ask for a count.
pub const DEFAULT_K: usize = 10;
/// Number of completed candidates gathered before enumeration stops.
pub const DEFAULT_CAP: usize = 1500;
/// Manhattan distance at which a hazard stops contributing risk.
pub const DEFAULT_RADIUS: i64 = 2;
/// Weight applied to the risk sum when combining it with the step count.
pub const DEFAULT_RISK_WEIGHT: f64 = 8.0;
/// Multiplier applied to the cell count to derive the default depth bound.
pub const DEPTH_FACTOR: usize = 2;

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    row: u32,
    column: u32,
}

impl Cell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    ///
    /// The sum is widened to `u64` so opposite corners of the largest
    /// representable grid never overflow.
    #[must_use]
    pub fn manhattan_distance(self, other: Cell) -> u64 {
        u64::from(self.row.abs_diff(other.row)) + u64::from(self.column.abs_diff(other.column))
    }

    /// Cell adjacent in the provided direction, if it is representable.
    ///
    /// Only underflow and overflow of the coordinate type are checked here;
    /// callers compare against their own grid bounds.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Cell> {
        match direction {
            Direction::North => self.row.checked_sub(1).map(|row| Cell::new(row, self.column)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| Cell::new(self.row, column)),
            Direction::South => self.row.checked_add(1).map(|row| Cell::new(row, self.column)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| Cell::new(self.row, column)),
        }
    }
}

/// Cardinal movement directions between orthogonal neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in the fixed exploration order: up, right, down, left.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
}

/// Classification of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Traversable cell without any penalty.
    Free,
    /// Blocked cell that no route may enter.
    Wall,
    /// Cell that raises the risk of nearby steps and is blocked in strict mode.
    Hazard,
}

impl CellKind {
    /// Raw code used for free cells.
    pub const FREE_CODE: i64 = 0;
    /// Raw code used for wall cells.
    pub const WALL_CODE: i64 = 1;
    /// Raw code used for hazard cells.
    pub const HAZARD_CODE: i64 = 2;

    /// Classifies a raw integer code.
    ///
    /// Codes other than the wall and hazard codes are treated as free cells,
    /// which keeps grids produced by older editors loadable.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            Self::WALL_CODE => Self::Wall,
            Self::HAZARD_CODE => Self::Hazard,
            _ => Self::Free,
        }
    }

    /// Canonical raw code for the cell kind.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Free => Self::FREE_CODE,
            Self::Wall => Self::WALL_CODE,
            Self::Hazard => Self::HAZARD_CODE,
        }
    }
}

/// Ordered sequence of cells leading from a start cell to a goal cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    /// Wraps the provided cells, ordered from start to goal.
    #[must_use]
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Cells visited by the path in travel order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of cells on the path, start and goal included.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.cells.len()
    }

    /// First cell of the path.
    #[must_use]
    pub fn start(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    /// Last cell of the path.
    #[must_use]
    pub fn goal(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    /// Reports whether no cell appears twice on the path.
    #[must_use]
    pub fn is_simple(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.cells.len());
        self.cells.iter().all(|cell| seen.insert(*cell))
    }

    /// Reports whether every consecutive pair of cells is orthogonally adjacent.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.cells
            .windows(2)
            .all(|pair| pair[0].manhattan_distance(pair[1]) == 1)
    }

    /// Consumes the path, yielding the underlying cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }
}

/// Candidate route together with its ranking inputs and combined score.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredCandidate {
    path: Path,
    steps: usize,
    risk_sum: f64,
    score: f64,
}

impl ScoredCandidate {
    /// Scores a path as `steps + risk_weight * risk_sum`.
    #[must_use]
    pub fn new(path: Path, risk_sum: f64, risk_weight: f64) -> Self {
        let steps = path.steps();
        let score = steps as f64 + risk_weight * risk_sum;
        Self {
            path,
            steps,
            risk_sum,
            score,
        }
    }

    /// Route described by the candidate.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of cells on the route.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Accumulated hazard proximity of the route.
    #[must_use]
    pub fn risk_sum(&self) -> f64 {
        self.risk_sum
    }

    /// Combined ranking key; lower is better.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Aggregate description of a classified grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridStats {
    /// Number of rows in the grid.
    pub rows: usize,
    /// Number of columns in the grid.
    #[serde(rename = "cols")]
    pub columns: usize,
    /// Number of wall cells.
    pub walls: usize,
    /// Number of hazard cells.
    pub hazards: usize,
}

/// Tuning knobs accepted by a single planning request.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchParams {
    /// Number of ranked routes to return.
    pub k: usize,
    /// Number of completed candidates gathered before enumeration stops.
    pub cap: usize,
    /// Largest number of moves a candidate may take; derived from the grid when absent.
    pub max_depth: Option<usize>,
    /// Hazard decay radius; zero or negative disables risk entirely.
    pub radius: i64,
    /// Weight applied to the risk sum in the combined score.
    pub risk_weight: f64,
    /// Treats hazard cells as walls when set.
    pub strict_hazard: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            cap: DEFAULT_CAP,
            max_depth: None,
            radius: DEFAULT_RADIUS,
            risk_weight: DEFAULT_RISK_WEIGHT,
            strict_hazard: false,
        }
    }
}

impl SearchParams {
    /// Depth bound in effect for a grid with the provided dimensions.
    ///
    /// Defaults to twice the cell count, saturating instead of wrapping.
    #[must_use]
    pub fn effective_max_depth(&self, rows: usize, columns: usize) -> usize {
        self.max_depth.unwrap_or_else(|| {
            rows.saturating_mul(columns).saturating_mul(DEPTH_FACTOR)
        })
    }

    /// Rejects tuning values the scoring model cannot use.
    pub fn validate(&self) -> Result<(), MalformedInputError> {
        if !self.risk_weight.is_finite() {
            return Err(MalformedInputError::InvalidParameter {
                name: "risk_weight",
                reason: "must be a finite number".to_owned(),
            });
        }

        if self.risk_weight < 0.0 {
            return Err(MalformedInputError::InvalidParameter {
                name: "risk_weight",
                reason: format!("must be non-negative (received {})", self.risk_weight),
            });
        }

        Ok(())
    }

    /// Resolves the parameters actually used for a grid of the provided size.
    #[must_use]
    pub fn effective(&self, rows: usize, columns: usize) -> EffectiveParams {
        EffectiveParams {
            radius: self.radius,
            risk_weight: self.risk_weight,
            strict_hazard: self.strict_hazard,
            cap: self.cap,
            max_depth: self.effective_max_depth(rows, columns),
        }
    }
}

/// Tuning values echoed back to the caller after defaults were applied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectiveParams {
    /// Hazard decay radius.
    pub radius: i64,
    /// Weight applied to the risk sum.
    pub risk_weight: f64,
    /// Whether hazards were blocked.
    pub strict_hazard: bool,
    /// Candidate collection cap.
    pub cap: usize,
    /// Depth bound used for enumeration.
    pub max_depth: usize,
}

/// Top-ranked routes of a request alongside the statistics describing the search.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedResult {
    requested: usize,
    found_candidates: usize,
    params: EffectiveParams,
    stats: GridStats,
    solutions: Vec<ScoredCandidate>,
}

impl RankedResult {
    /// Bundles ranked solutions with the request echo and search statistics.
    #[must_use]
    pub fn new(
        requested: usize,
        found_candidates: usize,
        params: EffectiveParams,
        stats: GridStats,
        solutions: Vec<ScoredCandidate>,
    ) -> Self {
        Self {
            requested,
            found_candidates,
            params,
            stats,
            solutions,
        }
    }

    /// Number of routes the caller asked for.
    #[must_use]
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Number of candidates enumerated before truncation.
    #[must_use]
    pub fn found_candidates(&self) -> usize {
        self.found_candidates
    }

    /// Number of routes actually returned.
    #[must_use]
    pub fn returned(&self) -> usize {
        self.solutions.len()
    }

    /// Effective tuning values used by the search.
    #[must_use]
    pub fn params(&self) -> &EffectiveParams {
        &self.params
    }

    /// Statistics describing the classified grid.
    #[must_use]
    pub fn stats(&self) -> &GridStats {
        &self.stats
    }

    /// Ranked routes in ascending score order.
    #[must_use]
    pub fn solutions(&self) -> &[ScoredCandidate] {
        &self.solutions
    }

    /// Reports whether enumeration stopped at the cap, so more routes may exist.
    ///
    /// This is a signal rather than a guarantee: the search space may have been
    /// exactly `cap` routes large.
    #[must_use]
    pub fn possibly_truncated(&self) -> bool {
        self.params.cap > 0 && self.found_candidates == self.params.cap
    }

    /// Consumes the result, yielding the ranked routes.
    #[must_use]
    pub fn into_solutions(self) -> Vec<ScoredCandidate> {
        self.solutions
    }
}

/// Client input that cannot be planned on.
///
/// These errors are surfaced to the caller immediately; no partial computation
/// happens once one is raised. Unreachable or blocked endpoints are not errors
/// and produce an empty [`RankedResult`] instead.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MalformedInputError {
    /// A required request field was absent.
    #[error("missing required field `{field}`")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },
    /// The grid contained no rows.
    #[error("grid must contain at least one row")]
    EmptyGrid,
    /// The first grid row contained no cells.
    #[error("grid rows must contain at least one cell")]
    EmptyRow,
    /// A row length differed from the first row.
    #[error("grid row {row} has {found} cells but the first row has {expected}")]
    JaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A cell value could not be interpreted as an integer.
    #[error("grid cell ({row}, {column}) is not an integer")]
    NonNumericCell {
        /// Zero-based row of the offending cell.
        row: usize,
        /// Zero-based column of the offending cell.
        column: usize,
    },
    /// A tuning value was outside its accepted range.
    #[error("parameter `{name}` {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Human-readable description of the violated constraint.
        reason: String,
    },
    /// The request body could not be decoded.
    #[error("request is not valid JSON: {0}")]
    InvalidJson(String),
}
