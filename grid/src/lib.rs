#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid classification for SafeRoute.
//!
//! Raw rectangular arrays of cell codes enter through [`normalize`], which
//! rejects malformed input and classifies every cell as free, wall or hazard.
//! The resulting [`OccupancyGrid`] derives the per-request [`WalkabilityMask`]
//! consumed by enumeration and the [`HazardSet`] consumed by risk scoring.

mod mask;

use log::debug;
use saferoute_core::{Cell, CellKind, Direction, GridStats, MalformedInputError};

pub use mask::WalkabilityMask;

/// Value that can be read as a raw integer cell code.
///
/// Returning `None` marks the value as non-numeric, which rejects the whole
/// grid as malformed input.
pub trait RawCellValue {
    /// Integer code carried by the value, if it has one.
    fn code(&self) -> Option<i64>;
}

impl RawCellValue for i64 {
    fn code(&self) -> Option<i64> {
        Some(*self)
    }
}

impl RawCellValue for i32 {
    fn code(&self) -> Option<i64> {
        Some(i64::from(*self))
    }
}

impl RawCellValue for u32 {
    fn code(&self) -> Option<i64> {
        Some(i64::from(*self))
    }
}

impl RawCellValue for u8 {
    fn code(&self) -> Option<i64> {
        Some(i64::from(*self))
    }
}

impl RawCellValue for CellKind {
    fn code(&self) -> Option<i64> {
        Some(CellKind::code(*self))
    }
}

/// Validates a raw rectangular grid and classifies each of its cells.
///
/// Every row must match the length of the first row and every value must be
/// readable as an integer. Codes other than wall and hazard classify as free.
/// The input is never mutated.
pub fn normalize<T>(rows: &[Vec<T>]) -> Result<OccupancyGrid, MalformedInputError>
where
    T: RawCellValue,
{
    let first = rows.first().ok_or(MalformedInputError::EmptyGrid)?;
    let columns = first.len();
    if columns == 0 {
        return Err(MalformedInputError::EmptyRow);
    }

    let mut cells = Vec::with_capacity(rows.len().saturating_mul(columns));
    for (row_index, row) in rows.iter().enumerate() {
        if row.len() != columns {
            return Err(MalformedInputError::JaggedRow {
                row: row_index,
                expected: columns,
                found: row.len(),
            });
        }

        for (column_index, value) in row.iter().enumerate() {
            let code = value.code().ok_or(MalformedInputError::NonNumericCell {
                row: row_index,
                column: column_index,
            })?;
            cells.push(CellKind::from_code(code));
        }
    }

    let grid = OccupancyGrid {
        rows: rows.len(),
        columns,
        cells,
    };
    let stats = grid.stats();
    debug!(
        "normalized grid: {}x{} with {} walls and {} hazards",
        stats.rows, stats.columns, stats.walls, stats.hazards
    );
    Ok(grid)
}

/// Rectangular grid of classified cells stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    rows: usize,
    columns: usize,
    cells: Vec<CellKind>,
}

impl OccupancyGrid {
    /// Number of rows in the grid.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Classified cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellKind] {
        &self.cells
    }

    /// Reports whether the cell lies within the grid.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        index(self.rows, self.columns, cell).is_some()
    }

    /// Classification of the provided cell, if it lies within the grid.
    #[must_use]
    pub fn kind(&self, cell: Cell) -> Option<CellKind> {
        index(self.rows, self.columns, cell).and_then(|offset| self.cells.get(offset).copied())
    }

    /// Iterator over every cell and its classification in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, CellKind)> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(offset, kind)| cell_at(columns, offset).map(|cell| (cell, *kind)))
    }

    /// Derives the traversable cells for a request.
    ///
    /// Walls are always blocked; hazards are blocked only in strict mode.
    #[must_use]
    pub fn walkability(&self, strict_hazard: bool) -> WalkabilityMask {
        let cells = self
            .cells
            .iter()
            .map(|kind| match kind {
                CellKind::Free => true,
                CellKind::Wall => false,
                CellKind::Hazard => !strict_hazard,
            })
            .collect();
        WalkabilityMask::from_parts(self.rows, self.columns, cells)
    }

    /// Collects the hazard cells in row-major order.
    #[must_use]
    pub fn hazards(&self) -> HazardSet {
        HazardSet::from_cells(
            self.iter()
                .filter(|(_, kind)| *kind == CellKind::Hazard)
                .map(|(cell, _)| cell)
                .collect(),
        )
    }

    /// Counts walls and hazards alongside the grid dimensions.
    #[must_use]
    pub fn stats(&self) -> GridStats {
        let mut stats = GridStats {
            rows: self.rows,
            columns: self.columns,
            walls: 0,
            hazards: 0,
        };

        for kind in &self.cells {
            match kind {
                CellKind::Wall => stats.walls += 1,
                CellKind::Hazard => stats.hazards += 1,
                CellKind::Free => {}
            }
        }

        stats
    }

    /// Reports whether both endpoints lie within the grid and neither is a wall.
    ///
    /// A `false` answer means no route can exist; callers treat it as an empty
    /// result rather than an error.
    #[must_use]
    pub fn endpoints_usable(&self, start: Cell, goal: Cell) -> bool {
        [start, goal]
            .into_iter()
            .all(|cell| matches!(self.kind(cell), Some(kind) if kind != CellKind::Wall))
    }
}

/// Hazard cells extracted from a grid.
///
/// Order only affects which equally-near hazard is found first during risk
/// scoring, never the resulting distance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HazardSet {
    cells: Vec<Cell>,
}

impl HazardSet {
    /// Wraps the provided hazard cells.
    #[must_use]
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Hazard cells in discovery order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of hazards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the grid contained no hazards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Orthogonal in-bounds neighbours of a cell in North, East, South, West order.
pub fn neighbors(cell: Cell, rows: usize, columns: usize) -> impl Iterator<Item = Cell> {
    Direction::ALL
        .into_iter()
        .filter_map(move |direction| cell.step(direction))
        .filter(move |neighbor| index(rows, columns, *neighbor).is_some())
}

pub(crate) fn index(rows: usize, columns: usize, cell: Cell) -> Option<usize> {
    let row = usize::try_from(cell.row()).ok()?;
    let column = usize::try_from(cell.column()).ok()?;
    if row >= rows || column >= columns {
        return None;
    }
    row.checked_mul(columns)?.checked_add(column)
}

fn cell_at(columns: usize, offset: usize) -> Option<Cell> {
    let row = u32::try_from(offset.checked_div(columns)?).ok()?;
    let column = u32::try_from(offset % columns).ok()?;
    Some(Cell::new(row, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Text(&'static str);

    impl RawCellValue for Text {
        fn code(&self) -> Option<i64> {
            self.0.trim().parse().ok()
        }
    }

    #[test]
    fn normalize_classifies_codes_and_counts_stats() {
        let grid = normalize(&[vec![0_i64, 1, 2], vec![7, 0, 1]]).expect("rectangular grid");

        assert_eq!(grid.kind(Cell::new(0, 1)), Some(CellKind::Wall));
        assert_eq!(grid.kind(Cell::new(0, 2)), Some(CellKind::Hazard));
        assert_eq!(grid.kind(Cell::new(1, 0)), Some(CellKind::Free));
        assert_eq!(
            grid.stats(),
            GridStats {
                rows: 2,
                columns: 3,
                walls: 2,
                hazards: 1,
            }
        );
    }

    #[test]
    fn normalize_rejects_jagged_rows() {
        let rows = vec![vec![0_i64, 0, 0], vec![0, 0]];
        assert_eq!(
            normalize(&rows),
            Err(MalformedInputError::JaggedRow {
                row: 1,
                expected: 3,
                found: 2,
            })
        );

        let longer = vec![vec![0_i64], vec![0, 0]];
        assert!(matches!(
            normalize(&longer),
            Err(MalformedInputError::JaggedRow { row: 1, .. })
        ));
    }

    #[test]
    fn normalize_rejects_degenerate_grids() {
        let empty: Vec<Vec<i64>> = Vec::new();
        assert_eq!(normalize(&empty), Err(MalformedInputError::EmptyGrid));

        let empty_row: Vec<Vec<i64>> = vec![Vec::new()];
        assert_eq!(normalize(&empty_row), Err(MalformedInputError::EmptyRow));
    }

    #[test]
    fn normalize_rejects_non_numeric_cells() {
        let rows = vec![vec![Text("0"), Text(" 1 ")], vec![Text("x"), Text("2")]];
        assert_eq!(
            normalize(&rows),
            Err(MalformedInputError::NonNumericCell { row: 1, column: 0 })
        );
    }

    #[test]
    fn walkability_blocks_hazards_only_in_strict_mode() {
        let grid = normalize(&[vec![0_i64, 1, 2]]).expect("grid");

        let relaxed = grid.walkability(false);
        assert!(relaxed.is_walkable(Cell::new(0, 0)));
        assert!(!relaxed.is_walkable(Cell::new(0, 1)));
        assert!(relaxed.is_walkable(Cell::new(0, 2)));

        let strict = grid.walkability(true);
        assert!(!strict.is_walkable(Cell::new(0, 2)));
    }

    #[test]
    fn hazards_are_listed_in_row_major_order() {
        let grid = normalize(&[vec![2_i64, 0], vec![0, 2]]).expect("grid");
        assert_eq!(
            grid.hazards().cells(),
            &[Cell::new(0, 0), Cell::new(1, 1)]
        );
    }

    #[test]
    fn endpoints_must_be_in_bounds_and_not_walls() {
        let grid = normalize(&[vec![0_i64, 1], vec![2, 0]]).expect("grid");

        assert!(grid.endpoints_usable(Cell::new(0, 0), Cell::new(1, 1)));
        assert!(grid.endpoints_usable(Cell::new(1, 0), Cell::new(1, 1)));
        assert!(!grid.endpoints_usable(Cell::new(0, 0), Cell::new(0, 1)));
        assert!(!grid.endpoints_usable(Cell::new(0, 0), Cell::new(2, 0)));
    }

    #[test]
    fn neighbors_follow_fixed_order_and_respect_bounds() {
        let around_center: Vec<_> = neighbors(Cell::new(1, 1), 3, 3).collect();
        assert_eq!(
            around_center,
            vec![
                Cell::new(0, 1),
                Cell::new(1, 2),
                Cell::new(2, 1),
                Cell::new(1, 0),
            ]
        );

        let around_corner: Vec<_> = neighbors(Cell::new(0, 0), 3, 3).collect();
        assert_eq!(around_corner, vec![Cell::new(0, 1), Cell::new(1, 0)]);
    }
}
