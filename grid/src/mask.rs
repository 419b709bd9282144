//! Per-request traversability mask.

use saferoute_core::Cell;

use crate::{index, neighbors};

/// Dense boolean grid marking the cells a route may enter.
///
/// The mask mirrors the occupancy grid dimensions and is immutable once built,
/// so enumeration can read it without coordination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkabilityMask {
    rows: usize,
    columns: usize,
    cells: Vec<bool>,
}

impl WalkabilityMask {
    /// Builds a mask from row-major cells, if the cell count matches the dimensions.
    #[must_use]
    pub fn new(rows: usize, columns: usize, cells: Vec<bool>) -> Option<Self> {
        if rows.checked_mul(columns)? != cells.len() {
            return None;
        }

        Some(Self::from_parts(rows, columns, cells))
    }

    /// Builds a fully traversable mask.
    #[must_use]
    pub fn open(rows: usize, columns: usize) -> Self {
        Self::from_parts(rows, columns, vec![true; rows.saturating_mul(columns)])
    }

    pub(crate) fn from_parts(rows: usize, columns: usize, cells: Vec<bool>) -> Self {
        Self {
            rows,
            columns,
            cells,
        }
    }

    /// Number of rows covered by the mask.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns covered by the mask.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells covered by the mask.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Row-major offset of the cell, if it lies within the mask.
    #[must_use]
    pub fn index(&self, cell: Cell) -> Option<usize> {
        index(self.rows, self.columns, cell)
    }

    /// Reports whether the cell lies within the mask.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.index(cell).is_some()
    }

    /// Reports whether the cell lies within the mask and may be entered.
    #[must_use]
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.index(cell)
            .and_then(|offset| self.cells.get(offset).copied())
            .unwrap_or(false)
    }

    /// In-bounds orthogonal neighbours of the cell in North, East, South, West order.
    ///
    /// Blocked neighbours are included; callers filter with [`Self::is_walkable`].
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> {
        neighbors(cell, self.rows, self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_mismatched_cell_counts() {
        assert!(WalkabilityMask::new(2, 2, vec![true; 3]).is_none());
        assert!(WalkabilityMask::new(2, 2, vec![true; 4]).is_some());
    }

    #[test]
    fn out_of_bounds_cells_are_never_walkable() {
        let mask = WalkabilityMask::open(2, 3);
        assert!(mask.is_walkable(Cell::new(1, 2)));
        assert!(!mask.is_walkable(Cell::new(2, 0)));
        assert!(!mask.is_walkable(Cell::new(0, 3)));
        assert_eq!(mask.index(Cell::new(1, 2)), Some(5));
    }
}
