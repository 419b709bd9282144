use saferoute_core::{Cell, CellKind};
use saferoute_grid::OccupancyGrid;

const FREE: char = '.';
const WALL: char = '#';
const HAZARD: char = '!';
const ROUTE: char = '*';
const START: char = 'S';
const GOAL: char = 'G';

/// Draws the grid as text, one line per row, with an optional route on top.
///
/// Endpoints outside the grid are skipped.
pub(crate) fn render_grid(
    grid: &OccupancyGrid,
    route: &[Cell],
    start: Option<Cell>,
    goal: Option<Cell>,
) -> String {
    let mut canvas: Vec<Vec<char>> = grid
        .cells()
        .chunks(grid.columns().max(1))
        .map(|row| row.iter().copied().map(glyph).collect())
        .collect();

    let mut mark = |cell: Cell, symbol: char| {
        if let Some(slot) = canvas
            .get_mut(cell.row() as usize)
            .and_then(|row| row.get_mut(cell.column() as usize))
        {
            *slot = symbol;
        }
    };
    for cell in route {
        mark(*cell, ROUTE);
    }
    if let Some(start) = start {
        mark(start, START);
    }
    if let Some(goal) = goal {
        mark(goal, GOAL);
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn glyph(kind: CellKind) -> char {
    match kind {
        CellKind::Free => FREE,
        CellKind::Wall => WALL,
        CellKind::Hazard => HAZARD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saferoute_grid::normalize;

    #[test]
    fn draws_cells_route_and_endpoints() {
        let grid = normalize(&[vec![0_i64, 0, 0], vec![1, 2, 0]]).expect("valid grid");
        let route = [Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2), Cell::new(1, 2)];

        let text = render_grid(&grid, &route, Some(Cell::new(0, 0)), Some(Cell::new(1, 2)));

        assert_eq!(text, "S**\n#!G");
    }

    #[test]
    fn bare_grid_has_no_overlay() {
        let grid = normalize(&[vec![0_i64, 1], vec![2, 0]]).expect("valid grid");
        assert_eq!(render_grid(&grid, &[], None, None), ".#\n!.");
    }

    #[test]
    fn endpoints_outside_the_grid_are_ignored() {
        let grid = normalize(&[vec![0_i64]]).expect("valid grid");
        assert_eq!(
            render_grid(&grid, &[], Some(Cell::new(3, 3)), Some(Cell::new(0, 0))),
            "G"
        );
    }
}
