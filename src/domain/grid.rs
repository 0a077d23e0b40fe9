/// Board geometry.
///
/// A `Cell` is a (column, row) pair. Coordinates are signed so that a
/// candidate head position can be computed *before* the bounds check —
/// the cell one step past an edge is representable, it is just not
/// inside the grid.
///
/// Collision bounds and food-spawn bounds are the same
/// `[0, cols) × [0, rows)` range. The renderer draws the board frame
/// outside the playable area, so every in-bounds cell is reachable.

use crate::domain::direction::Direction;

pub type Cell = (i32, i32);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
}

impl Grid {
    pub fn new(cols: i32, rows: i32) -> Self {
        Grid { cols, rows }
    }

    #[inline]
    pub fn contains(self, cell: Cell) -> bool {
        let (x, y) = cell;
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    /// The cell one step from `from` in `dir`. May lie outside the grid.
    #[inline]
    pub fn neighbor(self, from: Cell, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        (from.0 + dx, from.1 + dy)
    }

    /// Total number of cells, for the full-board (win) check.
    pub fn area(self) -> usize {
        (self.cols as usize) * (self.rows as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let g = Grid::new(10, 8);
        assert!(g.contains((0, 0)));
        assert!(g.contains((9, 7)));
        assert!(!g.contains((10, 7)));
        assert!(!g.contains((9, 8)));
        assert!(!g.contains((-1, 0)));
        assert!(!g.contains((0, -1)));
    }

    #[test]
    fn neighbor_can_leave_the_grid() {
        let g = Grid::new(10, 10);
        assert_eq!(g.neighbor((0, 5), Direction::Left), (-1, 5));
        assert_eq!(g.neighbor((9, 5), Direction::Right), (10, 5));
        assert!(!g.contains(g.neighbor((0, 0), Direction::Up)));
    }

    #[test]
    fn area_counts_all_cells() {
        assert_eq!(Grid::new(30, 20).area(), 600);
    }
}
