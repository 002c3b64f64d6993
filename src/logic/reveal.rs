use std::collections::VecDeque;

use crate::data::{CellState, Grid, neighbors};

/// Opens the connected zero region around an already opened `(row, col)`.
///
/// Cells are opened as they are discovered, so each enters the queue at most once.
/// Black holes, disabled cells and cells already open are never touched.
/// Returns the number of cells opened.
pub(crate) fn cascade(grid: &mut Grid, row: usize, col: usize) -> usize {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut opened = 0;
    let mut queue = VecDeque::from([(row, col)]);

    while let Some((row, col)) = queue.pop_front() {
        for (r, c) in neighbors(rows, cols, row, col) {
            let Some(cell) = grid.cell_mut(r, c) else {
                continue;
            };
            if cell.black_hole || cell.state != CellState::Closed {
                continue;
            }

            cell.state = CellState::Open;
            opened += 1;

            if cell.adjacent == 0 {
                queue.push_back((r, c));
            }
        }
    }

    opened
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(grid: &mut Grid, row: usize, col: usize) {
        grid.cell_mut(row, col).unwrap().state = CellState::Open;
    }

    #[test]
    fn opens_zero_region_and_its_border() {
        // . . .
        // . 1 1
        // . 1 *
        let mut grid = Grid::with_black_holes(3, 3, &[(2, 2)]).unwrap();
        open(&mut grid, 0, 0);

        assert_eq!(cascade(&mut grid, 0, 0), 7);
        for row in 0..3 {
            for col in 0..3 {
                let cell = grid.cell(row, col).unwrap();
                assert_eq!(cell.is_open(), (row, col) != (2, 2));
            }
        }
    }

    #[test]
    fn stops_at_numbered_cells() {
        // . 1 * 1 .
        let mut grid = Grid::with_black_holes(1, 5, &[(0, 2)]).unwrap();
        open(&mut grid, 0, 0);

        assert_eq!(cascade(&mut grid, 0, 0), 1);
        assert!(grid.cell(0, 1).unwrap().is_open());
        assert!(!grid.cell(0, 2).unwrap().is_open());
        assert!(!grid.cell(0, 3).unwrap().is_open());
        assert!(!grid.cell(0, 4).unwrap().is_open());
    }

    #[test]
    fn disabled_cells_are_walls() {
        let mut grid = Grid::with_black_holes(1, 5, &[]).unwrap();
        grid.cell_mut(0, 2).unwrap().state = CellState::Disabled;
        open(&mut grid, 0, 0);

        assert_eq!(cascade(&mut grid, 0, 0), 1);
        assert!(grid.cell(0, 1).unwrap().is_open());
        assert!(grid.cell(0, 2).unwrap().is_disabled());
        assert!(!grid.cell(0, 3).unwrap().is_open());
        assert!(!grid.cell(0, 4).unwrap().is_open());
    }

    #[test]
    fn large_empty_board_does_not_recurse() {
        let mut grid = Grid::with_black_holes(300, 300, &[]).unwrap();
        open(&mut grid, 150, 150);

        assert_eq!(cascade(&mut grid, 150, 150), 300 * 300 - 1);
        assert!(grid.cells().iter().all(|c| c.is_open()));
    }
}
