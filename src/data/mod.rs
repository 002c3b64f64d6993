use crate::error::{GameError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Closed,
    Disabled,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub(crate) black_hole: bool,
    pub(crate) adjacent: u8,
    pub(crate) state: CellState,
}

impl Cell {
    pub fn is_black_hole(&self) -> bool {
        self.black_hole
    }

    pub fn adjacent(&self) -> u8 {
        self.adjacent
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == CellState::Open
    }

    pub fn is_disabled(&self) -> bool {
        self.state == CellState::Disabled
    }
}

/// Row-major board. Dimensions and black hole layout are fixed once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    black_holes: usize,
    cells: Vec<Cell>,
}

/// Positions of the up to eight cells surrounding `(row, col)`, clipped at the edges.
pub fn neighbors(
    rows: usize,
    cols: usize,
    row: usize,
    col: usize,
) -> impl Iterator<Item = (usize, usize)> {
    (-1isize..=1)
        .flat_map(|dr| (-1isize..=1).map(move |dc| (dr, dc)))
        .filter(|&(dr, dc)| dr != 0 || dc != 0)
        .filter_map(move |(dr, dc)| {
            let r = row.checked_add_signed(dr)?;
            let c = col.checked_add_signed(dc)?;
            (r < rows && c < cols).then_some((r, c))
        })
}

impl Grid {
    /// Builds a grid from a row-major black hole mask and computes every adjacency count.
    pub(crate) fn from_mask(rows: usize, cols: usize, mask: &[bool]) -> Self {
        debug_assert_eq!(mask.len(), rows * cols);

        let cells = mask
            .iter()
            .enumerate()
            .map(|(i, &black_hole)| {
                let (row, col) = (i / cols, i % cols);
                let adjacent = neighbors(rows, cols, row, col)
                    .filter(|&(r, c)| mask[r * cols + c])
                    .count() as u8;
                Cell {
                    black_hole,
                    adjacent,
                    state: CellState::Closed,
                }
            })
            .collect();

        Self {
            rows,
            cols,
            black_holes: mask.iter().filter(|&&b| b).count(),
            cells,
        }
    }

    /// Builds a grid with black holes at exactly the given positions. Duplicates collapse.
    pub fn with_black_holes(rows: usize, cols: usize, positions: &[(usize, usize)]) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidDimensions {
                rows: rows as i64,
                cols: cols as i64,
                black_holes: positions.len() as i64,
            });
        }

        let mut mask = vec![false; rows * cols];
        for &(row, col) in positions {
            if row >= rows || col >= cols {
                return Err(GameError::OutOfBounds {
                    row: row as i64,
                    col: col as i64,
                    rows,
                    cols,
                });
            }
            mask[row * cols + col] = true;
        }

        Ok(Self::from_mask(rows, cols, &mask))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn black_holes(&self) -> usize {
        self.black_holes
    }

    pub fn safe_cells(&self) -> usize {
        self.cells.len() - self.black_holes
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.contains(row, col)
            .then(|| &self.cells[row * self.cols + col])
    }

    pub(crate) fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        if self.contains(row, col) {
            Some(&mut self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols)
    }
}
