use blackhole_common::models::GameStatus;
use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::{
    data::{Cell, CellState, Grid},
    error::{GameError, Result},
};

pub mod generate;
mod reveal;

/// One playthrough: the board, its progress and the number of safe cells opened so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    grid: Grid,
    status: GameStatus,
    opened_safe: usize,
}

impl Game {
    #[instrument(level = "trace")]
    pub fn new(rows: usize, cols: usize, black_holes: usize) -> Result<Self> {
        Self::with_rng(rows, cols, black_holes, &mut rand::rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        black_holes: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let grid = generate::generate(rows, cols, black_holes, rng)?;
        info!(
            "Creating new game: {}x{} with {} black holes",
            rows, cols, black_holes
        );
        Ok(Self::from_grid(grid))
    }

    pub fn from_grid(grid: Grid) -> Self {
        Self {
            grid,
            status: GameStatus::InProgress,
            opened_safe: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn black_holes(&self) -> usize {
        self.grid.black_holes()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn opened_safe(&self) -> usize {
        self.opened_safe
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.grid.cell(row, col)
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> GameError {
        GameError::OutOfBounds {
            row: row as i64,
            col: col as i64,
            rows: self.rows(),
            cols: self.cols(),
        }
    }

    fn has_won(&self) -> bool {
        self.opened_safe == self.grid.safe_cells()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn open_cell(&mut self, row: usize, col: usize) -> Result<GameStatus> {
        if !self.grid.contains(row, col) {
            warn!("Invalid open position: ({}, {})", row, col);
            return Err(self.out_of_bounds(row, col));
        }

        if self.status.is_terminal() {
            debug!("Ignoring open on finished game at ({}, {})", row, col);
            return Ok(self.status);
        }

        let Some(cell) = self.grid.cell_mut(row, col) else {
            return Err(self.out_of_bounds(row, col));
        };

        match cell.state {
            CellState::Open => {
                debug!("Ignoring open on open cell ({}, {})", row, col);
                return Ok(self.status);
            }
            CellState::Disabled => {
                debug!("Ignoring open on disabled cell ({}, {})", row, col);
                return Ok(self.status);
            }
            CellState::Closed => {}
        }

        cell.state = CellState::Open;

        if cell.black_hole {
            warn!("Player opened black hole at ({}, {}) - game over!", row, col);
            self.status = GameStatus::Lost;
            return Ok(self.status);
        }

        self.opened_safe += 1;
        if cell.adjacent == 0 {
            let opened = reveal::cascade(&mut self.grid, row, col);
            self.opened_safe += opened;
            debug!("Cascade from ({}, {}) opened {} cells", row, col, opened);
        }

        if self.has_won() {
            info!("Game won! All safe cells opened.");
            self.status = GameStatus::Won;
        }

        Ok(self.status)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn set_disabled(&mut self, row: usize, col: usize, disabled: bool) -> Result<GameStatus> {
        if !self.grid.contains(row, col) {
            warn!("Invalid disable position: ({}, {})", row, col);
            return Err(self.out_of_bounds(row, col));
        }

        if self.status.is_terminal() {
            debug!("Ignoring disable on finished game at ({}, {})", row, col);
            return Ok(self.status);
        }

        let Some(cell) = self.grid.cell_mut(row, col) else {
            return Err(self.out_of_bounds(row, col));
        };

        if cell.state == CellState::Open {
            debug!("Ignoring disable on open cell ({}, {})", row, col);
            return Ok(self.status);
        }

        cell.state = if disabled {
            CellState::Disabled
        } else {
            CellState::Closed
        };
        debug!("Cell ({}, {}) disabled: {}", row, col, disabled);

        Ok(self.status)
    }

    /// Flips the disabled flag of a closed cell.
    pub fn toggle_disabled(&mut self, row: usize, col: usize) -> Result<GameStatus> {
        let disabled = self
            .grid
            .cell(row, col)
            .map(|cell| !cell.is_disabled())
            .ok_or_else(|| self.out_of_bounds(row, col))?;
        self.set_disabled(row, col, disabled)
    }

    /// Every cell with its true contents, whatever has been opened so far.
    pub fn reveal_all(&self) -> impl Iterator<Item = &[Cell]> {
        self.grid.iter_rows()
    }
}
