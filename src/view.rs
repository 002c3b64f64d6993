use blackhole_common::{
    models::{self, GameStatus},
    protocol::GameResponse,
};

use crate::{data::Cell, logic::Game};

/// Closed and disabled cells keep their contents hidden.
impl From<&Cell> for models::Cell {
    fn from(value: &Cell) -> Self {
        if value.is_open() {
            Self {
                is_open: true,
                is_disabled: false,
                is_black_hole: value.is_black_hole(),
                number_neighborhood_black_hole: value.adjacent(),
            }
        } else {
            Self {
                is_open: false,
                is_disabled: value.is_disabled(),
                is_black_hole: false,
                number_neighborhood_black_hole: 0,
            }
        }
    }
}

fn exposed(cell: &Cell) -> models::Cell {
    models::Cell {
        is_open: true,
        is_disabled: false,
        is_black_hole: cell.is_black_hole(),
        number_neighborhood_black_hole: cell.adjacent(),
    }
}

/// What the player may see. Once lost, every black hole is shown.
pub fn cells(game: &Game) -> Vec<Vec<models::Cell>> {
    let lost = game.status() == GameStatus::Lost;
    game.grid()
        .iter_rows()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    if lost && cell.is_black_hole() {
                        exposed(cell)
                    } else {
                        cell.into()
                    }
                })
                .collect()
        })
        .collect()
}

/// The whole board with nothing hidden.
pub fn revealed_cells(game: &Game) -> Vec<Vec<models::Cell>> {
    game.reveal_all()
        .map(|row| row.iter().map(exposed).collect())
        .collect()
}

fn response_with(game: &Game, cells: Vec<Vec<models::Cell>>) -> GameResponse {
    GameResponse {
        n: game.rows(),
        m: game.cols(),
        numbers_black_holes: game.black_holes(),
        cells,
        game_status: game.status(),
    }
}

pub fn response(game: &Game) -> GameResponse {
    response_with(game, cells(game))
}

pub fn revealed_response(game: &Game) -> GameResponse {
    response_with(game, revealed_cells(game))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Grid;

    fn game() -> Game {
        // * 1
        // 1 1
        Game::from_grid(Grid::with_black_holes(2, 2, &[(0, 0)]).unwrap())
    }

    #[test]
    fn closed_cells_are_redacted() {
        let mut game = game();
        game.set_disabled(0, 0, true).unwrap();
        game.open_cell(1, 1).unwrap();

        let cells = cells(&game);
        assert_eq!(
            cells[0][0],
            models::Cell {
                is_open: false,
                is_disabled: true,
                is_black_hole: false,
                number_neighborhood_black_hole: 0,
            }
        );
        assert_eq!(cells[0][1], models::Cell::default());
        assert_eq!(
            cells[1][1],
            models::Cell {
                is_open: true,
                is_disabled: false,
                is_black_hole: false,
                number_neighborhood_black_hole: 1,
            }
        );
    }

    #[test]
    fn lost_game_shows_black_holes() {
        let mut game = game();
        game.open_cell(0, 0).unwrap();
        assert_eq!(game.status(), GameStatus::Lost);

        let response = response(&game);
        assert_eq!(response.game_status, GameStatus::Lost);
        assert!(response.cells[0][0].is_open);
        assert!(response.cells[0][0].is_black_hole);
        assert!(!response.cells[1][0].is_open);
        assert_eq!(response.n, 2);
        assert_eq!(response.m, 2);
        assert_eq!(response.numbers_black_holes, 1);
    }

    #[test]
    fn lost_game_clears_disabled_flag_of_black_holes() {
        let mut game = Game::from_grid(Grid::with_black_holes(1, 3, &[(0, 0), (0, 2)]).unwrap());
        game.set_disabled(0, 2, true).unwrap();
        game.open_cell(0, 0).unwrap();

        let cells = cells(&game);
        assert!(cells[0][2].is_open);
        assert!(!cells[0][2].is_disabled);
        assert!(cells[0][2].is_black_hole);
        assert!(!cells[0][1].is_open);
        assert!(game.cell(0, 2).unwrap().is_disabled());
    }

    #[test]
    fn revealed_response_hides_nothing() {
        let game = game();
        let response = revealed_response(&game);
        assert_eq!(response.game_status, GameStatus::InProgress);
        assert!(response.cells.iter().flatten().all(|c| c.is_open));
        assert!(response.cells[0][0].is_black_hole);
        assert_eq!(response.cells[1][1].number_neighborhood_black_hole, 1);
    }
}
