use serde::{Deserialize, Serialize};

use crate::models::{Cell, GameStatus};

/// Body of `POST /newGame`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct NewGameRequest {
    pub n: i64,
    pub m: i64,
    #[serde(alias = "numberMines")]
    pub number_black_holes: i64,
}

impl Default for NewGameRequest {
    fn default() -> Self {
        Self {
            n: 9,
            m: 9,
            number_black_holes: 10,
        }
    }
}

/// Body of `POST /openCell` and `POST /disabledEnabledCell`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct CellRequest {
    pub n: i64,
    pub m: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    pub n: usize,
    pub m: usize,
    pub numbers_black_holes: usize,
    pub cells: Vec<Vec<Cell>>,
    pub game_status: GameStatus,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_request_accepts_view_payload() {
        let request: NewGameRequest =
            serde_json::from_str(r#"{"n": 8, "m": 6, "numberBlackHoles": 5}"#).unwrap();
        assert_eq!(
            request,
            NewGameRequest {
                n: 8,
                m: 6,
                number_black_holes: 5
            }
        );
    }

    #[test]
    fn new_game_request_accepts_mine_alias_and_defaults() {
        let request: NewGameRequest = serde_json::from_str(r#"{"numberMines": 3}"#).unwrap();
        assert_eq!(request.n, 9);
        assert_eq!(request.m, 9);
        assert_eq!(request.number_black_holes, 3);
    }

    #[test]
    fn game_response_field_names() {
        let response = GameResponse {
            n: 1,
            m: 1,
            numbers_black_holes: 0,
            cells: vec![vec![Cell::default()]],
            game_status: GameStatus::Won,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["gameStatus"], 1);
        assert_eq!(json["numbersBlackHoles"], 0);
        assert_eq!(json["cells"][0][0]["isOpen"], false);
    }
}
