use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell as the view layer sees it.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub is_open: bool,
    pub is_disabled: bool,
    pub is_black_hole: bool,
    pub number_neighborhood_black_hole: u8,
}

/// Game progress. Encoded on the wire as `0`, `1` or `2`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(into = "u8", try_from = "u8")]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        self != GameStatus::InProgress
    }
}

impl From<GameStatus> for u8 {
    fn from(value: GameStatus) -> Self {
        match value {
            GameStatus::InProgress => 0,
            GameStatus::Won => 1,
            GameStatus::Lost => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownStatus(pub u8);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown game status {}", self.0)
    }
}

impl TryFrom<u8> for GameStatus {
    type Error = UnknownStatus;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GameStatus::InProgress),
            1 => Ok(GameStatus::Won),
            2 => Ok(GameStatus::Lost),
            other => Err(UnknownStatus(other)),
        }
    }
}
