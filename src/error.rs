use blackhole_common::protocol::ErrorResponse;
use rocket::{
    Request,
    http::Status,
    response::{self, Responder},
    serde::json::Json,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid board: {rows}x{cols} with {black_holes} black holes")]
    InvalidDimensions {
        rows: i64,
        cols: i64,
        black_holes: i64,
    },
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfBounds {
        row: i64,
        col: i64,
        rows: usize,
        cols: usize,
    },
    #[error("game session not found")]
    SessionNotFound,
    #[error("the board can only be revealed once the game has ended")]
    GameInProgress,
}

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("too many games created, try again later")]
    RateLimited,
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::Game(GameError::InvalidDimensions { .. })
            | ApiError::Game(GameError::OutOfBounds { .. }) => Status::BadRequest,
            ApiError::Game(GameError::SessionNotFound) => Status::NotFound,
            ApiError::Game(GameError::GameInProgress) => Status::Conflict,
            ApiError::RateLimited => Status::TooManyRequests,
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (self.status(), body).respond_to(request)
    }
}
