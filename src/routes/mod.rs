use std::env;

use blackhole_common::protocol::{CellRequest, ErrorResponse, GameResponse, NewGameRequest};
use rocket::{
    Request, Responder, State, catch, get,
    http::{Cookie, CookieJar, Header, SameSite, Status},
    post,
    request::{self, FromRequest},
    serde::json::Json,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{ApiError, GameError},
    logic::Game,
    rate_limit::{ClientIp, RateLimiter, check_rate_limit},
    session::{SessionHandle, SessionStore},
    view,
};

pub const SESSION_COOKIE: &str = "session_id";
pub const SESSION_HEADER: &str = "X-Session-Id";

/// Session id from the `X-Session-Id` header, falling back to the session cookie.
#[derive(Debug)]
pub struct SessionKey(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionKey {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let key = req
            .headers()
            .get_one(SESSION_HEADER)
            .map(str::to_string)
            .or_else(|| {
                req.cookies()
                    .get(SESSION_COOKIE)
                    .map(|cookie| cookie.value().to_string())
            })
            .filter(|key| !key.is_empty());

        match key {
            Some(key) => request::Outcome::Success(SessionKey(key)),
            None => request::Outcome::Forward(Status::NotFound),
        }
    }
}

/// Game response for `newGame`, carrying the session id in `X-Session-Id`
/// so header based clients learn which session the game lives in.
#[derive(Responder)]
pub struct NewGameResponder {
    inner: Json<GameResponse>,
    session: Header<'static>,
}

impl NewGameResponder {
    fn new(response: GameResponse, id: String) -> Self {
        Self {
            inner: Json(response),
            session: Header::new(SESSION_HEADER, id),
        }
    }
}

fn max_board_cells() -> usize {
    env::var("MAX_BOARD_CELLS")
        .unwrap_or_else(|_| "10000".to_string())
        .parse()
        .unwrap_or(10_000)
}

fn board_params(params: &NewGameRequest) -> Result<(usize, usize, usize), GameError> {
    let invalid = || GameError::InvalidDimensions {
        rows: params.n,
        cols: params.m,
        black_holes: params.number_black_holes,
    };

    let rows = usize::try_from(params.n).map_err(|_| invalid())?;
    let cols = usize::try_from(params.m).map_err(|_| invalid())?;
    let black_holes = usize::try_from(params.number_black_holes).map_err(|_| invalid())?;

    if rows.saturating_mul(cols) > max_board_cells() {
        warn!(
            "Rejecting {}x{} board, limit is {} cells",
            rows,
            cols,
            max_board_cells()
        );
        return Err(invalid());
    }

    Ok((rows, cols, black_holes))
}

fn position(cell: &CellRequest, game: &Game) -> Result<(usize, usize), GameError> {
    match (usize::try_from(cell.n), usize::try_from(cell.m)) {
        (Ok(row), Ok(col)) => Ok((row, col)),
        _ => Err(GameError::OutOfBounds {
            row: cell.n,
            col: cell.m,
            rows: game.rows(),
            cols: game.cols(),
        }),
    }
}

fn session_handle(sessions: &SessionStore, key: Option<SessionKey>) -> Result<SessionHandle, GameError> {
    let Some(SessionKey(id)) = key else {
        debug!("Request without session id");
        return Err(GameError::SessionNotFound);
    };
    sessions
        .get(&id)
        .inspect_err(|_| warn!("Request for non-existent session: {}", id))
}

#[post("/newGame", data = "<params>")]
#[instrument(level = "trace", skip_all, fields(client_ip = %client_ip.0, n = params.n, m = params.m, black_holes = params.number_black_holes))]
pub async fn new_game(
    params: Json<NewGameRequest>,
    sessions: &State<SessionStore>,
    rate_limiter: &State<RateLimiter>,
    client_ip: ClientIp,
    session: Option<SessionKey>,
    cookies: &CookieJar<'_>,
) -> Result<NewGameResponder, ApiError> {
    info!(
        "Game creation request from {}: {}x{} with {} black holes",
        client_ip.0, params.n, params.m, params.number_black_holes
    );

    if let Err(error) = check_rate_limit(rate_limiter, &client_ip) {
        warn!("Rate limit exceeded for client {}", client_ip.0);
        return Err(error);
    }

    let (rows, cols, black_holes) = board_params(&params)?;
    let game = Game::new(rows, cols, black_holes)?;

    if let Some(SessionKey(id)) = &session
        && let Ok(handle) = sessions.get(id)
    {
        let mut session = handle.lock().await;
        session.replace(game);
        info!("Started new game in session {}", id);
        return Ok(NewGameResponder::new(
            view::response(session.game()),
            id.clone(),
        ));
    }

    if let Some(SessionKey(stale)) = &session {
        debug!("Unknown session {}, starting a fresh one", stale);
    }

    let response = view::response(&game);
    let id = sessions.create(game);
    cookies.add(
        Cookie::build((SESSION_COOKIE, id.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    );

    info!("Created session {} for client {}", id, client_ip.0);
    Ok(NewGameResponder::new(response, id))
}

#[post("/openCell", data = "<cell>")]
#[instrument(level = "trace", skip_all, fields(n = cell.n, m = cell.m))]
pub async fn open_cell(
    cell: Json<CellRequest>,
    sessions: &State<SessionStore>,
    session: Option<SessionKey>,
) -> Result<Json<GameResponse>, ApiError> {
    let handle = session_handle(sessions, session)?;
    let mut session = handle.lock().await;

    let (row, col) = position(&cell, session.game())?;
    let status = session.update(|game| game.open_cell(row, col))?;
    debug!("Opened ({}, {}), status now {:?}", row, col, status);

    Ok(Json(view::response(session.game())))
}

#[post("/disabledEnabledCell", data = "<cell>")]
#[instrument(level = "trace", skip_all, fields(n = cell.n, m = cell.m))]
pub async fn disabled_enabled_cell(
    cell: Json<CellRequest>,
    sessions: &State<SessionStore>,
    session: Option<SessionKey>,
) -> Result<Json<GameResponse>, ApiError> {
    let handle = session_handle(sessions, session)?;
    let mut session = handle.lock().await;

    let (row, col) = position(&cell, session.game())?;
    session.update(|game| game.toggle_disabled(row, col))?;
    debug!("Toggled disabled flag of ({}, {})", row, col);

    Ok(Json(view::response(session.game())))
}

#[get("/state")]
#[instrument(level = "trace", skip_all)]
pub async fn game_state(
    sessions: &State<SessionStore>,
    session: Option<SessionKey>,
) -> Result<Json<GameResponse>, ApiError> {
    let handle = session_handle(sessions, session)?;
    let session = handle.lock().await;
    Ok(Json(view::response(session.game())))
}

#[get("/revealAll")]
#[instrument(level = "trace", skip_all)]
pub async fn reveal_all(
    sessions: &State<SessionStore>,
    session: Option<SessionKey>,
) -> Result<Json<GameResponse>, ApiError> {
    let handle = session_handle(sessions, session)?;
    let session = handle.lock().await;

    if !session.game().status().is_terminal() {
        debug!("Refusing to reveal a game in progress");
        return Err(GameError::GameInProgress.into());
    }

    Ok(Json(view::revealed_response(session.game())))
}

#[catch(default)]
pub fn default_catcher(status: Status, _req: &Request<'_>) -> (Status, Json<ErrorResponse>) {
    let error = status.reason().unwrap_or("unknown error").to_string();
    (status, Json(ErrorResponse { error }))
}
