use rocket::{Build, Rocket, catchers, routes};
use tracing::info;

pub mod cleanup;
pub mod cors;
pub mod data;
pub mod error;
pub mod logic;
pub mod rate_limit;
pub mod routes;
pub mod session;
pub mod view;

use crate::{
    cleanup::CleanupFairing,
    cors::create_cors,
    rate_limit::{TrustProxyHeaders, create_rate_limiter},
    routes::{
        default_catcher, disabled_enabled_cell, game_state, new_game, open_cell, reveal_all,
    },
    session::SessionStore,
};

/// Assembles the server: session store, rate limiter, CORS, cleanup task and routes.
pub fn build() -> Result<Rocket<Build>, rocket_cors::Error> {
    let sessions = SessionStore::new();
    let rate_limiter = create_rate_limiter();
    let trust_proxy = TrustProxyHeaders::from_env();

    info!(
        "📊 Initialized session store and rate limiter (trusting proxy headers: {})",
        trust_proxy.0
    );

    let rocket = rocket::build()
        .attach(create_cors()?)
        .attach(CleanupFairing)
        .manage(sessions)
        .manage(rate_limiter)
        .manage(trust_proxy)
        .mount(
            "/",
            routes![
                new_game,
                open_cell,
                disabled_enabled_cell,
                game_state,
                reveal_all
            ],
        )
        .register("/", catchers![default_catcher]);

    info!("🌐 Server configured with CORS, cleanup task, and routes");
    info!(
        "📡 Endpoints: POST /newGame, POST /openCell, POST /disabledEnabledCell, GET /state, GET /revealAll"
    );

    Ok(rocket)
}
