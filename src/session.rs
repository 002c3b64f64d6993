use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::{DashMap, Entry};
use nanoid::nanoid;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{GameError, Result},
    logic::Game,
};

/// Server side state for one player: the current game and when it was last touched.
#[derive(Debug)]
pub struct Session {
    game: Game,
    last_activity: Instant,
}

impl Session {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            last_activity: Instant::now(),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Runs a mutation against the game and records the activity.
    pub fn update<T>(&mut self, f: impl FnOnce(&mut Game) -> T) -> T {
        self.last_activity = Instant::now();
        f(&mut self.game)
    }

    pub fn replace(&mut self, game: Game) {
        self.game = game;
        self.last_activity = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }

    pub fn should_cleanup(&self, inactive_timeout: Duration, finished_timeout: Duration) -> bool {
        let idle = self.idle_for();
        if self.game.status().is_terminal() {
            idle >= finished_timeout
        } else {
            idle >= inactive_timeout
        }
    }
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Sessions keyed by id. Each session has its own lock, so games never wait on each other.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the game under a fresh id and returns the id.
    #[instrument(level = "trace", skip(self, game))]
    pub fn create(&self, game: Game) -> String {
        let mut id_length = 12;
        let max_attempts_per_length = 10;

        loop {
            for _ in 0..max_attempts_per_length {
                let id = nanoid!(id_length);
                match self.sessions.entry(id.clone()) {
                    Entry::Occupied(_) => {
                        debug!("Session ID collision, trying another: {}", id);
                        continue;
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(Arc::new(Mutex::new(Session::new(game))));
                        info!("Created new session with ID: {}", id);
                        return id;
                    }
                }
            }

            warn!(
                "Exhausted ID attempts at length {}, increasing to {}",
                id_length,
                id_length + 1
            );
            id_length += 1;
        }
    }

    /// Clones the session handle out so the map is never locked while the session is.
    pub fn get(&self, id: &str) -> Result<SessionHandle> {
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or(GameError::SessionNotFound)
    }

    #[instrument(level = "trace", skip(self, game))]
    pub async fn replace(&self, id: &str, game: Game) -> Result<()> {
        let session = self.get(id)?;
        session.lock().await.replace(game);
        debug!("Replaced game in session {}", id);
        Ok(())
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Removes the session only if it is still expired and unlocked at removal time.
    /// The check runs under the map's write lock, so no request can touch it in between.
    pub fn remove_if_expired(
        &self,
        id: &str,
        inactive_timeout: Duration,
        finished_timeout: Duration,
    ) -> bool {
        self.sessions
            .remove_if(id, |_, session| {
                session
                    .try_lock()
                    .is_ok_and(|session| session.should_cleanup(inactive_timeout, finished_timeout))
            })
            .is_some()
    }

    /// Ids of sessions that have expired. Sessions locked right now are in use and skipped.
    pub fn expired(&self, inactive_timeout: Duration, finished_timeout: Duration) -> Vec<String> {
        self.sessions
            .iter()
            .filter_map(|entry| {
                let session = entry.value().try_lock().ok()?;
                session
                    .should_cleanup(inactive_timeout, finished_timeout)
                    .then(|| entry.key().clone())
            })
            .collect()
    }
}
