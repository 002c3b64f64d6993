use std::{env, time::Duration};

use rocket::{
    Build, Rocket,
    fairing::{Fairing, Info, Kind},
};
use tokio::time;
use tracing::{debug, info, warn};

use crate::session::SessionStore;

fn env_secs(name: &str, default: u64) -> u64 {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or(default)
}

pub async fn start_cleanup_task(sessions: SessionStore) {
    let cleanup_interval_secs = env_secs("CLEANUP_INTERVAL_SECONDS", 60).max(1);
    let inactive_timeout_secs = env_secs("INACTIVE_GAME_TIMEOUT_SECONDS", 1800);
    let finished_timeout_secs = env_secs("FINISHED_GAME_TIMEOUT_SECONDS", 600);

    let mut interval = time::interval(Duration::from_secs(cleanup_interval_secs));

    info!(
        "Started session cleanup task: checking every {}s, inactive timeout: {}s, finished timeout: {}s",
        cleanup_interval_secs, inactive_timeout_secs, finished_timeout_secs
    );

    loop {
        interval.tick().await;
        cleanup_sessions(
            &sessions,
            Duration::from_secs(inactive_timeout_secs),
            Duration::from_secs(finished_timeout_secs),
        );
    }
}

pub fn cleanup_sessions(
    sessions: &SessionStore,
    inactive_timeout: Duration,
    finished_timeout: Duration,
) -> usize {
    // Collect first so no map shard stays locked while removing.
    let expired = sessions.expired(inactive_timeout, finished_timeout);

    let mut removed_count = 0;
    for id in expired {
        if sessions.remove_if_expired(&id, inactive_timeout, finished_timeout) {
            debug!("Cleaned up session: {}", id);
            removed_count += 1;
        }
    }

    if removed_count > 0 {
        info!("Cleaned up {} expired sessions", removed_count);
    }
    removed_count
}

pub struct CleanupFairing;

#[rocket::async_trait]
impl Fairing for CleanupFairing {
    fn info(&self) -> Info {
        Info {
            name: "Session Cleanup Task",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        if let Some(sessions) = rocket.state::<SessionStore>() {
            info!("Starting cleanup task for session management");
            let sessions_for_cleanup = sessions.clone();
            tokio::spawn(async move {
                start_cleanup_task(sessions_for_cleanup).await;
            });
        } else {
            warn!("Failed to get session store for cleanup task");
        }
        Ok(rocket)
    }
}
