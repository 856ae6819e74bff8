//! Evicts sessions that have been idle too long.

use std::sync::Arc;

use chrono::Duration;
use shared::Clock;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::services::session_store::SessionStore;

pub struct Janitor {
    sessions: Arc<SessionStore>,
    clock: Arc<dyn Clock>,
    max_idle: Duration,
    poll: std::time::Duration,
}

impl Janitor {
    pub fn new(
        sessions: Arc<SessionStore>,
        clock: Arc<dyn Clock>,
        max_idle: Duration,
        poll: std::time::Duration,
    ) -> Self {
        Self {
            sessions,
            clock,
            max_idle,
            poll,
        }
    }

    pub async fn run(self, shutdown: CancellationToken) {
        info!("Session janitor started (every {:?}, max idle {})", self.poll, self.max_idle);
        let mut ticker = tokio::time::interval(self.poll);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Session janitor stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep().await;
                }
            }
        }
    }

    pub async fn sweep(&self) -> Vec<i64> {
        let evicted = self
            .sessions
            .sweep_expired(self.clock.now(), self.max_idle)
            .await;
        for user_id in &evicted {
            info!("Evicted idle session for user {}", user_id);
        }
        if !evicted.is_empty() {
            info!("{} sessions still active", self.sessions.len().await);
        }
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use shared::ManualClock;

    #[tokio::test]
    async fn test_sweep_uses_seven_day_threshold() {
        let t0 = DateTime::parse_from_rfc3339("2024-03-04T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let clock = Arc::new(ManualClock::new(t0));
        let sessions = Arc::new(SessionStore::new());
        let janitor = Janitor::new(
            sessions.clone(),
            clock.clone(),
            Duration::days(7),
            std::time::Duration::from_secs(3600),
        );

        sessions.get_or_create(1, 1, t0).await;
        sessions.get_or_create(2, 2, t0 + Duration::days(2)).await;

        clock.set(t0 + Duration::days(8));
        assert_eq!(janitor.sweep().await, vec![1]);
        assert!(sessions.get(2).await.is_some());
        assert!(janitor.sweep().await.is_empty());
    }
}
