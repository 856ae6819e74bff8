//! Per-user signal cooldown and the watcher that announces its end.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use shared::Clock;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::commands::menu::category_keyboard;
use crate::i18n;
use crate::services::delivery::Messenger;
use crate::services::session_store::{Session, SessionStore};

#[derive(Debug, Clone, Copy)]
pub struct CooldownPolicy {
    window: Duration,
}

impl CooldownPolicy {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn can_request(&self, session: &Session, now: DateTime<Utc>) -> bool {
        self.remaining(session, now).is_none()
    }

    /// Time left before the next request is allowed, if any.
    pub fn remaining(&self, session: &Session, now: DateTime<Utc>) -> Option<Duration> {
        let elapsed = now - session.last_signal_at?;
        (elapsed < self.window).then(|| self.window - elapsed)
    }

    /// Record an accepted request. Call under the same lock as the check.
    pub fn accept(&self, session: &mut Session, now: DateTime<Utc>) {
        session.last_signal_at = Some(now);
        session.cooldown_notified = false;
    }
}

/// Periodically tells users their cooldown is over.
pub struct CooldownWatcher {
    sessions: Arc<SessionStore>,
    messenger: Arc<Messenger>,
    clock: Arc<dyn Clock>,
    policy: CooldownPolicy,
    poll: std::time::Duration,
}

impl CooldownWatcher {
    pub fn new(
        sessions: Arc<SessionStore>,
        messenger: Arc<Messenger>,
        clock: Arc<dyn Clock>,
        policy: CooldownPolicy,
        poll: std::time::Duration,
    ) -> Self {
        Self {
            sessions,
            messenger,
            clock,
            policy,
            poll,
        }
    }

    pub async fn run(self, shutdown: CancellationToken) {
        info!("Cooldown watcher started (every {:?})", self.poll);
        let mut ticker = tokio::time::interval(self.poll);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Cooldown watcher stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// One pass. Returns how many sessions were marked notified.
    pub async fn tick(&self) -> usize {
        let notices = self
            .sessions
            .cooldown_expired(self.clock.now(), self.policy.window())
            .await;

        let mut notified = 0;
        for notice in notices {
            let text = i18n::text(notice.language, "cooldown_ended");
            // Best effort: a failed send is logged by the messenger and still counts as notified.
            self.messenger
                .send_text(notice.chat_id, &text, &category_keyboard(notice.language))
                .await;
            if self
                .sessions
                .mark_cooldown_notified(notice.user_id, notice.signal_at)
                .await
            {
                notified += 1;
            } else {
                debug!("User {} requested again before the notice was recorded", notice.user_id);
            }
        }
        notified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::delivery::testing::RecordingTransport;
    use shared::{Language, ManualClock};

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-04T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_window_boundaries() {
        let policy = CooldownPolicy::new(Duration::seconds(60));
        let mut session = Session::new(1, 1, t0());
        assert!(policy.can_request(&session, t0()));

        policy.accept(&mut session, t0());
        assert_eq!(session.last_signal_at, Some(t0()));
        assert!(!session.cooldown_notified);

        let at_30 = t0() + Duration::seconds(30);
        assert!(!policy.can_request(&session, at_30));
        assert_eq!(policy.remaining(&session, at_30).map(|d| d.num_seconds()), Some(30));

        // Fractional remainders truncate.
        let at_30_5 = t0() + Duration::milliseconds(30_500);
        assert_eq!(policy.remaining(&session, at_30_5).map(|d| d.num_seconds()), Some(29));

        assert!(policy.can_request(&session, t0() + Duration::seconds(60)));
        assert!(policy.can_request(&session, t0() + Duration::seconds(61)));
    }

    #[tokio::test]
    async fn test_watcher_notifies_once_in_session_language() {
        let clock = Arc::new(ManualClock::new(t0()));
        let sessions = Arc::new(SessionStore::new());
        let transport = Arc::new(RecordingTransport::default());
        let policy = CooldownPolicy::new(Duration::seconds(60));
        let watcher = CooldownWatcher::new(
            sessions.clone(),
            Arc::new(Messenger::new(transport.clone())),
            clock.clone(),
            policy,
            std::time::Duration::from_secs(10),
        );

        sessions
            .with_session(5, 50, t0(), |s| {
                s.language = Language::Ru;
                policy.accept(s, t0());
            })
            .await;

        clock.advance(Duration::seconds(30));
        assert_eq!(watcher.tick().await, 0);
        assert!(transport.sent().is_empty());

        clock.advance(Duration::seconds(40));
        assert_eq!(watcher.tick().await, 1);
        assert_eq!(transport.texts(), vec![i18n::text(Language::Ru, "cooldown_ended")]);

        clock.advance(Duration::seconds(10));
        assert_eq!(watcher.tick().await, 0);
        assert_eq!(transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let watcher = CooldownWatcher::new(
            Arc::new(SessionStore::new()),
            Arc::new(Messenger::new(Arc::new(RecordingTransport::default()))),
            Arc::new(ManualClock::new(t0())),
            CooldownPolicy::new(Duration::seconds(60)),
            std::time::Duration::from_secs(10),
        );
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(watcher.run(shutdown.clone()));
        shutdown.cancel();
        handle.await.unwrap();
    }
}
