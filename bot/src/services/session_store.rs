//! In-memory per-user sessions.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use shared::{Category, Language};
use tokio::sync::RwLock;
use tracing::debug;

use crate::state::BotState;

/// Everything the bot remembers about one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: i64,
    /// Last chat the user wrote from; cooldown notices go here.
    pub chat_id: i64,
    pub language: Language,
    pub state: BotState,
    pub category: Option<Category>,
    pub asset: Option<&'static str>,
    pub last_activity: DateTime<Utc>,
    pub last_signal_at: Option<DateTime<Utc>>,
    pub cooldown_notified: bool,
}

impl Session {
    pub fn new(user_id: i64, chat_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            chat_id,
            language: Language::default(),
            state: BotState::default(),
            category: None,
            asset: None,
            last_activity: now,
            last_signal_at: None,
            cooldown_notified: false,
        }
    }

    /// Stamp activity. Older stamps are ignored so `last_activity` never moves back.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.last_activity {
            self.last_activity = now;
        }
    }

    /// Back to the language picker. Language and cooldown bookkeeping survive.
    pub fn reset(&mut self) {
        self.state = BotState::SelectingLanguage;
        self.category = None;
        self.asset = None;
    }
}

/// A session whose cooldown ran out and whose owner has not been told yet.
#[derive(Debug, Clone, PartialEq)]
pub struct CooldownNotice {
    pub user_id: i64,
    pub chat_id: i64,
    pub language: Language,
    pub signal_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<i64, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the user's session, creating it on first contact.
    #[cfg(test)]
    pub async fn get_or_create(&self, user_id: i64, chat_id: i64, now: DateTime<Utc>) -> Session {
        self.with_session(user_id, chat_id, now, |session| session.clone())
            .await
    }

    pub async fn get(&self, user_id: i64) -> Option<Session> {
        self.sessions.read().await.get(&user_id).cloned()
    }

    /// Stamp activity for an existing session; unknown users are ignored.
    #[cfg(test)]
    pub async fn touch(&self, user_id: i64, now: DateTime<Utc>) {
        if let Some(session) = self.sessions.write().await.get_mut(&user_id) {
            session.touch(now);
        }
    }

    /// Run `f` on the user's session under the write lock. The session is
    /// created if missing, its chat id refreshed and its activity stamped
    /// before `f` sees it. `f` must not await.
    pub async fn with_session<R>(
        &self,
        user_id: i64,
        chat_id: i64,
        now: DateTime<Utc>,
        f: impl FnOnce(&mut Session) -> R,
    ) -> R {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(user_id).or_insert_with(|| {
            debug!("Creating session for user {}", user_id);
            Session::new(user_id, chat_id, now)
        });
        session.chat_id = chat_id;
        session.touch(now);
        f(session)
    }

    /// Drop sessions idle for more than `max_idle`, counted in whole days
    /// (7.9 days idle is still 7). Returns the evicted user ids.
    pub async fn sweep_expired(&self, now: DateTime<Utc>, max_idle: Duration) -> Vec<i64> {
        let mut sessions = self.sessions.write().await;
        let expired: Vec<i64> = sessions
            .values()
            .filter(|s| (now - s.last_activity).num_days() > max_idle.num_days())
            .map(|s| s.user_id)
            .collect();
        for user_id in &expired {
            sessions.remove(user_id);
        }
        expired
    }

    /// Sessions whose cooldown `window` elapsed and that were not notified yet.
    pub async fn cooldown_expired(&self, now: DateTime<Utc>, window: Duration) -> Vec<CooldownNotice> {
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| !s.cooldown_notified)
            .filter_map(|s| {
                let signal_at = s.last_signal_at?;
                (now - signal_at >= window).then(|| CooldownNotice {
                    user_id: s.user_id,
                    chat_id: s.chat_id,
                    language: s.language,
                    signal_at,
                })
            })
            .collect()
    }

    /// Mark the notice for `signal_at` as sent. Does nothing (and returns
    /// false) if the user has requested another signal since.
    pub async fn mark_cooldown_notified(&self, user_id: i64, signal_at: DateTime<Utc>) -> bool {
        match self.sessions.write().await.get_mut(&user_id) {
            Some(session) if session.last_signal_at == Some(signal_at) => {
                session.cooldown_notified = true;
                true
            }
            _ => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-04T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[tokio::test]
    async fn test_one_session_per_user() {
        let store = SessionStore::new();
        let first = store.get_or_create(7, 70, t0()).await;
        assert_eq!(first.state, BotState::SelectingLanguage);
        assert_eq!(first.language, Language::En);

        store
            .with_session(7, 71, t0(), |s| s.language = Language::De)
            .await;
        let again = store.get_or_create(7, 71, t0()).await;
        assert_eq!(again.language, Language::De);
        assert_eq!(again.chat_id, 71);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_last_activity_never_moves_back() {
        let store = SessionStore::new();
        store.get_or_create(1, 1, t0()).await;
        store.touch(1, t0() + Duration::minutes(5)).await;
        store.get_or_create(1, 1, t0() + Duration::minutes(1)).await;
        store.touch(2, t0()).await;
        let session = store.get(1).await.unwrap();
        assert_eq!(session.last_activity, t0() + Duration::minutes(5));
        assert!(store.get(2).await.is_none());
    }

    #[tokio::test]
    async fn test_sweep_evicts_only_idle_sessions() {
        let store = SessionStore::new();
        store.get_or_create(1, 1, t0()).await;
        store.get_or_create(2, 2, t0() + Duration::days(2)).await;

        let now = t0() + Duration::days(8);
        let evicted = store.sweep_expired(now, Duration::days(7)).await;
        assert_eq!(evicted, vec![1]);
        assert!(store.get(1).await.is_none());
        assert!(store.get(2).await.is_some());
    }

    #[tokio::test]
    async fn test_sweep_counts_whole_days() {
        let store = SessionStore::new();
        store.get_or_create(1, 1, t0()).await;
        let week = Duration::days(7);

        assert!(store.sweep_expired(t0() + week, week).await.is_empty());
        let seven_and_a_half = t0() + week + Duration::hours(12);
        assert!(store.sweep_expired(seven_and_a_half, week).await.is_empty());
        let almost_eight = t0() + Duration::days(8) - Duration::seconds(1);
        assert!(store.sweep_expired(almost_eight, week).await.is_empty());
        assert_eq!(store.sweep_expired(t0() + Duration::days(8), week).await, vec![1]);
    }

    #[tokio::test]
    async fn test_cooldown_notice_is_not_marked_after_a_new_signal() {
        let store = SessionStore::new();
        store
            .with_session(3, 30, t0(), |s| s.last_signal_at = Some(t0()))
            .await;
        let window = Duration::seconds(60);

        assert!(store.cooldown_expired(t0() + Duration::seconds(59), window).await.is_empty());
        let notices = store.cooldown_expired(t0() + Duration::seconds(60), window).await;
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].chat_id, 30);

        let later = t0() + Duration::seconds(70);
        store
            .with_session(3, 30, later, |s| s.last_signal_at = Some(later))
            .await;
        assert!(!store.mark_cooldown_notified(3, t0()).await);
        assert!(store.mark_cooldown_notified(3, later).await);
        assert!(store.cooldown_expired(later + window, window).await.is_empty());
    }
}
