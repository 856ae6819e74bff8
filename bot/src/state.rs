use std::sync::Arc;

use chrono::Duration;
use shared::{Clock, Config, SystemClock};
use signal_engine::prelude::{DataProvider, MarketDataCache, SignalEngine, SyntheticProvider};
use teloxide::Bot;

use crate::commands::conversation::Conversation;
use crate::services::cooldown::{CooldownPolicy, CooldownWatcher};
use crate::services::delivery::{Messenger, TelegramTransport, Transport};
use crate::services::janitor::Janitor;
use crate::services::session_store::SessionStore;
use crate::services::signal_service::SignalService;

pub type HandlerResult = Result<(), anyhow::Error>;

/// Where a user is in the menu flow.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum BotState {
    #[default]
    SelectingLanguage,
    AwaitingRegistrationAck,
    AwaitingPassword,
    SelectingCategory,
    SelectingAsset,
    SelectingTimeframe,
    /// A signal was just sent (or refused by the cooldown); the category menu is showing.
    Ready,
    Settings,
    ChangingLanguage,
}

impl BotState {
    /// True once the access password has been accepted.
    pub fn is_unlocked(&self) -> bool {
        !matches!(
            self,
            BotState::SelectingLanguage | BotState::AwaitingRegistrationAck | BotState::AwaitingPassword
        )
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
    pub sessions: Arc<SessionStore>,
    pub messenger: Arc<Messenger>,
    pub conversation: Arc<Conversation>,
    pub signals: Arc<SignalService>,
}

impl AppState {
    pub fn new(config: Config, bot: Bot) -> Self {
        Self::with_parts(
            config,
            Arc::new(SystemClock),
            Arc::new(TelegramTransport::new(bot)),
            Arc::new(SyntheticProvider::default()),
        )
    }

    pub fn with_parts(
        config: Config,
        clock: Arc<dyn Clock>,
        transport: Arc<dyn Transport>,
        provider: Arc<dyn DataProvider>,
    ) -> Self {
        let messenger = Arc::new(Messenger::new(transport));
        let cache = Arc::new(MarketDataCache::new(
            provider,
            clock.clone(),
            Duration::seconds(config.cache_ttl_secs as i64),
        ));
        let signals = Arc::new(SignalService::new(
            cache,
            SignalEngine::new(config.min_data_points),
            messenger.clone(),
            clock.clone(),
            config.assets_dir.clone(),
            config.market_timezone,
        ));
        let conversation = Arc::new(Conversation::new(
            config.access_password.clone(),
            CooldownPolicy::new(Duration::seconds(config.cooldown_secs as i64)),
            config.assets_dir.clone(),
        ));

        AppState {
            config: Arc::new(config),
            clock,
            sessions: Arc::new(SessionStore::new()),
            messenger,
            conversation,
            signals,
        }
    }

    pub fn cooldown_watcher(&self) -> CooldownWatcher {
        CooldownWatcher::new(
            self.sessions.clone(),
            self.messenger.clone(),
            self.clock.clone(),
            self.conversation.cooldown(),
            std::time::Duration::from_secs(self.config.cooldown_poll_secs.max(1)),
        )
    }

    pub fn janitor(&self) -> Janitor {
        Janitor::new(
            self.sessions.clone(),
            self.clock.clone(),
            Duration::days(self.config.session_max_idle_days),
            std::time::Duration::from_secs(self.config.janitor_poll_secs.max(1)),
        )
    }
}
