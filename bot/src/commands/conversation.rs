//! The per-user menu state machine.
//!
//! `Conversation::step` is synchronous and runs under the session lock;
//! whatever it decides to send is delivered afterwards by `handle_event`.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use shared::{Category, Language, Timeframe};
use tracing::{debug, info};

use crate::commands::menu::{self, InboundEvent, MenuEvent};
use crate::i18n;
use crate::services::cooldown::CooldownPolicy;
use crate::services::delivery::{Reply, ReplyKeyboard};
use crate::services::session_store::Session;
use crate::services::signal_service::{SignalRequest, WELCOME_IMAGE};
use crate::state::{AppState, BotState};

/// Outcome of one transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Reply(Reply),
    /// Cooldown accepted; run the signal pipeline.
    Signal(SignalRequest),
}

pub struct Conversation {
    password: String,
    cooldown: CooldownPolicy,
    assets_dir: PathBuf,
}

impl Conversation {
    pub fn new(password: String, cooldown: CooldownPolicy, assets_dir: PathBuf) -> Self {
        Self {
            password,
            cooldown,
            assets_dir,
        }
    }

    pub fn cooldown(&self) -> CooldownPolicy {
        self.cooldown
    }

    pub fn step(&self, session: &mut Session, text: &str, now: DateTime<Utc>) -> Action {
        let event = MenuEvent::classify(text, session.language);
        let lang = session.language;

        match (session.state, event) {
            (_, MenuEvent::Start) => {
                session.reset();
                Action::Reply(Reply::Photo {
                    image: self.assets_dir.join(WELCOME_IMAGE),
                    caption: i18n::text(Language::En, "welcome"),
                    keyboard: menu::language_keyboard(None),
                })
            }
            (BotState::AwaitingPassword, _) => self.check_password(session, text),
            (BotState::SelectingLanguage, MenuEvent::Language(language)) => {
                session.language = language;
                session.state = BotState::AwaitingRegistrationAck;
                reply(i18n::text(language, "registration_info"), menu::next_keyboard(language))
            }
            (BotState::AwaitingRegistrationAck, MenuEvent::Next) => {
                session.state = BotState::AwaitingPassword;
                reply(i18n::text(lang, "password_prompt"), ReplyKeyboard::Remove)
            }
            (state, MenuEvent::Settings) if state.is_unlocked() => {
                session.state = BotState::Settings;
                reply(i18n::text(lang, "settings"), menu::settings_keyboard(lang))
            }
            (BotState::Settings, MenuEvent::ChangeLanguage) => {
                session.state = BotState::ChangingLanguage;
                let current = i18n::language_label(lang);
                reply(
                    i18n::translate(lang.code(), "current_language", Some(&[("language", &current)])),
                    menu::language_keyboard(Some(lang)),
                )
            }
            (BotState::ChangingLanguage, MenuEvent::Language(language)) => {
                session.language = language;
                session.state = BotState::SelectingCategory;
                reply(i18n::text(language, "language_changed"), menu::category_keyboard(language))
            }
            (state, MenuEvent::Back) if state.is_unlocked() => self.back(session),
            (BotState::SelectingCategory | BotState::Ready, MenuEvent::Category(category)) => {
                session.category = Some(category);
                session.state = BotState::SelectingAsset;
                asset_menu(lang, category)
            }
            (BotState::SelectingAsset, MenuEvent::Asset(asset))
                if session.category.is_some_and(|c| c.contains(asset)) =>
            {
                session.asset = Some(asset);
                session.state = BotState::SelectingTimeframe;
                reply(i18n::text(lang, "select_timeframe"), menu::timeframe_keyboard(lang))
            }
            (BotState::SelectingTimeframe, MenuEvent::Timeframe(timeframe)) => {
                self.request_signal(session, timeframe, now)
            }
            (state, event) => {
                debug!("No transition for {:?} in {:?}", event, state);
                error_reply(lang)
            }
        }
    }

    fn check_password(&self, session: &mut Session, text: &str) -> Action {
        let lang = session.language;
        if text == self.password {
            info!("User {} passed the access gate", session.user_id);
            session.state = BotState::SelectingCategory;
            reply(i18n::text(lang, "password_correct"), menu::category_keyboard(lang))
        } else {
            reply(i18n::text(lang, "password_incorrect"), ReplyKeyboard::Keep)
        }
    }

    /// Back is inferred from what the session already holds.
    fn back(&self, session: &mut Session) -> Action {
        let lang = session.language;
        match (session.asset, session.category) {
            (Some(_), Some(category)) => {
                session.state = BotState::SelectingAsset;
                asset_menu(lang, category)
            }
            _ => {
                session.state = BotState::SelectingCategory;
                reply(i18n::text(lang, "select_category"), menu::category_keyboard(lang))
            }
        }
    }

    fn request_signal(&self, session: &mut Session, timeframe: Timeframe, now: DateTime<Utc>) -> Action {
        let lang = session.language;
        let Some(asset) = session.asset else {
            return error_reply(lang);
        };

        session.state = BotState::Ready;
        if !self.cooldown.can_request(session, now) {
            let seconds = self
                .cooldown
                .remaining(session, now)
                .map(|wait| wait.num_seconds())
                .unwrap_or_default()
                .to_string();
            return reply(
                i18n::translate(lang.code(), "cooldown", Some(&[("seconds", &seconds)])),
                menu::category_keyboard(lang),
            );
        }

        self.cooldown.accept(session, now);
        Action::Signal(SignalRequest {
            asset,
            timeframe,
            language: lang,
        })
    }
}

fn reply(text: String, keyboard: ReplyKeyboard) -> Action {
    Action::Reply(Reply::text(text, keyboard))
}

fn asset_menu(lang: Language, category: Category) -> Action {
    let label = i18n::category_label(lang, category);
    reply(
        i18n::translate(lang.code(), "select_asset", Some(&[("category", &label)])),
        menu::asset_keyboard(lang, category),
    )
}

fn error_reply(lang: Language) -> Action {
    reply(i18n::text(lang, "error"), ReplyKeyboard::Remove)
}

/// Apply one inbound event: transition under the session lock, then send.
pub async fn handle_event(state: &AppState, event: InboundEvent) {
    let now = state.clock.now();
    let action = state
        .sessions
        .with_session(event.user_id, event.chat_id, now, |session| {
            let before = session.state;
            let action = state.conversation.step(session, &event.text, now);
            debug!("User {}: {:?} -> {:?}", event.user_id, before, session.state);
            action
        })
        .await;

    match action {
        Action::Reply(reply) => {
            state.messenger.deliver(event.chat_id, &reply).await;
        }
        Action::Signal(request) => {
            state.signals.emit(event.chat_id, &request).await;
        }
    }
}
