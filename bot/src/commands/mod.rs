use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::info;

use crate::state::{AppState, HandlerResult};

pub mod conversation;
pub mod menu;

pub use conversation::handle_event;
pub use menu::InboundEvent;

/// Signal bot commands
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// Start over from the language selection.
    Start,
}

/// Handler for /start, valid in every state
pub async fn handle_start(msg: Message, state: Arc<AppState>) -> HandlerResult {
    if let Some(user) = msg.from.as_ref() {
        info!("Processing /start command from user {}", user.id);
    }
    handle_message(msg, state).await
}

/// Every other message goes through the menu state machine.
pub async fn handle_message(msg: Message, state: Arc<AppState>) -> HandlerResult {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let event = InboundEvent {
        user_id: user.id.0 as i64,
        chat_id: msg.chat.id.0,
        text: msg.text().unwrap_or_default().to_string(),
    };
    handle_event(&state, event).await;
    Ok(())
}
