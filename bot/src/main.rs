use std::sync::Arc;

use shared::{Config, SingleInstance};
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

// Must precede the module declarations so `t!` is visible inside them.
#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

mod commands;
mod i18n;
mod services;
mod state;

use crate::commands::{handle_message, handle_start, Command};
use crate::state::AppState;

fn schema() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(handle_start));

    Update::filter_message()
        .branch(command_handler)
        .branch(dptree::endpoint(handle_message))
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting signal bot...");

    let config = Config::from_env()?;

    let _instance = match SingleInstance::acquire(&config.lock_file) {
        Ok(guard) => guard,
        Err(e) => {
            tracing::error!("Bot is already running or the lock is unusable: {}", e);
            std::process::exit(1);
        }
    };

    let bot = Bot::new(&config.bot_token);
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Failed to register bot commands: {}", e);
    }

    let app_state = Arc::new(AppState::new(config, bot.clone()));
    tracing::info!("AppState initialized for {}", app_state.config.bot_name);

    let shutdown = CancellationToken::new();
    let watcher = tokio::spawn(app_state.cooldown_watcher().run(shutdown.clone()));
    let janitor = tokio::spawn(app_state.janitor().run(shutdown.clone()));

    let mut dispatcher = Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![app_state.clone()])
        .enable_ctrlc_handler()
        .build();

    tracing::info!("Bot is running and waiting for updates...");
    dispatcher.dispatch().await;

    shutdown.cancel();
    let (watcher, janitor) = tokio::join!(watcher, janitor);
    if let Err(e) = watcher.and(janitor) {
        tracing::error!("Background task ended abnormally: {}", e);
    }

    tracing::info!("Bot stopped");
    Ok(())
}
