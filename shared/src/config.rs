use std::path::PathBuf;
use std::str::FromStr;

use chrono_tz::Tz;
use dotenv::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub bot_name: String,
    /// Shared access secret asked for after registration.
    pub access_password: String,
    pub assets_dir: PathBuf,
    pub lock_file: PathBuf,
    pub cooldown_secs: u64,
    pub cache_ttl_secs: u64,
    pub min_data_points: usize,
    pub session_max_idle_days: i64,
    pub cooldown_poll_secs: u64,
    pub janitor_poll_secs: u64,
    pub market_timezone: Tz,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();

        let market_timezone = std::env::var("MARKET_TIMEZONE")
            .unwrap_or_else(|_| "America/New_York".to_string())
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid MARKET_TIMEZONE: {}", e))?;

        Ok(Config {
            bot_token: std::env::var("BOT_TOKEN")?,
            bot_name: std::env::var("BOT_NAME").unwrap_or_else(|_| "SignalBot".to_string()),
            access_password: std::env::var("ACCESS_PASSWORD")?,
            assets_dir: std::env::var("ASSETS_DIR")
                .unwrap_or_else(|_| "./assets".to_string())
                .into(),
            lock_file: std::env::var("LOCK_FILE")
                .unwrap_or_else(|_| "/tmp/option_bot.lock".to_string())
                .into(),
            cooldown_secs: env_or("COOLDOWN_SECS", 60),
            cache_ttl_secs: env_or("CACHE_TTL_SECS", 300),
            min_data_points: env_or("MIN_DATA_POINTS", 30),
            session_max_idle_days: env_or("SESSION_MAX_IDLE_DAYS", 7),
            cooldown_poll_secs: env_or("COOLDOWN_POLL_SECS", 10),
            janitor_poll_secs: env_or("JANITOR_POLL_SECS", 3600),
            market_timezone,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bot_token: String::new(),
            bot_name: "SignalBot".to_string(),
            access_password: String::new(),
            assets_dir: PathBuf::from("./assets"),
            lock_file: PathBuf::from("/tmp/option_bot.lock"),
            cooldown_secs: 60,
            cache_ttl_secs: 300,
            min_data_points: 30,
            session_max_idle_days: 7,
            cooldown_poll_secs: 10,
            janitor_poll_secs: 3600,
            market_timezone: chrono_tz::America::New_York,
        }
    }
}

/// Read and parse an env var, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring malformed {}={:?}, using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}
