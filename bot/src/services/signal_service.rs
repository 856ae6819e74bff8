//! Runs an accepted signal request end to end: data, scoring, rendering, delivery.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use shared::{Clock, Language, Timeframe};
use signal_engine::prelude::*;
use tracing::info;

use crate::commands::menu::category_keyboard;
use crate::i18n;
use crate::services::delivery::Messenger;

pub const WELCOME_IMAGE: &str = "WELCOME.png";

/// What the conversation hands over once the user picked a timeframe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalRequest {
    pub asset: &'static str,
    pub timeframe: Timeframe,
    pub language: Language,
}

/// Regular session in the market timezone; outside it the signal is marked OTC.
pub fn market_is_open(now: DateTime<Utc>, timezone: Tz) -> bool {
    let local = now.with_timezone(&timezone).time();
    let open = NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default();
    let close = NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default();
    open <= local && local <= close
}

pub fn signal_image(direction: Direction, language: Language) -> &'static str {
    match (direction, language) {
        (Direction::Buy, Language::En) => "BUY.JPG",
        (Direction::Buy, Language::Ru) => "POKUPAEM.JPG",
        (Direction::Buy, Language::De) => "KAUFEN.JPG",
        (Direction::Sell, Language::En) => "SELL.JPG",
        (Direction::Sell, Language::Ru) => "PRODAEM.JPG",
        (Direction::Sell, Language::De) => "VERKAUFEN.JPG",
    }
}

pub struct SignalService {
    cache: Arc<MarketDataCache>,
    engine: SignalEngine,
    messenger: Arc<Messenger>,
    clock: Arc<dyn Clock>,
    assets_dir: PathBuf,
    market_timezone: Tz,
}

impl SignalService {
    pub fn new(
        cache: Arc<MarketDataCache>,
        engine: SignalEngine,
        messenger: Arc<Messenger>,
        clock: Arc<dyn Clock>,
        assets_dir: PathBuf,
        market_timezone: Tz,
    ) -> Self {
        Self {
            cache,
            engine,
            messenger,
            clock,
            assets_dir,
            market_timezone,
        }
    }

    /// Score the request; missing data yields the generated fallback.
    pub async fn generate(&self, request: &SignalRequest) -> SignalResult {
        match self.cache.get(request.asset, request.timeframe).await {
            Some(dataset) => self.engine.score(&dataset),
            None => self.engine.fallback(),
        }
    }

    pub fn render(&self, request: &SignalRequest, result: &SignalResult, now: DateTime<Utc>) -> String {
        let lang = request.language;
        let market = if market_is_open(now, self.market_timezone) {
            String::new()
        } else {
            i18n::text(lang, "market_otc")
        };
        let direction = match result.direction {
            Direction::Buy => i18n::text(lang, "direction_buy"),
            Direction::Sell => i18n::text(lang, "direction_sell"),
        };
        let conclusion = match result.conclusion() {
            Conclusion::StrongBuy => i18n::text(lang, "conclusion_strong_buy"),
            Conclusion::StrongSell => i18n::text(lang, "conclusion_strong_sell"),
            Conclusion::GeneratedBuy => i18n::text(lang, "conclusion_generated_buy"),
            Conclusion::GeneratedSell => i18n::text(lang, "conclusion_generated_sell"),
        };
        let code = lang.code();
        let timeframe = i18n::timeframe_label(lang, request.timeframe);

        format!(
            "{}\n\n{}\n{}\n{}\n\n{}\n{}\n\n{}",
            i18n::translate(code, "signal_title", Some(&[("asset", request.asset), ("market", &market)])),
            i18n::translate(code, "signal_timeframe", Some(&[("timeframe", &timeframe)])),
            i18n::text(lang, "signal_analysis"),
            result.analysis_text(),
            i18n::translate(code, "signal_recommendation", Some(&[("direction", &direction)])),
            i18n::translate(code, "signal_conclusion", Some(&[("conclusion", &conclusion)])),
            i18n::text(lang, "signal_disclaimer"),
        )
    }

    /// Generate, render and send a signal to `chat_id`.
    pub async fn emit(&self, chat_id: i64, request: &SignalRequest) -> bool {
        let result = self.generate(request).await;
        info!(
            "Signal for {} ({}): {} buy={} sell={} fallback={}",
            request.asset, request.timeframe, result.direction, result.buy_score, result.sell_score, result.fallback
        );

        let caption = self.render(request, &result, self.clock.now());
        let image = self.assets_dir.join(signal_image(result.direction, request.language));
        self.messenger
            .send_photo(chat_id, &image, &caption, &category_keyboard(request.language))
            .await
    }
}
