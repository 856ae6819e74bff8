//! Maps raw inbound text onto menu events and builds the reply keyboards.

use shared::{find_asset, Category, Language, Timeframe};

use crate::i18n::{self, Control};
use crate::services::delivery::ReplyKeyboard;

/// A normalized inbound text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub user_id: i64,
    pub chat_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    Start,
    Language(Language),
    Next,
    Back,
    Settings,
    ChangeLanguage,
    Category(Category),
    Asset(&'static str),
    Timeframe(Timeframe),
    /// Anything else, kept verbatim (the password, typically).
    Text(String),
}

impl MenuEvent {
    /// Classify `text` for a user whose interface language is `language`.
    ///
    /// Control and timeframe labels match in every language, so a user who
    /// just switched language can still press a button from the old keyboard.
    /// Category labels only match in the current language.
    pub fn classify(text: &str, language: Language) -> Self {
        if is_start_command(text) {
            return MenuEvent::Start;
        }
        if let Some(language) = Language::ALL.into_iter().find(|l| i18n::language_label(*l) == text) {
            return MenuEvent::Language(language);
        }
        for control in Control::ALL {
            if Language::ALL.iter().any(|l| i18n::control_label(*l, control) == text) {
                return match control {
                    Control::Back => MenuEvent::Back,
                    Control::Next => MenuEvent::Next,
                    Control::Settings => MenuEvent::Settings,
                    Control::ChangeLanguage => MenuEvent::ChangeLanguage,
                };
            }
        }
        if let Some(category) = Category::ALL
            .into_iter()
            .find(|c| i18n::category_label(language, *c) == text)
        {
            return MenuEvent::Category(category);
        }
        for timeframe in Timeframe::ALL {
            if Language::ALL.iter().any(|l| i18n::timeframe_label(*l, timeframe) == text) {
                return MenuEvent::Timeframe(timeframe);
            }
        }
        if let Some(asset) = find_asset(text) {
            return MenuEvent::Asset(asset);
        }
        MenuEvent::Text(text.to_string())
    }
}

/// `/start`, `/start@SomeBot` and `/start payload` all count.
fn is_start_command(text: &str) -> bool {
    text.split_whitespace()
        .next()
        .map(|command| command.split('@').next() == Some("/start"))
        .unwrap_or(false)
}

pub fn language_keyboard(back: Option<Language>) -> ReplyKeyboard {
    let controls = back
        .map(|l| vec![i18n::control_label(l, Control::Back)])
        .unwrap_or_default();
    ReplyKeyboard::menu(Language::ALL.into_iter().map(i18n::language_label), controls)
}

pub fn next_keyboard(language: Language) -> ReplyKeyboard {
    ReplyKeyboard::menu([i18n::control_label(language, Control::Next)], Vec::new())
}

pub fn category_keyboard(language: Language) -> ReplyKeyboard {
    ReplyKeyboard::menu(
        Category::ALL.into_iter().map(|c| i18n::category_label(language, c)),
        vec![i18n::control_label(language, Control::Settings)],
    )
}

pub fn asset_keyboard(language: Language, category: Category) -> ReplyKeyboard {
    ReplyKeyboard::menu(
        category.assets().iter().map(|a| a.to_string()),
        back_and_settings(language),
    )
}

pub fn timeframe_keyboard(language: Language) -> ReplyKeyboard {
    ReplyKeyboard::menu(
        Timeframe::ALL.into_iter().map(|tf| i18n::timeframe_label(language, tf)),
        back_and_settings(language),
    )
}

pub fn settings_keyboard(language: Language) -> ReplyKeyboard {
    ReplyKeyboard::menu(
        [
            i18n::control_label(language, Control::ChangeLanguage),
            i18n::control_label(language, Control::Back),
        ],
        Vec::new(),
    )
}

fn back_and_settings(language: Language) -> Vec<String> {
    vec![
        i18n::control_label(language, Control::Back),
        i18n::control_label(language, Control::Settings),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_variants() {
        assert_eq!(MenuEvent::classify("/start", Language::En), MenuEvent::Start);
        assert_eq!(MenuEvent::classify("/start@SignalBot", Language::Ru), MenuEvent::Start);
        assert_eq!(MenuEvent::classify("/start ref42", Language::De), MenuEvent::Start);
        assert_eq!(
            MenuEvent::classify("/starting", Language::En),
            MenuEvent::Text("/starting".to_string())
        );
    }

    #[test]
    fn test_controls_match_in_any_language() {
        assert_eq!(MenuEvent::classify("🔙 Назад", Language::En), MenuEvent::Back);
        assert_eq!(MenuEvent::classify("➡️ Weiter", Language::Ru), MenuEvent::Next);
        assert_eq!(MenuEvent::classify("⚙️ Settings", Language::De), MenuEvent::Settings);
        assert_eq!(
            MenuEvent::classify("🌐 Сменить язык", Language::En),
            MenuEvent::ChangeLanguage
        );
        assert_eq!(
            MenuEvent::classify("3 мин", Language::En),
            MenuEvent::Timeframe(Timeframe::Min3)
        );
    }

    #[test]
    fn test_categories_match_only_current_language() {
        assert_eq!(
            MenuEvent::classify("💵 Währungen", Language::De),
            MenuEvent::Category(Category::Currencies)
        );
        assert_eq!(
            MenuEvent::classify("💵 Währungen", Language::En),
            MenuEvent::Text("💵 Währungen".to_string())
        );
    }

    #[test]
    fn test_languages_assets_and_free_text() {
        assert_eq!(
            MenuEvent::classify("🇷🇺 Русский", Language::En),
            MenuEvent::Language(Language::Ru)
        );
        assert_eq!(MenuEvent::classify("ETH/USDT", Language::Ru), MenuEvent::Asset("ETH/USDT"));
        assert_eq!(
            MenuEvent::classify("hunter2", Language::En),
            MenuEvent::Text("hunter2".to_string())
        );
    }

    #[test]
    fn test_keyboards_carry_expected_controls() {
        let labels = category_keyboard(Language::En).labels().join("|");
        assert!(labels.ends_with("⚙️ Settings"));
        assert!(!labels.contains("🔙"));

        let assets = asset_keyboard(Language::Ru, Category::Stocks);
        let labels = assets.labels();
        assert_eq!(labels.len(), 12);
        assert_eq!(labels[0], "AAPL");
        assert_eq!(&labels[10..], &["🔙 Назад", "⚙️ Настройки"]);

        assert_eq!(language_keyboard(None).labels().len(), 3);
        assert_eq!(language_keyboard(Some(Language::De)).labels()[3], "🔙 Zurück");
    }
}
