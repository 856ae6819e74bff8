//! i18n module for handling translations
//!
//! Message bodies live in `bot/locales/*.yml` and are compiled in by
//! `rust_i18n::i18n!` at the crate root. Button labels are kept in a match
//! table because the classification layer needs to reverse-look them up.

use shared::{Category, Language, Timeframe};

/// Get translation for a key with optional `{name}` arguments.
///
/// Arguments are substituted verbatim; escaping for the rich send mode is
/// done by the transport on the whole message.
pub fn translate(locale: &str, key: &str, args: Option<&[(&str, &str)]>) -> String {
    let mut text = t!(key, locale = locale).to_string();
    if let Some(args) = args {
        for (name, value) in args {
            text = text.replace(&format!("{{{}}}", name), value);
        }
    }
    text
}

/// Shorthand for a translation without arguments.
pub fn text(language: Language, key: &str) -> String {
    translate(language.code(), key, None)
}

/// Reply-keyboard controls shared by several menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Back,
    Next,
    Settings,
    ChangeLanguage,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Control::Back,
        Control::Next,
        Control::Settings,
        Control::ChangeLanguage,
    ];

    fn key(&self) -> &'static str {
        match self {
            Control::Back => "button_back",
            Control::Next => "button_next",
            Control::Settings => "button_settings",
            Control::ChangeLanguage => "button_change_language",
        }
    }
}

/// Get button text for reply keyboard buttons
pub fn get_button_text(locale: &str, key: &str) -> String {
    match (locale, key) {
        // Language picker, identical in every locale
        (_, "lang_en") => "🇬🇧 English".to_string(),
        (_, "lang_ru") => "🇷🇺 Русский".to_string(),
        (_, "lang_de") => "🇩🇪 Deutsch".to_string(),

        // Controls
        ("ru", "button_back") => "🔙 Назад".to_string(),
        ("de", "button_back") => "🔙 Zurück".to_string(),
        (_, "button_back") => "🔙 Back".to_string(),
        ("ru", "button_next") => "➡️ Далее".to_string(),
        ("de", "button_next") => "➡️ Weiter".to_string(),
        (_, "button_next") => "➡️ Next".to_string(),
        ("ru", "button_settings") => "⚙️ Настройки".to_string(),
        ("de", "button_settings") => "⚙️ Einstellungen".to_string(),
        (_, "button_settings") => "⚙️ Settings".to_string(),
        ("ru", "button_change_language") => "🌐 Сменить язык".to_string(),
        ("de", "button_change_language") => "🌐 Sprache ändern".to_string(),
        (_, "button_change_language") => "🌐 Change language".to_string(),

        // Asset categories
        ("ru", "category_currencies") => "💵 Валюты".to_string(),
        ("de", "category_currencies") => "💵 Währungen".to_string(),
        (_, "category_currencies") => "💵 Currencies".to_string(),
        ("ru", "category_crypto") => "🪙 Криптовалюта".to_string(),
        ("de", "category_crypto") => "🪙 Kryptowährung".to_string(),
        (_, "category_crypto") => "🪙 Cryptocurrency".to_string(),
        ("ru", "category_stocks") => "📈 Акции".to_string(),
        ("de", "category_stocks") => "📈 Aktien".to_string(),
        (_, "category_stocks") => "📈 Stocks".to_string(),
        ("ru", "category_indices") => "📊 Индексы".to_string(),
        ("de", "category_indices") => "📊 Indizes".to_string(),
        (_, "category_indices") => "📊 Indices".to_string(),

        // Timeframes
        ("ru", "timeframe_30s") => "30 сек".to_string(),
        (_, "timeframe_30s") => "30 sec".to_string(),
        ("ru", "timeframe_1m") => "1 мин".to_string(),
        (_, "timeframe_1m") => "1 min".to_string(),
        ("ru", "timeframe_2m") => "2 мин".to_string(),
        (_, "timeframe_2m") => "2 min".to_string(),
        ("ru", "timeframe_3m") => "3 мин".to_string(),
        (_, "timeframe_3m") => "3 min".to_string(),
        ("ru", "timeframe_5m") => "5 мин".to_string(),
        (_, "timeframe_5m") => "5 min".to_string(),

        _ => key.to_string(),
    }
}

pub fn language_label(language: Language) -> String {
    get_button_text(language.code(), &format!("lang_{}", language.code()))
}

pub fn control_label(language: Language, control: Control) -> String {
    get_button_text(language.code(), control.key())
}

pub fn category_label(language: Language, category: Category) -> String {
    let key = match category {
        Category::Currencies => "category_currencies",
        Category::Crypto => "category_crypto",
        Category::Stocks => "category_stocks",
        Category::Indices => "category_indices",
    };
    get_button_text(language.code(), key)
}

pub fn timeframe_label(language: Language, timeframe: Timeframe) -> String {
    get_button_text(language.code(), &format!("timeframe_{}", timeframe.code()))
}
