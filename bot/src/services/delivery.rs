//! Outbound messages: the transport seam plus the rich → plain fallback.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, KeyboardButton, KeyboardMarkup, KeyboardRemove, ParseMode, ReplyMarkup};
use teloxide::utils::html;
use tracing::{error, warn};

/// What to do with the user's reply keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyKeyboard {
    /// Leave whatever keyboard the user has.
    Keep,
    Remove,
    /// Rows of button labels.
    Buttons(Vec<Vec<String>>),
}

impl ReplyKeyboard {
    /// One item per row, then an optional row of control labels.
    pub fn menu(items: impl IntoIterator<Item = String>, controls: Vec<String>) -> Self {
        let mut rows: Vec<Vec<String>> = items.into_iter().map(|item| vec![item]).collect();
        if !controls.is_empty() {
            rows.push(controls);
        }
        ReplyKeyboard::Buttons(rows)
    }

    pub fn labels(&self) -> Vec<&str> {
        match self {
            ReplyKeyboard::Buttons(rows) => rows.iter().flatten().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    fn markup(&self) -> Option<ReplyMarkup> {
        match self {
            ReplyKeyboard::Keep => None,
            ReplyKeyboard::Remove => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
            ReplyKeyboard::Buttons(rows) => {
                let keyboard = rows
                    .iter()
                    .map(|row| row.iter().map(|label| KeyboardButton::new(label.clone())).collect::<Vec<_>>())
                    .collect::<Vec<_>>();
                Some(ReplyMarkup::Keyboard(KeyboardMarkup::new(keyboard).resize_keyboard()))
            }
        }
    }
}

/// A single outbound message produced by the conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text {
        text: String,
        keyboard: ReplyKeyboard,
    },
    Photo {
        image: PathBuf,
        caption: String,
        keyboard: ReplyKeyboard,
    },
}

impl Reply {
    pub fn text(text: impl Into<String>, keyboard: ReplyKeyboard) -> Self {
        Reply::Text { text: text.into(), keyboard }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// HTML parse mode, text escaped.
    Rich,
    Plain,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &ReplyKeyboard,
        mode: TextMode,
    ) -> anyhow::Result<()>;

    async fn send_photo(
        &self,
        chat_id: i64,
        image: &Path,
        caption: &str,
        keyboard: &ReplyKeyboard,
    ) -> anyhow::Result<()>;
}

pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &ReplyKeyboard,
        mode: TextMode,
    ) -> anyhow::Result<()> {
        let mut request = match mode {
            TextMode::Rich => self
                .bot
                .send_message(ChatId(chat_id), html::escape(text))
                .parse_mode(ParseMode::Html),
            TextMode::Plain => self.bot.send_message(ChatId(chat_id), text.to_string()),
        };
        if let Some(markup) = keyboard.markup() {
            request = request.reply_markup(markup);
        }
        request.await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        image: &Path,
        caption: &str,
        keyboard: &ReplyKeyboard,
    ) -> anyhow::Result<()> {
        let mut request = self
            .bot
            .send_photo(ChatId(chat_id), InputFile::file(image.to_path_buf()))
            .caption(html::escape(caption))
            .parse_mode(ParseMode::Html);
        if let Some(markup) = keyboard.markup() {
            request = request.reply_markup(markup);
        }
        request.await?;
        Ok(())
    }
}

/// Delivery with graceful degradation. Never returns an error; a `false`
/// result means the message was dropped after logging.
pub struct Messenger {
    transport: Arc<dyn Transport>,
}

impl Messenger {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn send_text(&self, chat_id: i64, text: &str, keyboard: &ReplyKeyboard) -> bool {
        match self.transport.send_text(chat_id, text, keyboard, TextMode::Rich).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Rich send to chat {} failed, retrying as plain text: {}", chat_id, e);
                match self.transport.send_text(chat_id, text, keyboard, TextMode::Plain).await {
                    Ok(()) => true,
                    Err(e) => {
                        error!("Message sending failed for chat {}: {}", chat_id, e);
                        false
                    }
                }
            }
        }
    }

    /// Photo with caption; falls back to sending the caption as text.
    pub async fn send_photo(&self, chat_id: i64, image: &Path, caption: &str, keyboard: &ReplyKeyboard) -> bool {
        match self.transport.send_photo(chat_id, image, caption, keyboard).await {
            Ok(()) => true,
            Err(e) => {
                error!("Photo sending failed for chat {} ({}): {}", chat_id, image.display(), e);
                self.send_text(chat_id, caption, keyboard).await
            }
        }
    }

    pub async fn deliver(&self, chat_id: i64, reply: &Reply) -> bool {
        match reply {
            Reply::Text { text, keyboard } => self.send_text(chat_id, text, keyboard).await,
            Reply::Photo { image, caption, keyboard } => {
                self.send_photo(chat_id, image, caption, keyboard).await
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// One recorded transport call.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Sent {
        Text {
            chat_id: i64,
            text: String,
            keyboard: ReplyKeyboard,
            mode: TextMode,
        },
        Photo {
            chat_id: i64,
            image: PathBuf,
            caption: String,
            keyboard: ReplyKeyboard,
        },
    }

    /// Records successful sends; failing modes are rejected without being recorded.
    #[derive(Default)]
    pub struct RecordingTransport {
        pub sent: Mutex<Vec<Sent>>,
        pub fail_rich: bool,
        pub fail_plain: bool,
        pub fail_photo: bool,
    }

    impl RecordingTransport {
        pub fn sent(&self) -> Vec<Sent> {
            self.sent.lock().unwrap().clone()
        }

        pub fn texts(&self) -> Vec<String> {
            self.sent()
                .into_iter()
                .map(|s| match s {
                    Sent::Text { text, .. } => text,
                    Sent::Photo { caption, .. } => caption,
                })
                .collect()
        }

        pub fn clear(&self) {
            self.sent.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send_text(
            &self,
            chat_id: i64,
            text: &str,
            keyboard: &ReplyKeyboard,
            mode: TextMode,
        ) -> anyhow::Result<()> {
            let fail = match mode {
                TextMode::Rich => self.fail_rich,
                TextMode::Plain => self.fail_plain,
            };
            if fail {
                anyhow::bail!("{:?} send rejected", mode);
            }
            self.sent.lock().unwrap().push(Sent::Text {
                chat_id,
                text: text.to_string(),
                keyboard: keyboard.clone(),
                mode,
            });
            Ok(())
        }

        async fn send_photo(
            &self,
            chat_id: i64,
            image: &Path,
            caption: &str,
            keyboard: &ReplyKeyboard,
        ) -> anyhow::Result<()> {
            if self.fail_photo {
                anyhow::bail!("photo rejected");
            }
            self.sent.lock().unwrap().push(Sent::Photo {
                chat_id,
                image: image.to_path_buf(),
                caption: caption.to_string(),
                keyboard: keyboard.clone(),
            });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{RecordingTransport, Sent};
    use super::*;

    #[test]
    fn test_menu_puts_controls_on_their_own_row() {
        let keyboard = ReplyKeyboard::menu(
            vec!["a".to_string(), "b".to_string()],
            vec!["back".to_string(), "settings".to_string()],
        );
        assert_eq!(
            keyboard,
            ReplyKeyboard::Buttons(vec![
                vec!["a".to_string()],
                vec!["b".to_string()],
                vec!["back".to_string(), "settings".to_string()],
            ])
        );
        assert_eq!(ReplyKeyboard::menu(Vec::new(), Vec::new()), ReplyKeyboard::Buttons(vec![]));
    }

    #[tokio::test]
    async fn test_rich_failure_falls_back_to_plain() {
        let transport = Arc::new(RecordingTransport {
            fail_rich: true,
            ..Default::default()
        });
        let messenger = Messenger::new(transport.clone());

        assert!(messenger.send_text(5, "<b>hi</b>", &ReplyKeyboard::Keep).await);
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert!(matches!(&sent[0], Sent::Text { mode: TextMode::Plain, text, .. } if text == "<b>hi</b>"));
    }

    #[tokio::test]
    async fn test_both_modes_failing_is_swallowed() {
        let transport = Arc::new(RecordingTransport {
            fail_rich: true,
            fail_plain: true,
            ..Default::default()
        });
        let messenger = Messenger::new(transport.clone());

        assert!(!messenger.send_text(5, "hi", &ReplyKeyboard::Remove).await);
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_photo_failure_sends_caption_as_text() {
        let transport = Arc::new(RecordingTransport {
            fail_photo: true,
            ..Default::default()
        });
        let messenger = Messenger::new(transport.clone());
        let reply = Reply::Photo {
            image: PathBuf::from("missing.jpg"),
            caption: "signal".to_string(),
            keyboard: ReplyKeyboard::Keep,
        };

        assert!(messenger.deliver(9, &reply).await);
        assert_eq!(transport.texts(), vec!["signal".to_string()]);
        assert!(matches!(&transport.sent()[0], Sent::Text { mode: TextMode::Rich, chat_id: 9, .. }));
    }
}
