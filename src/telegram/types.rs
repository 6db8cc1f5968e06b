//! Bot API wire types, limited to the fields the bot touches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::{Button, ChatEvent, ChatUser, EventPayload, Keyboard};

/// Envelope every Bot API call comes back in. Each side of the `ok`
/// split simply omits the other side's field.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<TgUser>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub date: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TgUser {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl From<TgUser> for ChatUser {
    fn from(user: TgUser) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: TgUser,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

/// A decoded update: the neutral event plus the callback id to ack,
/// when the update was a button press.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub event: ChatEvent,
    pub callback_id: Option<String>,
}

impl Update {
    /// Translate into a neutral event. Updates the bot has no use for,
    /// stickers and channel posts among them, come back as `None`.
    pub fn to_event(self) -> Option<InboundEvent> {
        if let Some(callback) = self.callback_query {
            let payload = callback.data?;
            let chat_id = callback
                .message
                .as_ref()
                .map(|message| message.chat.id)
                .unwrap_or(callback.from.id);
            return Some(InboundEvent {
                event: ChatEvent {
                    chat_id,
                    user: callback.from.into(),
                    received_at: Utc::now(),
                    payload: EventPayload::Button(payload),
                },
                callback_id: Some(callback.id),
            });
        }

        let message = self.message?;
        let user = message.from?;
        let text = message.text?;
        let received_at = DateTime::from_timestamp(message.date, 0).unwrap_or_else(Utc::now);
        let payload = match parse_command(&text) {
            Some(command) => EventPayload::Command(command),
            None => EventPayload::Text(text),
        };
        Some(InboundEvent {
            event: ChatEvent {
                chat_id: message.chat.id,
                user: user.into(),
                received_at,
                payload,
            },
            callback_id: None,
        })
    }
}

/// First token of a slash command, with any "@botname" suffix removed.
/// Case is preserved.
fn parse_command(text: &str) -> Option<String> {
    if !text.starts_with('/') {
        return None;
    }
    let token = text.split_whitespace().next()?;
    let bare = token.split('@').next()?;
    Some(bare.to_string())
}

#[derive(Debug, Serialize)]
pub struct SendMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl From<&Keyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &Keyboard) -> Self {
        Self {
            inline_keyboard: keyboard
                .rows
                .iter()
                .map(|row| row.iter().map(InlineKeyboardButton::from).collect())
                .collect(),
        }
    }
}

impl From<&Button> for InlineKeyboardButton {
    fn from(button: &Button) -> Self {
        Self {
            text: button.label.clone(),
            callback_data: button.payload.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerCallbackQuery {
    pub callback_query_id: String,
}

#[derive(Debug, Serialize)]
pub struct GetUpdates {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}
