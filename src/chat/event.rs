//! Platform-neutral chat events and replies.
//!
//! The transport layer translates its wire types into these and back,
//! so the handler never touches platform structs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::ChipResult;
use crate::ledger::UserId;

/// Sender identity as the platform reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    pub id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl ChatUser {
    /// Human-readable name, first plus last when the platform has one.
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// One inbound interaction from a user.
#[derive(Debug, Clone)]
pub struct ChatEvent {
    pub chat_id: i64,
    pub user: ChatUser,
    pub received_at: DateTime<Utc>,
    pub payload: EventPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// Slash command, stored without arguments ("/play").
    Command(String),
    /// Inline button press carrying its callback payload.
    Button(String),
    /// Free-form text.
    Text(String),
}

/// Outbound message, optionally with an inline keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(chat_id: i64, text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Self { rows }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

impl Button {
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            payload: payload.into(),
        }
    }
}

/// Delivery half of the transport. The handler replies through this and
/// stays testable with an in-memory recorder.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send(&self, reply: Reply) -> ChipResult<()>;
}
