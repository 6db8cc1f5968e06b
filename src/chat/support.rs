//! Forwarding user messages to the operators' support channel.

use chrono::{DateTime, Utc};

use crate::chat::event::{ChatUser, Reply, ReplySink};
use crate::errors::{ChipError, ChipResult};

/// Relay into the configured support channel, if there is one.
#[derive(Debug, Clone)]
pub struct SupportRelay {
    support_chat_id: Option<i64>,
}

impl SupportRelay {
    pub fn new(support_chat_id: Option<i64>) -> Self {
        Self { support_chat_id }
    }

    pub fn is_available(&self) -> bool {
        self.support_chat_id.is_some()
    }

    /// The forwarded message: who sent it, when, and the text verbatim.
    fn forward_text(&self, user: &ChatUser, message: &str, at: DateTime<Utc>) -> String {
        let username = match &user.username {
            Some(name) => format!("@{name}"),
            None => "(no username)".to_string(),
        };
        format!(
            "📨 Support request\n\
             From: {}\n\
             Username: {}\n\
             User ID: {}\n\
             Time: {}\n\n\
             {}",
            user.display_name(),
            username,
            user.id,
            at.format("%Y-%m-%d %H:%M:%S"),
            message
        )
    }

    /// Deliver one support message. Fails with `SupportUnavailable` when
    /// no channel is configured and `SupportDeliveryFailed` when the
    /// send itself fails.
    pub async fn forward(
        &self,
        sink: &dyn ReplySink,
        user: &ChatUser,
        message: &str,
        at: DateTime<Utc>,
    ) -> ChipResult<()> {
        let chat_id = self.support_chat_id.ok_or(ChipError::SupportUnavailable)?;
        let reply = Reply::text(chat_id, self.forward_text(user, message, at));
        sink.send(reply)
            .await
            .map_err(|err| ChipError::SupportDeliveryFailed(err.to_string()))
    }
}
