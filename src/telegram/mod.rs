//! Telegram transport
//!
//! Thin Bot API layer: wire types, an HTTP client, and the long-poll
//! loop. Everything casino-shaped lives behind the chat module's
//! neutral types.

pub mod client;
pub mod types;

pub use client::{TelegramClient, TelegramSink, UpdatePoller, POLL_RETRY_BUDGET};
pub use types::{InboundEvent, Update};
