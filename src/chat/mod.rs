//! Chat front end
//!
//! Platform-neutral events and replies, command dispatch, message
//! rendering, and the support relay. The transport layer feeds this
//! module and never the other way around.

pub mod event;
pub mod format;
pub mod handler;
pub mod support;

pub use event::{Button, ChatEvent, ChatUser, EventPayload, Keyboard, Reply, ReplySink};
pub use handler::{ChatHandler, LEADERBOARD_SIZE};
pub use support::SupportRelay;
