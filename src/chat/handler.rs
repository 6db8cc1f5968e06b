//! Command dispatch: one inbound event in, replies out.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tracing::warn;

use crate::chat::event::{ChatEvent, EventPayload, Reply, ReplySink};
use crate::chat::format;
use crate::chat::support::SupportRelay;
use crate::errors::{ChipError, ChipResult};
use crate::games::GameKind;
use crate::ledger::UserId;
use crate::metrics::CasinoMetrics;
use crate::Casino;

/// Rows shown by /leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

/// Per-user conversational state plus the casino itself. One handler
/// serves every chat; per-user maps keep users out of each other's way.
pub struct ChatHandler {
    casino: Arc<Casino>,
    sink: Arc<dyn ReplySink>,
    relay: SupportRelay,
    metrics: Arc<CasinoMetrics>,
    awaiting_support: DashMap<UserId, ()>,
    display_names: DashMap<UserId, String>,
    suspense_delay: Duration,
}

impl ChatHandler {
    pub fn new(
        casino: Arc<Casino>,
        sink: Arc<dyn ReplySink>,
        relay: SupportRelay,
        metrics: Arc<CasinoMetrics>,
        suspense_delay: Duration,
    ) -> Self {
        Self {
            casino,
            sink,
            relay,
            metrics,
            awaiting_support: DashMap::new(),
            display_names: DashMap::new(),
            suspense_delay,
        }
    }

    /// Process one event end to end. Errors become a reply to the user,
    /// never a crash of the polling loop.
    pub async fn handle(&self, event: ChatEvent) {
        self.metrics.record_update();
        self.display_names
            .insert(event.user.id, event.user.display_name());

        if let Err(err) = self.dispatch(&event).await {
            self.metrics.record_error();
            if !err.is_user_error() {
                warn!("⚠️ update from user {} failed: {}", event.user.id, err);
            }
            self.deliver_error(event.chat_id, &err).await;
        }
    }

    async fn dispatch(&self, event: &ChatEvent) -> ChipResult<()> {
        match &event.payload {
            EventPayload::Command(command) => self.on_command(event, command).await,
            EventPayload::Button(payload) => self.on_button(event, payload).await,
            EventPayload::Text(text) => self.on_text(event, text).await,
        }
    }

    async fn on_command(&self, event: &ChatEvent, command: &str) -> ChipResult<()> {
        self.metrics.record_command();
        match command {
            "/start" => self.on_start(event).await,
            "/balance" => self.on_balance(event).await,
            "/daily" => self.on_daily(event).await,
            "/play" => self.on_play(event).await,
            "/leaderboard" => self.on_leaderboard(event).await,
            "/support" => self.on_support(event).await,
            // Commands are matched case sensitively; anything else,
            // including "/Start", gets the hint.
            _ => self.send_text(event.chat_id, format::unknown_hint()).await,
        }
    }

    async fn on_start(&self, event: &ChatEvent) -> ChipResult<()> {
        let account = self.casino.ledger().get_or_create(event.user.id);
        let text = format::welcome(&event.user.first_name, &account);
        self.send_text(event.chat_id, text).await
    }

    async fn on_balance(&self, event: &ChatEvent) -> ChipResult<()> {
        let account = self.casino.ledger().get_or_create(event.user.id);
        self.send_text(event.chat_id, format::balance_text(&account)).await
    }

    async fn on_daily(&self, event: &ChatEvent) -> ChipResult<()> {
        let grant = self.casino.bonus().claim(event.user.id)?;
        self.metrics.record_bonus(grant.amount);
        self.send_text(event.chat_id, format::bonus_text(&grant)).await
    }

    async fn on_play(&self, event: &ChatEvent) -> ChipResult<()> {
        let (text, keyboard) = format::game_menu();
        self.sink
            .send(Reply::with_keyboard(event.chat_id, text, keyboard))
            .await
    }

    async fn on_leaderboard(&self, event: &ChatEvent) -> ChipResult<()> {
        let entries = self.casino.ledger().snapshot_top(LEADERBOARD_SIZE);
        let text = format::leaderboard_text(&entries, |id| {
            self.display_names
                .get(&id)
                .map(|name| name.value().clone())
                .unwrap_or_else(|| format::fallback_name(id))
        });
        self.send_text(event.chat_id, text).await
    }

    async fn on_support(&self, event: &ChatEvent) -> ChipResult<()> {
        if !self.relay.is_available() {
            // Tell the user now rather than after they typed a message.
            return Err(ChipError::SupportUnavailable);
        }
        self.awaiting_support.insert(event.user.id, ());
        self.send_text(event.chat_id, format::support_prompt()).await
    }

    async fn on_button(&self, event: &ChatEvent, payload: &str) -> ChipResult<()> {
        match parse_wager_payload(payload) {
            Some((kind, stake)) => self.on_wager(event, kind, stake).await,
            None => self.send_text(event.chat_id, format::unknown_hint()).await,
        }
    }

    async fn on_wager(&self, event: &ChatEvent, kind: GameKind, stake: u64) -> ChipResult<()> {
        let settled = self.casino.resolver().resolve(event.user.id, kind, stake)?;
        self.metrics.record_wager(&settled);
        self.send_text(event.chat_id, format::wager_ack(kind, stake)).await?;
        if !self.suspense_delay.is_zero() {
            tokio::time::sleep(self.suspense_delay).await;
        }
        self.send_text(event.chat_id, format::outcome_text(&settled)).await
    }

    async fn on_text(&self, event: &ChatEvent, text: &str) -> ChipResult<()> {
        // One free-text message per /support request. The flag comes off
        // before the delivery attempt, so a failed forward does not leave
        // the user stuck in support mode.
        if self.awaiting_support.remove(&event.user.id).is_some() {
            self.relay
                .forward(self.sink.as_ref(), &event.user, text, event.received_at)
                .await?;
            self.metrics.record_support_forward();
            return self.send_text(event.chat_id, format::support_sent()).await;
        }
        self.send_text(event.chat_id, format::unknown_hint()).await
    }

    async fn deliver_error(&self, chat_id: i64, err: &ChipError) {
        let text = format::describe_error(err, self.casino.clock().now());
        if let Err(send_err) = self.sink.send(Reply::text(chat_id, text)).await {
            warn!("⚠️ failed to deliver an error reply: {send_err}");
        }
    }

    async fn send_text(&self, chat_id: i64, text: String) -> ChipResult<()> {
        self.sink.send(Reply::text(chat_id, text)).await
    }
}

/// Parse "wager:<game>:<stake>" button payloads.
fn parse_wager_payload(payload: &str) -> Option<(GameKind, u64)> {
    let rest = payload.strip_prefix("wager:")?;
    let (key, stake) = rest.split_once(':')?;
    let kind = GameKind::from_payload_key(key)?;
    let stake = stake.parse().ok()?;
    Some((kind, stake))
}
