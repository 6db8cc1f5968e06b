//! Bot API HTTP client: long polling in, messages out.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chat::{ChatHandler, Reply, ReplySink};
use crate::errors::{ChipResult, TransportError};
use crate::telegram::types::{
    AnswerCallbackQuery, ApiResponse, GetUpdates, InlineKeyboardMarkup, SendMessage, Update,
};

const API_BASE: &str = "https://api.telegram.org";

/// Consecutive poll failures tolerated before the loop gives up.
pub const POLL_RETRY_BUDGET: u32 = 8;

/// The long-poll request itself waits server side, so the HTTP timeout
/// sits above the longest poll we ever ask for.
const HTTP_TIMEOUT_SECS: u64 = 65;

pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> ChipResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(TransportError::Http)?;
        Ok(Self {
            http,
            base_url: format!("{API_BASE}/bot{token}"),
        })
    }

    async fn call<R, P>(&self, method: &str, params: &P) -> ChipResult<R>
    where
        R: DeserializeOwned,
        P: Serialize,
    {
        let url = format!("{}/{}", self.base_url, method);
        let response = self
            .http
            .post(&url)
            .json(params)
            .send()
            .await
            .map_err(TransportError::Http)?;
        let envelope: ApiResponse<R> = response.json().await.map_err(TransportError::Http)?;
        if !envelope.ok {
            let description = envelope
                .description
                .unwrap_or_else(|| "no description".to_string());
            return Err(TransportError::Api(format!("{method}: {description}")).into());
        }
        envelope
            .result
            .ok_or_else(|| TransportError::Api(format!("{method}: empty result")).into())
    }

    pub async fn get_updates(&self, offset: i64, timeout: u64) -> ChipResult<Vec<Update>> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout,
                allowed_updates: &["message", "callback_query"],
            },
        )
        .await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: String,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> ChipResult<()> {
        let _: serde_json::Value = self
            .call(
                "sendMessage",
                &SendMessage {
                    chat_id,
                    text,
                    reply_markup,
                },
            )
            .await?;
        Ok(())
    }

    pub async fn answer_callback(&self, callback_id: &str) -> ChipResult<()> {
        let _: serde_json::Value = self
            .call(
                "answerCallbackQuery",
                &AnswerCallbackQuery {
                    callback_query_id: callback_id.to_string(),
                },
            )
            .await?;
        Ok(())
    }
}

/// `ReplySink` over the Bot API.
pub struct TelegramSink {
    client: Arc<TelegramClient>,
}

impl TelegramSink {
    pub fn new(client: Arc<TelegramClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReplySink for TelegramSink {
    async fn send(&self, reply: Reply) -> ChipResult<()> {
        let markup = reply.keyboard.as_ref().map(InlineKeyboardMarkup::from);
        self.client
            .send_message(reply.chat_id, reply.text, markup)
            .await
    }
}

/// The long-poll loop: fetch updates, advance the offset, hand each
/// update to its own task.
pub struct UpdatePoller {
    client: Arc<TelegramClient>,
    handler: Arc<ChatHandler>,
    poll_timeout_secs: u64,
}

impl UpdatePoller {
    pub fn new(client: Arc<TelegramClient>, handler: Arc<ChatHandler>, poll_timeout: Duration) -> Self {
        Self {
            client,
            handler,
            poll_timeout_secs: poll_timeout.as_secs(),
        }
    }

    /// Poll until `shutdown` resolves or the retry budget runs out.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send) -> ChipResult<()> {
        tokio::pin!(shutdown);
        let mut offset = 0i64;
        let mut failures = 0u32;

        info!("📡 Polling for updates (timeout {}s)", self.poll_timeout_secs);

        loop {
            let batch = tokio::select! {
                _ = &mut shutdown => {
                    info!("🛑 Update poller stopped");
                    return Ok(());
                }
                batch = self.client.get_updates(offset, self.poll_timeout_secs) => batch,
            };

            match batch {
                Ok(updates) => {
                    failures = 0;
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        self.dispatch(update);
                    }
                }
                Err(err) => {
                    failures += 1;
                    if failures >= POLL_RETRY_BUDGET {
                        return Err(TransportError::PollBudgetExhausted(failures).into());
                    }
                    let backoff = Duration::from_secs(backoff_secs(failures));
                    warn!(
                        "⚠️ getUpdates failed ({failures}/{POLL_RETRY_BUDGET}): {err}; retrying in {}s",
                        backoff.as_secs()
                    );
                    tokio::select! {
                        _ = &mut shutdown => {
                            info!("🛑 Update poller stopped during backoff");
                            return Ok(());
                        }
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }
    }

    /// One task per update so a slow chat never stalls the poll loop.
    fn dispatch(&self, update: Update) {
        let update_id = update.update_id;
        let Some(inbound) = update.to_event() else {
            debug!("skipping update {update_id} with no usable payload");
            return;
        };
        let client = Arc::clone(&self.client);
        let handler = Arc::clone(&self.handler);
        tokio::spawn(async move {
            // Ack the button press first so the client stops its spinner.
            if let Some(callback_id) = &inbound.callback_id {
                if let Err(err) = client.answer_callback(callback_id).await {
                    warn!("⚠️ failed to answer callback query: {err}");
                }
            }
            handler.handle(inbound.event).await;
        });
    }
}

fn backoff_secs(failures: u32) -> u64 {
    1 << failures.min(5)
}
