//! Discord adapter
//!
//! Talks to the Discord HTTP API. The realtime gateway socket and its
//! reconnection logic belong to the platform and are not reimplemented
//! here: inbound messages are taken in by polling the configured channels,
//! and latency is the measured round trip of the most recent API call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tracing::warn;

use crate::application::errors::BotError;
use crate::application::messaging::MessageParser;
use crate::domain::entities::{Message, User};
use crate::domain::traits::{Gateway, GatewayIdentity};

/// Discord API base URL
const API_BASE: &str = "https://discord.com/api/v10";

/// Pause between polling rounds when no messages arrived
const IDLE_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Wire format for a Discord user
#[derive(Debug, Clone, Deserialize)]
struct ApiUser {
    id: String,
    username: String,
    #[serde(default)]
    bot: bool,
}

/// Wire format for a channel message
#[derive(Debug, Clone, Deserialize)]
struct ApiMessage {
    id: String,
    channel_id: String,
    content: String,
    author: ApiUser,
    timestamp: DateTime<Utc>,
}

/// One polling round for one channel
struct PollPlan {
    path: String,
    seeding: bool,
}

/// Discord bot adapter
pub struct DiscordAdapter {
    token: String,
    client: Client,
    parser: MessageParser,
    channels: Vec<String>,
    /// Last seen message id per channel, snowflake as decimal string
    cursors: HashMap<String, String>,
    /// Channels whose first poll already ran; tracked separately from the
    /// cursors because a channel can be empty when it is seeded
    seeded: HashSet<String>,
    self_id: Option<u64>,
    latency_ms: f64,
}

impl DiscordAdapter {
    pub fn new(token: impl Into<String>, parser: MessageParser, channels: Vec<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            parser,
            channels,
            cursors: HashMap::new(),
            seeded: HashSet::new(),
            self_id: None,
            latency_ms: 0.0,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", API_BASE, path)
    }

    fn auth_header(&self) -> String {
        format!("Bot {}", self.token)
    }

    async fn get_json<T: DeserializeOwned>(&mut self, path: &str) -> Result<T, BotError> {
        let url = self.api_url(path);
        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;
        self.latency_ms = started.elapsed().as_secs_f64() * 1000.0;

        if !response.status().is_success() {
            return Err(BotError::Network(format!(
                "API returned {} for {}",
                response.status(),
                path
            )));
        }
        response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))
    }

    /// Decide the request for one channel, and whether it only seeds the cursor
    fn plan_poll(&self, channel: &str) -> PollPlan {
        match (self.cursors.get(channel), self.seeded.contains(channel)) {
            (Some(after), _) => PollPlan {
                path: format!("/channels/{}/messages?after={}&limit=50", channel, after),
                seeding: false,
            },
            // Seeded while empty: everything that shows up now is live traffic.
            (None, true) => PollPlan {
                path: format!("/channels/{}/messages?limit=50", channel),
                seeding: false,
            },
            // First poll only seeds the cursor; history is not replayed.
            (None, false) => PollPlan {
                path: format!("/channels/{}/messages?limit=1", channel),
                seeding: true,
            },
        }
    }

    /// Record a fetched batch and return the messages to deliver, oldest first
    fn apply_poll(
        &mut self,
        channel: &str,
        mut batch: Vec<ApiMessage>,
        seeding: bool,
    ) -> Vec<ApiMessage> {
        // The API returns newest first; snowflakes order chronologically.
        batch.sort_by_key(|message| message.id.parse::<u64>().unwrap_or(0));

        if let Some(newest) = batch.last() {
            self.cursors
                .insert(channel.to_string(), newest.id.clone());
        }
        if seeding {
            self.seeded.insert(channel.to_string());
            return Vec::new();
        }
        batch
    }

    /// Fetch new messages from one channel, oldest first
    async fn poll_channel(&mut self, channel: &str) -> Result<Vec<ApiMessage>, BotError> {
        let plan = self.plan_poll(channel);
        let batch = self.get_json(&plan.path).await?;
        Ok(self.apply_poll(channel, batch, plan.seeding))
    }

    fn to_domain(&self, api: ApiMessage) -> Message {
        let sender = User::new(api.author.id.parse().unwrap_or(0))
            .with_username(api.author.username)
            .bot(api.author.bot);
        self.parser
            .parse(api.channel_id, api.content, Some(sender))
            .with_id(api.id)
            .with_timestamp(api.timestamp)
    }
}

#[async_trait]
impl Gateway for DiscordAdapter {
    async fn connect(&mut self) -> Result<GatewayIdentity, BotError> {
        let me: ApiUser = self.get_json("/users/@me").await?;
        let id = me
            .id
            .parse::<u64>()
            .map_err(|e| BotError::Parse(e.to_string()))?;
        self.self_id = Some(id);
        Ok(GatewayIdentity {
            id,
            username: me.username,
        })
    }

    async fn poll_messages(&mut self) -> Result<Vec<Message>, BotError> {
        let mut inbound = Vec::new();
        let channels = self.channels.clone();
        for channel in &channels {
            let batch = match self.poll_channel(channel).await {
                Ok(batch) => batch,
                Err(e) => {
                    warn!("Polling channel {} failed: {}", channel, e);
                    continue;
                }
            };
            for api in batch {
                // Skip our own messages and other bots
                let author_id = api.author.id.parse::<u64>().ok();
                if api.author.bot || author_id == self.self_id {
                    continue;
                }
                inbound.push(self.to_domain(api));
            }
        }
        if inbound.is_empty() {
            tokio::time::sleep(IDLE_POLL_INTERVAL).await;
        }
        Ok(inbound)
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), BotError> {
        let url = self.api_url(&format!("/channels/{}/messages", channel_id));
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth_header())
            .json(&serde_json::json!({ "content": text }))
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!(
                "Sending to channel {} returned {}",
                channel_id,
                response.status()
            )));
        }
        Ok(())
    }

    fn latency_ms(&self) -> f64 {
        self.latency_ms
    }
}
