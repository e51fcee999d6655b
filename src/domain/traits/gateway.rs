use async_trait::async_trait;
use std::fmt;

use crate::application::errors::BotError;
use crate::domain::entities::Message;

/// Gateway trait - abstraction for the platform connection
///
/// The platform owns the hard problems (connection, reconnection, rate
/// limiting, event delivery); adapters translate its wire format into
/// domain messages.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Establish the connection and report the bot's own identity
    async fn connect(&mut self) -> Result<GatewayIdentity, BotError>;

    /// Take in the next batch of inbound messages, already parsed
    async fn poll_messages(&mut self) -> Result<Vec<Message>, BotError>;

    /// Send a text message to a channel
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), BotError>;

    /// Most recently measured round-trip latency to the platform, in ms
    fn latency_ms(&self) -> f64;
}

/// Identity the platform reports for the bot account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayIdentity {
    pub id: u64,
    pub username: String,
}

impl fmt::Display for GatewayIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username)
    }
}
