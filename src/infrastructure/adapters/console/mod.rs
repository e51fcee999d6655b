//! Console adapter for development/testing

use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

use crate::application::errors::BotError;
use crate::application::messaging::MessageParser;
use crate::domain::entities::{Message, User};
use crate::domain::traits::{Gateway, GatewayIdentity};

/// Console bot adapter for local development
///
/// Lines typed on stdin are attributed to the configured owner so the
/// lifecycle commands are exercisable without a platform connection.
pub struct ConsoleAdapter {
    parser: MessageParser,
    owner: User,
    reader: BufReader<Stdin>,
}

impl ConsoleAdapter {
    pub fn new(parser: MessageParser, owner_id: u64) -> Self {
        Self {
            parser,
            owner: User::new(owner_id).with_username("console"),
            reader: BufReader::new(tokio::io::stdin()),
        }
    }
}

#[async_trait]
impl Gateway for ConsoleAdapter {
    async fn connect(&mut self) -> Result<GatewayIdentity, BotError> {
        tracing::info!("Starting console bot (dev mode)");
        Ok(GatewayIdentity {
            id: 0,
            username: "console".to_string(),
        })
    }

    async fn poll_messages(&mut self) -> Result<Vec<Message>, BotError> {
        print!("> ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;
        if read == 0 {
            // stdin closed; park until the process is terminated
            tracing::info!("stdin closed");
            std::future::pending::<()>().await;
        }

        let text = line.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        Ok(vec![self
            .parser
            .parse("console", text, Some(self.owner.clone()))])
    }

    async fn send_message(&self, _channel_id: &str, text: &str) -> Result<(), BotError> {
        println!("[BOT] {}", text);
        Ok(())
    }

    fn latency_ms(&self) -> f64 {
        0.0
    }
}
