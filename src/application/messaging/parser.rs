//! Message parser - Parses raw text into structured messages

use crate::domain::entities::{Message, User};

/// Parses incoming text against the configured command prefix
#[derive(Debug, Clone)]
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    /// Parse one raw text message
    pub fn parse(
        &self,
        channel_id: impl Into<String>,
        text: impl Into<String>,
        sender: Option<User>,
    ) -> Message {
        let text = text.into();
        let channel_id = channel_id.into();

        if let Some(rest) = text.strip_prefix(&self.command_prefix) {
            let mut parts = rest.split_whitespace();
            let name = parts.next().unwrap_or("").to_string();
            let args: Vec<String> = parts.map(str::to_string).collect();
            return Message::from_command(channel_id, name, args).with_sender_opt(sender);
        }

        Message::from_text(channel_id, text).with_sender_opt(sender)
    }
}
