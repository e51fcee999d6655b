//! Extension trait definitions

use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::domain::entities::{Content, Message};
use crate::extensions::registry::RegistryView;

/// Context handed to a command handler at dispatch time
#[derive(Clone)]
pub struct CommandContext {
    pub message: Message,
    /// Round-trip latency to the platform, as measured by the gateway
    pub latency_ms: f64,
    /// Read-only registry snapshot taken just before dispatch
    pub view: RegistryView,
}

impl CommandContext {
    pub fn args(&self) -> &[String] {
        match &self.message.content {
            Content::Command { args, .. } => args,
            _ => &[],
        }
    }
}

/// Command handler function type
pub type Handler = Arc<dyn Fn(&CommandContext) -> Result<String, CommandError> + Send + Sync>;

/// A single chat command
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    /// Hidden commands are excluded from help output
    pub hidden: bool,
    pub owner_only: bool,
    pub handler: Handler,
}

impl Command {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&CommandContext) -> Result<String, CommandError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            hidden: false,
            owner_only: false,
            handler: Arc::new(handler),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn owner_only(mut self) -> Self {
        self.owner_only = true;
        self
    }
}

/// A named group of related commands
#[derive(Clone, Default)]
pub struct Cog {
    pub name: String,
    pub commands: Vec<Command>,
}

impl Cog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    pub fn with_command(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }
}

/// Core trait every loadable extension implements
///
/// Setup is staged: the returned cogs are committed to the registry only on
/// `Ok`, so a failed setup never leaves partial registrations behind.
pub trait Extension: Send + Sync {
    /// Unique identifier, the name used in config and lifecycle commands
    fn name(&self) -> &str;

    /// Build the cogs this extension contributes
    fn setup(&self) -> Result<Vec<Cog>, String>;
}
