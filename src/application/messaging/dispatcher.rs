//! Message dispatcher - Routes commands to lifecycle operations and handlers

use tracing::debug;

use crate::application::errors::BotError;
use crate::domain::entities::{Content, Message};
use crate::extensions::{CommandContext, ExtensionManager, ExtensionOutcome};

/// Built-in extension lifecycle commands, owner-only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleOp {
    Load,
    Unload,
    Reload,
}

impl LifecycleOp {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "load" => Some(Self::Load),
            "unload" => Some(Self::Unload),
            "reload" => Some(Self::Reload),
            _ => None,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Unload => "unload",
            Self::Reload => "reload",
        }
    }
}

/// Routes parsed messages: built-in lifecycle commands first, then the
/// command registry. One message runs to completion before the next.
pub struct MessageDispatcher {
    manager: ExtensionManager,
    command_prefix: String,
    owner_id: u64,
    debug: bool,
}

impl MessageDispatcher {
    pub fn new(
        manager: ExtensionManager,
        command_prefix: impl Into<String>,
        owner_id: u64,
        debug: bool,
    ) -> Self {
        Self {
            manager,
            command_prefix: command_prefix.into(),
            owner_id,
            debug,
        }
    }

    pub fn manager(&self) -> &ExtensionManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut ExtensionManager {
        &mut self.manager
    }

    fn is_owner(&self, message: &Message) -> bool {
        message
            .sender
            .as_ref()
            .map(|user| user.id == self.owner_id)
            .unwrap_or(false)
    }

    /// Handle one message. `Ok(None)` means no reply: non-command text,
    /// an unknown command, or a failed owner check.
    pub fn handle(
        &mut self,
        message: &Message,
        latency_ms: f64,
    ) -> Result<Option<String>, BotError> {
        let Content::Command { name, .. } = &message.content else {
            return Ok(None);
        };

        if let Some(op) = LifecycleOp::from_name(name) {
            return self.handle_lifecycle(op, message);
        }

        let (handler, owner_only) = match self.manager.registry().find(name) {
            Some(command) => (command.handler.clone(), command.owner_only),
            None => return Ok(None),
        };
        if owner_only && !self.is_owner(message) {
            debug!("Ignoring owner-only command '{}' from non-owner", name);
            return Ok(None);
        }

        let ctx = CommandContext {
            message: message.clone(),
            latency_ms,
            view: self.manager.view(),
        };
        Ok(Some(handler(&ctx)?))
    }

    fn handle_lifecycle(
        &mut self,
        op: LifecycleOp,
        message: &Message,
    ) -> Result<Option<String>, BotError> {
        if !self.is_owner(message) {
            let who = message
                .sender
                .as_ref()
                .map(|user| user.display_name())
                .unwrap_or_else(|| "unknown".to_string());
            debug!("Ignoring '{}' from non-owner {}", op.verb(), who);
            return Ok(None);
        }

        let Content::Command { args, .. } = &message.content else {
            return Ok(None);
        };
        let Some(target) = args.first() else {
            return Ok(Some(format!(
                "Usage: {}{} <extension>",
                self.command_prefix,
                op.verb()
            )));
        };

        let outcome = match op {
            LifecycleOp::Load => self.manager.load(target),
            LifecycleOp::Unload => self.manager.unload(target),
            LifecycleOp::Reload => self.manager.reload(target),
        };
        outcome.log(target);

        // Fail loudly in development, degrade gracefully in production.
        if self.debug {
            if let ExtensionOutcome::SetupFailed(cause) = &outcome {
                return Err(BotError::ExtensionSetup {
                    name: target.clone(),
                    cause: cause.clone(),
                });
            }
        }

        let reply = match (op, &outcome) {
            (LifecycleOp::Reload, ExtensionOutcome::Loaded) => format!(
                ":white_check_mark: Extension '{}' reloaded successfully!",
                target
            ),
            _ => outcome.reply(target),
        };
        Ok(Some(reply))
    }
}
