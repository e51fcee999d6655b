//! Built-in utility extension - read-only diagnostics over the registry

use crate::application::errors::CommandError;
use crate::extensions::registry::RegistryView;
use crate::extensions::trait_def::{Cog, Command, CommandContext, Extension};

/// Diagnostic commands: ping, list, help, version
pub struct UtilityExtension;

impl Extension for UtilityExtension {
    fn name(&self) -> &str {
        "utility"
    }

    fn setup(&self) -> Result<Vec<Cog>, String> {
        let cog = Cog::new("Utility")
            .with_command(Command::new("ping", ping).with_description("Returns the bot's latency"))
            .with_command(
                Command::new("list", list)
                    .with_description("Lists the cogs and extensions currently loaded")
                    .hidden(),
            )
            .with_command(
                Command::new("help", help).with_description("Shows the available commands"),
            )
            .with_command(
                Command::new("version", version).with_description("Shows the bot version"),
            );
        Ok(vec![cog])
    }
}

fn ping(ctx: &CommandContext) -> Result<String, CommandError> {
    Ok(format!(":ping_pong: Pong! {}ms", ctx.latency_ms))
}

fn list(ctx: &CommandContext) -> Result<String, CommandError> {
    match ctx.args().first().map(String::as_str) {
        Some("cogs") => Ok(cog_block(&ctx.view)),
        Some("extensions") => Ok(extension_block(&ctx.view)),
        _ => Ok(format!(
            "{}\n{}",
            cog_block(&ctx.view),
            extension_block(&ctx.view)
        )),
    }
}

fn help(ctx: &CommandContext) -> Result<String, CommandError> {
    let mut message = String::from("Available commands:");
    for command in ctx.view.commands.iter().filter(|c| !c.hidden) {
        message.push_str(&format!(
            "\n  {} - {}",
            command.name,
            command.description.as_deref().unwrap_or("No description")
        ));
    }
    Ok(message)
}

fn version(_ctx: &CommandContext) -> Result<String, CommandError> {
    Ok(format!("cogbot v{}", env!("CARGO_PKG_VERSION")))
}

// Registry iteration order, never sorted.
fn cog_block(view: &RegistryView) -> String {
    let mut message = String::from("```Cogs:");
    for name in &view.cogs {
        message.push_str("\n  ");
        message.push_str(name);
    }
    message.push_str("```");
    message
}

fn extension_block(view: &RegistryView) -> String {
    let mut message = String::from("```Extensions:");
    for name in &view.extensions {
        message.push_str("\n  ");
        message.push_str(name);
    }
    message.push_str("```");
    message
}
