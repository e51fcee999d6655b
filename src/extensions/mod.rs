//! Extension system for cogbot
//!
//! Extensions are compiled-in modules that register groups of commands
//! (cogs) with the running bot. The manager owns their lifecycle.

pub mod builtin;
pub mod catalog;
pub mod manager;
pub mod registry;
pub mod trait_def;

pub use catalog::ExtensionCatalog;
pub use manager::{ExtensionManager, ExtensionOutcome};
pub use registry::{CommandInfo, CommandRegistry, RegistryView};
pub use trait_def::{Cog, Command, CommandContext, Extension};
