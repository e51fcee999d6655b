//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading and persistence
//! - Adapters: Platform integrations (Discord, console)

pub mod adapters;
pub mod config;
