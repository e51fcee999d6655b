//! Domain layer - Core business objects with no external dependencies
//!
//! This layer contains:
//! - Entities: Core business objects (User, Message)
//! - Traits: Abstractions for infrastructure (Gateway)

pub mod entities;
pub mod traits;
