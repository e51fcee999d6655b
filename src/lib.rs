//! cogbot - a minimal extension-driven chat bot
//!
//! Command dispatch over a platform gateway, with a JSON configuration
//! loader and an extension lifecycle manager. The gateway itself (the
//! persistent platform connection) is an external collaborator behind the
//! [`domain::traits::Gateway`] trait.

pub mod application;
pub mod domain;
pub mod extensions;
pub mod infrastructure;
