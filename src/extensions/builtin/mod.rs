//! Built-in extensions compiled into the bot

pub mod utility;

pub use utility::UtilityExtension;
