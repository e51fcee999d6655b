//! Domain entities - Core business objects

pub mod message;
pub mod user;

pub use message::{Content, Message};
pub use user::User;
