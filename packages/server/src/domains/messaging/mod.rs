//! Messaging domain - private and group conversations.

pub mod actions;
pub mod models;

pub use models::{Conversation, ConversationMember, Message};
