//! Posts domain - the feed, likes and comments.

pub mod actions;
pub mod models;

pub use models::{Comment, Like, Post};
