//! Users domain - accounts, profiles and the public/private projections.

pub mod actions;
pub mod models;

pub use models::{Profile, PublicUser, User};
