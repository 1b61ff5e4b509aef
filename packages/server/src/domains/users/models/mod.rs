pub mod user;

pub use user::{Profile, PublicUser, User};
