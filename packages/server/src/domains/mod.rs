pub mod auth;
pub mod messaging;
pub mod posts;
pub mod uploads;
pub mod users;
pub mod verification;
