// HTTP route handlers
pub mod auth;
pub mod conversations;
pub mod health;
pub mod posts;
pub mod search;
pub mod sms;
pub mod uploads;
pub mod users;
pub mod verify;

pub use auth::*;
pub use conversations::*;
pub use health::*;
pub use posts::*;
pub use search::*;
pub use sms::*;
pub use uploads::*;
pub use users::*;
pub use verify::*;
