//! Auth domain - phone login with SMS verification codes
//!
//! Responsibilities:
//! - Rate-limited code issuance via the SMS collaborator
//! - One-shot code verification against the latest record per phone
//! - Session issuance: auto-registration, JWT minting, session cookie

pub mod actions;
pub mod cookie;
pub mod jwt;
pub mod models;

pub use cookie::{clear_session_cookie, session_cookie, SESSION_COOKIE};
pub use jwt::{Claims, JwtService};
