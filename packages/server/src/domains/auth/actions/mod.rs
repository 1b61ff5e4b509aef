pub mod send_code;
pub mod verify_code;

pub use send_code::{send_code, CodeSent};
pub use verify_code::{verify_code, VerifiedLogin};
