pub mod check_result;
pub mod init;

pub use check_result::{check_result, CheckOutcome};
pub use init::{init_verify, VerifyInitiated};
