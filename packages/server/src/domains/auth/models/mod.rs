pub mod sms_code;

pub use sms_code::{generate_code, IssueOutcome, SmsCode, CODE_TTL_SECS};
