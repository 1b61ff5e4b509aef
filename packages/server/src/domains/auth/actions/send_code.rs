//! Send verification code action

use tracing::{info, warn};

use crate::common::validation::validate_phone;
use crate::common::{AppError, AppResult};
use crate::domains::auth::models::{generate_code, IssueOutcome, SmsCode, CODE_TTL_SECS};
use crate::kernel::ServerDeps;

/// Result of a successful send: how long the code stays valid.
#[derive(Debug)]
pub struct CodeSent {
    pub ttl: i64,
}

/// Issue a verification code and hand it to the SMS collaborator.
///
/// Rate limiting is fail-fast with no side effects: a throttled request
/// inserts nothing. A delivery failure after the insert does NOT roll the
/// record back - the code stays valid server-side and the response still
/// reports success, so the client can retry entry or wait for a re-send.
pub async fn send_code(phone: &str, deps: &ServerDeps) -> AppResult<CodeSent> {
    validate_phone(phone)?;

    let code = generate_code();
    match SmsCode::issue(phone, &code, &deps.db_pool).await? {
        IssueOutcome::TooFrequent => {
            return Err(AppError::RateLimited("发送太频繁，请稍后再试".to_string()))
        }
        IssueOutcome::TooMany => {
            return Err(AppError::RateLimited("发送次数过多，请明天再试".to_string()))
        }
        IssueOutcome::Issued => {}
    }

    if let Err(e) = deps.sms.send_code(phone, &code).await {
        // Deliberate: the stored code remains valid even though delivery
        // failed, at the cost of a wasted rate-limit slot.
        warn!(phone = %phone, error = %e, "SMS delivery failed; code kept");
    } else {
        info!(phone = %phone, "verification code sent");
    }

    Ok(CodeSent { ttl: CODE_TTL_SECS })
}
