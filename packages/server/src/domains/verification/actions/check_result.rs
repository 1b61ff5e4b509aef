//! Poll the verification outcome and sync gender on success.

use tracing::info;

use crate::common::validation::validate_id_number;
use crate::common::{AppError, AppResult, UserId};
use crate::domains::users::models::User;
use crate::domains::verification::gender::derive_gender;
use crate::kernel::ServerDeps;

/// Outcome of a result poll.
#[derive(Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Liveness check passed; gender was derived and persisted.
    Passed { gender: i32 },
    /// Not passed (failed, expired or still pending). Nothing was mutated;
    /// the user may start over with a new init.
    NotPassed,
}

pub async fn check_result(
    user_id: UserId,
    certify_id: &str,
    id_number: &str,
    deps: &ServerDeps,
) -> AppResult<CheckOutcome> {
    validate_id_number(id_number)?;

    let passed = deps
        .identity
        .check_verify(certify_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "DescribeSmartVerify failed");
            AppError::ExternalService("认证服务暂时不可用，请稍后重试".to_string())
        })?;

    if !passed {
        return Ok(CheckOutcome::NotPassed);
    }

    let gender = derive_gender(id_number);
    User::mark_verified(user_id, gender, &deps.db_pool).await?;

    info!(user_id = %user_id, gender, "identity verified");
    Ok(CheckOutcome::Passed { gender })
}
