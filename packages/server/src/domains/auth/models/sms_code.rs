use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::SmsCodeId;

/// Codes expire five minutes after issuance.
pub const CODE_TTL_SECS: i64 = 300;

/// At most one code per phone per minute.
const WINDOW_SHORT_SECS: i64 = 60;
/// At most ten codes per phone per hour.
const WINDOW_LONG_SECS: i64 = 3600;
const WINDOW_LONG_MAX: i64 = 10;

/// SmsCode - one issued verification code.
///
/// History is retained; only the most recent unused, unexpired record for a
/// phone is ever considered valid.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SmsCode {
    pub id: SmsCodeId,
    pub phone: String,
    pub code: String,
    pub used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of attempting to issue a code.
#[derive(Debug, PartialEq, Eq)]
pub enum IssueOutcome {
    Issued,
    /// A code was already issued within the last minute.
    TooFrequent,
    /// The hourly cap was reached.
    TooMany,
}

/// Generate a uniform 6-digit code; leading zeros are allowed.
pub fn generate_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl SmsCode {
    /// Rate-check and insert a code in one transaction.
    ///
    /// The transaction takes a per-phone advisory lock first, so two
    /// concurrent requests for the same number cannot both pass the window
    /// checks. Rejection happens before the insert: a throttled request
    /// leaves no record behind.
    pub async fn issue(phone: &str, code: &str, pool: &PgPool) -> Result<IssueOutcome> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(phone)
            .execute(&mut *tx)
            .await?;

        let recent: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sms_codes WHERE phone = $1 AND created_at > now() - make_interval(secs => $2)",
        )
        .bind(phone)
        .bind(WINDOW_SHORT_SECS as f64)
        .fetch_one(&mut *tx)
        .await?;
        if recent >= 1 {
            return Ok(IssueOutcome::TooFrequent);
        }

        let hourly: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sms_codes WHERE phone = $1 AND created_at > now() - make_interval(secs => $2)",
        )
        .bind(phone)
        .bind(WINDOW_LONG_SECS as f64)
        .fetch_one(&mut *tx)
        .await?;
        if hourly >= WINDOW_LONG_MAX {
            return Ok(IssueOutcome::TooMany);
        }

        sqlx::query(
            r#"
            INSERT INTO sms_codes (phone, code, expires_at)
            VALUES ($1, $2, now() + make_interval(secs => $3))
            "#,
        )
        .bind(phone)
        .bind(code)
        .bind(CODE_TTL_SECS as f64)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(IssueOutcome::Issued)
    }

    /// Consume a code: a single conditional UPDATE against the latest record
    /// for the phone. Matching is strictly latest-record based; an older code
    /// is dead the moment a newer one exists. The `used` guard makes the
    /// transition one-shot, so a replay of a consumed code fails.
    pub async fn consume(phone: &str, code: &str, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE sms_codes SET used = TRUE
            WHERE id = (
                SELECT id FROM sms_codes
                WHERE phone = $1
                ORDER BY created_at DESC, id DESC
                LIMIT 1
            )
            AND used = FALSE
            AND expires_at > now()
            AND code = $2
            "#,
        )
        .bind(phone)
        .bind(code)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Latest record for a phone, regardless of state. Test/inspection aid.
    pub async fn find_latest(phone: &str, pool: &PgPool) -> Result<Option<Self>> {
        let record = sqlx::query_as::<_, SmsCode>(
            "SELECT * FROM sms_codes WHERE phone = $1 ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(phone)
        .fetch_optional(pool)
        .await?;
        Ok(record)
    }

    /// Number of codes issued to a phone, total. Test/inspection aid.
    pub async fn count_for_phone(phone: &str, pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sms_codes WHERE phone = $1")
            .bind(phone)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn generated_codes_vary() {
        let codes: std::collections::HashSet<String> =
            (0..50).map(|_| generate_code()).collect();
        // 50 draws from a million values colliding down to 1 is practically
        // impossible; anything above 1 proves the generator isn't constant.
        assert!(codes.len() > 1);
    }
}
