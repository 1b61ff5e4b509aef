use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::UserId;

/// User - account row backing both auth and the social surface.
///
/// `gender` and `is_verified` are only ever mutated by the identity
/// verification workflow; profile edits cannot touch them. Raw national IDs
/// and real names are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: String,
    pub phone: Option<String>,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub is_verified: bool,
    pub gender: i32,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_signed_in: DateTime<Utc>,
}

/// Public-safe projection: what other users may see.
///
/// Never exposes `phone`, `openId`, `email` or `role`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub nickname: String,
    pub avatar: Option<String>,
    pub gender: i32,
    pub is_verified: bool,
    pub bio: Option<String>,
}

/// Private projection returned to the account owner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub nickname: String,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub gender: i32,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Display name with the "用户{id}" fallback.
    pub fn display_name(&self) -> String {
        self.nickname
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| format!("用户{}", self.id))
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            nickname: self.display_name(),
            avatar: self.avatar.clone(),
            gender: self.gender,
            is_verified: self.is_verified,
            bio: self.bio.clone(),
        }
    }

    /// Placeholder for an author row that no longer resolves.
    pub fn public_placeholder(id: UserId) -> PublicUser {
        PublicUser {
            id,
            nickname: format!("用户{}", id),
            avatar: None,
            gender: 0,
            is_verified: false,
            bio: None,
        }
    }

    pub fn to_profile(&self) -> Profile {
        Profile {
            id: self.id,
            nickname: self.display_name(),
            avatar: self.avatar.clone(),
            phone: self.phone.clone(),
            bio: self.bio.clone(),
            gender: self.gender,
            is_verified: self.is_verified,
            verified_at: self.verified_at,
            created_at: self.created_at,
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl User {
    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_phone(phone: &str, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = $1")
            .bind(phone)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Batch lookup for resolving authors/senders.
    pub async fn find_many(ids: &[UserId], pool: &PgPool) -> Result<Vec<Self>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.as_i64()).collect();
        let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(&raw)
            .fetch_all(pool)
            .await?;
        Ok(users)
    }

    /// Auto-registration on first phone login. A concurrent first login for
    /// the same phone loses the unique-constraint race silently; the caller
    /// re-fetches the canonical row either way.
    pub async fn create_phone_user(phone: &str, pool: &PgPool) -> Result<()> {
        let open_id = format!("phone:{}", phone);
        let last4 = &phone[phone.len().saturating_sub(4)..];
        let nickname = format!("手机用户{}", last4);
        sqlx::query(
            r#"
            INSERT INTO users (open_id, phone, nickname, login_method, role)
            VALUES ($1, $2, $3, 'phone', 'user')
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(open_id)
        .bind(phone)
        .bind(nickname)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn touch_last_signed_in(id: UserId, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE users SET last_signed_in = now() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Profile edit: nickname/avatar/bio only. Verification fields are out of
    /// reach by construction.
    pub async fn update_profile(
        id: UserId,
        nickname: Option<&str>,
        avatar: Option<&str>,
        bio: Option<&str>,
        pool: &PgPool,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                nickname = COALESCE($2, nickname),
                avatar = COALESCE($3, avatar),
                bio = COALESCE($4, bio),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(nickname)
        .bind(avatar)
        .bind(bio)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Persist a passed identity verification. Terminal: there is no path
    /// back to unverified.
    pub async fn mark_verified(id: UserId, gender: i32, pool: &PgPool) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                is_verified = TRUE,
                gender = $2,
                verified_at = now(),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(gender)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn update_phone(id: UserId, phone: &str, pool: &PgPool) -> Result<()> {
        sqlx::query("UPDATE users SET phone = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(phone)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn search_by_nickname(keyword: &str, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let pattern = format!("%{}%", keyword);
        let users =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE nickname LIKE $1 LIMIT $2")
                .bind(pattern)
                .bind(limit)
                .fetch_all(pool)
                .await?;
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: UserId::from_i64(3),
            open_id: "phone:13800138000".to_string(),
            name: None,
            email: Some("private@example.com".to_string()),
            login_method: Some("phone".to_string()),
            role: "user".to_string(),
            phone: Some("13800138000".to_string()),
            nickname: None,
            avatar: None,
            bio: Some("hello".to_string()),
            is_verified: false,
            gender: 0,
            verified_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_signed_in: Utc::now(),
        }
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let mut user = sample_user();
        assert_eq!(user.display_name(), "用户3");
        user.nickname = Some("小明".to_string());
        assert_eq!(user.display_name(), "小明");
    }

    #[test]
    fn public_projection_excludes_private_fields() {
        let user = sample_user();
        let value = serde_json::to_value(user.to_public()).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("phone"));
        assert!(!object.contains_key("openId"));
        assert!(!object.contains_key("open_id"));
        assert!(!object.contains_key("email"));
        assert!(!object.contains_key("role"));
        assert_eq!(object["nickname"], "用户3");
    }

    #[test]
    fn profile_projection_excludes_open_id_and_email() {
        let user = sample_user();
        let value = serde_json::to_value(user.to_profile()).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("phone"));
        assert!(!object.contains_key("openId"));
        assert!(!object.contains_key("email"));
        assert!(!object.contains_key("role"));
    }
}
