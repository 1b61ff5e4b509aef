use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::UserId;

/// Session lifetime: fixed one year from issuance.
pub const SESSION_TTL_DAYS: i64 = 365;

/// JWT Claims - data stored in the session token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,      // Subject (user id as string)
    pub user_id: i64,     // Numeric user id
    pub open_id: String,  // Stable internal identifier
    pub nickname: String, // Display name (for logging/debugging)
    pub role: String,     // "user" | "admin"
    pub exp: i64,         // Expiration timestamp
    pub iat: i64,         // Issued at timestamp
    pub iss: String,      // Issuer
    pub jti: String,      // JWT ID (unique token identifier)
}

/// JWT Service - creates and verifies session tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    /// Create new JWT service with secret and issuer
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Create a new session token for a user.
    ///
    /// Tokens are stateless and expire after one year.
    pub fn create_token(
        &self,
        user_id: UserId,
        open_id: String,
        nickname: String,
        role: String,
    ) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::days(SESSION_TTL_DAYS);

        let claims = Claims {
            sub: user_id.to_string(),
            user_id: user_id.as_i64(),
            open_id,
            nickname,
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a session token.
    ///
    /// Returns claims if the token is valid and not expired.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}
