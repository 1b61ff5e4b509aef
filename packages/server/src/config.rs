use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Set the Secure flag on the session cookie (on in production).
    pub cookie_secure: bool,
    pub allowed_origins: Vec<String>,
    // CloudAuth identity verification
    pub aliyun_access_key: String,
    pub aliyun_access_secret: String,
    pub aliyun_scene_id: i64,
    pub verify_return_url: String,
    // Dysms SMS delivery
    pub sms_access_key_id: String,
    pub sms_access_key_secret: String,
    pub sms_sign_name: String,
    pub sms_template_code: String,
    // OSS object storage
    pub oss_region: String,
    pub oss_bucket: String,
    pub oss_access_key_id: String,
    pub oss_access_key_secret: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "cosync".to_string()),
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
            aliyun_access_key: env::var("ALIYUN_ACCESS_KEY")
                .context("ALIYUN_ACCESS_KEY must be set")?,
            aliyun_access_secret: env::var("ALIYUN_ACCESS_SECRET")
                .context("ALIYUN_ACCESS_SECRET must be set")?,
            aliyun_scene_id: env::var("ALIYUN_SCENE_ID")
                .context("ALIYUN_SCENE_ID must be set")?
                .parse()
                .context("ALIYUN_SCENE_ID must be a number")?,
            verify_return_url: env::var("VERIFY_RETURN_URL")
                .context("VERIFY_RETURN_URL must be set")?,
            sms_access_key_id: env::var("SMS_ACCESS_KEY_ID")
                .context("SMS_ACCESS_KEY_ID must be set")?,
            sms_access_key_secret: env::var("SMS_ACCESS_KEY_SECRET")
                .context("SMS_ACCESS_KEY_SECRET must be set")?,
            sms_sign_name: env::var("SMS_SIGN_NAME").context("SMS_SIGN_NAME must be set")?,
            sms_template_code: env::var("SMS_TEMPLATE_CODE")
                .context("SMS_TEMPLATE_CODE must be set")?,
            oss_region: env::var("OSS_REGION").unwrap_or_else(|_| "oss-cn-hangzhou".to_string()),
            oss_bucket: env::var("OSS_BUCKET").context("OSS_BUCKET must be set")?,
            oss_access_key_id: env::var("OSS_ACCESS_KEY_ID")
                .context("OSS_ACCESS_KEY_ID must be set")?,
            oss_access_key_secret: env::var("OSS_ACCESS_KEY_SECRET")
                .context("OSS_ACCESS_KEY_SECRET must be set")?,
        })
    }
}
