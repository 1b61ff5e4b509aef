// Aliyun OpenAPI clients used by the CoSync backend:
// Dysms (SMS delivery), CloudAuth (smart identity verification) and OSS
// (object storage). All requests are signed with the ACS3-HMAC-SHA256 /
// OSS V4 schemes so no vendor SDK is needed.

pub mod cloudauth;
pub mod models;
pub mod oss;
pub mod sign;
pub mod sms;

pub use cloudauth::CloudAuthClient;
pub use models::{DescribeSmartVerifyResult, InitSmartVerifyResult, SendSmsResult};
pub use oss::OssClient;
pub use sms::SmsClient;

use thiserror::Error;

/// Errors surfaced by any of the Aliyun clients.
#[derive(Debug, Error)]
pub enum AliyunError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("aliyun api error {code}: {message}")]
    Api { code: String, message: String },

    #[error("unexpected response shape: {0}")]
    Parse(String),
}

/// Shared credentials for an Aliyun API client.
#[derive(Debug, Clone)]
pub struct AliyunOptions {
    pub access_key_id: String,
    pub access_key_secret: String,
}

/// Default timeout for all outbound Aliyun calls.
///
/// External calls must never block a request indefinitely; the caller treats
/// a timeout like any other delivery failure.
pub(crate) const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_default()
}
