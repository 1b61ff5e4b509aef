// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. Business rules
// (rate limiting, gender derivation, ...) live in domain code that uses them.

use anyhow::Result;
use async_trait::async_trait;

// =============================================================================
// SMS delivery (Dysms)
// =============================================================================

#[async_trait]
pub trait BaseSmsService: Send + Sync {
    /// Deliver a verification code to a phone number via the configured
    /// sign name and template.
    async fn send_code(&self, phone: &str, code: &str) -> Result<()>;
}

// =============================================================================
// Identity verification (CloudAuth smart verify)
// =============================================================================

/// Caller-supplied fields for opening a verification order.
#[derive(Debug, Clone)]
pub struct InitVerifyParams {
    /// Unique per-attempt order reference.
    pub outer_order_no: String,
    pub cert_name: String,
    pub cert_no: String,
    /// Device metadata blob collected by the client SDK.
    pub meta_info: String,
}

#[async_trait]
pub trait BaseIdentityService: Send + Sync {
    /// Open a verification order; returns the provider's `certify_id`.
    async fn init_verify(&self, params: InitVerifyParams) -> Result<String>;

    /// Poll the outcome for a `certify_id`; true when the liveness check
    /// passed.
    async fn check_verify(&self, certify_id: &str) -> Result<bool>;
}

// =============================================================================
// Object storage (OSS)
// =============================================================================

#[async_trait]
pub trait BaseStorageService: Send + Sync {
    /// Upload raw bytes, returning the public URL.
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String>;

    /// Pre-signed direct-upload PUT URL with the given expiry.
    fn presign_put(&self, key: &str, expires_secs: u64) -> String;

    /// Public URL an uploaded object will be served from.
    fn public_url(&self, key: &str) -> String;
}
