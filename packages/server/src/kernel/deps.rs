//! Server dependencies for request handlers (using traits for testability)
//!
//! External services are constructed once at startup and injected explicitly;
//! handlers never build clients per request.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;

use aliyun::cloudauth::InitSmartVerifyRequest;
use aliyun::{CloudAuthClient, OssClient, SmsClient};

use crate::domains::auth::JwtService;
use crate::kernel::traits::{
    BaseIdentityService, BaseSmsService, BaseStorageService, InitVerifyParams,
};

// =============================================================================
// Dysms adapter (implements BaseSmsService)
// =============================================================================

pub struct DysmsAdapter {
    client: SmsClient,
    sign_name: String,
    template_code: String,
}

impl DysmsAdapter {
    pub fn new(client: SmsClient, sign_name: String, template_code: String) -> Self {
        Self {
            client,
            sign_name,
            template_code,
        }
    }
}

#[async_trait]
impl BaseSmsService for DysmsAdapter {
    async fn send_code(&self, phone: &str, code: &str) -> Result<()> {
        self.client
            .send_sms(
                phone,
                &self.sign_name,
                &self.template_code,
                &serde_json::json!({ "code": code }),
            )
            .await?;
        Ok(())
    }
}

// =============================================================================
// CloudAuth adapter (implements BaseIdentityService)
// =============================================================================

pub struct CloudAuthAdapter {
    client: CloudAuthClient,
    scene_id: i64,
    return_url: String,
}

impl CloudAuthAdapter {
    pub fn new(client: CloudAuthClient, scene_id: i64, return_url: String) -> Self {
        Self {
            client,
            scene_id,
            return_url,
        }
    }
}

#[async_trait]
impl BaseIdentityService for CloudAuthAdapter {
    async fn init_verify(&self, params: InitVerifyParams) -> Result<String> {
        let result = self
            .client
            .init_smart_verify(&InitSmartVerifyRequest {
                scene_id: self.scene_id,
                outer_order_no: params.outer_order_no,
                mode: "LIVENESS".to_string(),
                cert_name: params.cert_name,
                cert_no: params.cert_no,
                meta_info: params.meta_info,
                return_url: self.return_url.clone(),
            })
            .await?;
        Ok(result.certify_id)
    }

    async fn check_verify(&self, certify_id: &str) -> Result<bool> {
        let result = self
            .client
            .describe_smart_verify(self.scene_id, certify_id)
            .await?;
        Ok(result.is_passed())
    }
}

// =============================================================================
// OSS adapter (implements BaseStorageService)
// =============================================================================

pub struct OssAdapter(pub OssClient);

#[async_trait]
impl BaseStorageService for OssAdapter {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String> {
        Ok(self.0.put_object(key, body, content_type).await?)
    }

    fn presign_put(&self, key: &str, expires_secs: u64) -> String {
        self.0.presign_put(key, expires_secs, Utc::now())
    }

    fn public_url(&self, key: &str) -> String {
        self.0.public_url(key)
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to request handlers.
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    pub sms: Arc<dyn BaseSmsService>,
    pub identity: Arc<dyn BaseIdentityService>,
    pub storage: Arc<dyn BaseStorageService>,
    /// JWT service for session token creation and verification.
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        sms: Arc<dyn BaseSmsService>,
        identity: Arc<dyn BaseIdentityService>,
        storage: Arc<dyn BaseStorageService>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            db_pool,
            sms,
            identity,
            storage,
            jwt_service,
        }
    }
}
