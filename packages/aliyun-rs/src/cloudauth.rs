//! CloudAuth smart identity verification client.
//!
//! Two-step flow: `init_smart_verify` opens a verification order and returns
//! a `certify_id` the user completes out-of-band (liveness capture in a web
//! view), then `describe_smart_verify` polls the outcome for that id.

use chrono::Utc;
use reqwest::Client;
use uuid::Uuid;

use crate::models::{CloudAuthEnvelope, DescribeSmartVerifyResult, InitSmartVerifyResult};
use crate::sign::sign_rpc_request;
use crate::{AliyunError, AliyunOptions};

const ENDPOINT: &str = "cloudauth.aliyuncs.com";
const VERSION: &str = "2019-03-07";

#[derive(Debug, Clone)]
pub struct CloudAuthClient {
    options: AliyunOptions,
    client: Client,
}

/// Parameters for `InitSmartVerify`.
#[derive(Debug, Clone)]
pub struct InitSmartVerifyRequest {
    pub scene_id: i64,
    /// Unique per-attempt order reference, supplied by the caller.
    pub outer_order_no: String,
    pub mode: String,
    pub cert_name: String,
    pub cert_no: String,
    pub meta_info: String,
    pub return_url: String,
}

impl CloudAuthClient {
    pub fn new(options: AliyunOptions) -> Self {
        Self {
            options,
            client: crate::http_client(),
        }
    }

    pub async fn init_smart_verify(
        &self,
        request: &InitSmartVerifyRequest,
    ) -> Result<InitSmartVerifyResult, AliyunError> {
        let params = vec![
            ("SceneId".to_string(), request.scene_id.to_string()),
            ("OuterOrderNo".to_string(), request.outer_order_no.clone()),
            ("Mode".to_string(), request.mode.clone()),
            ("CertName".to_string(), request.cert_name.clone()),
            ("CertNo".to_string(), request.cert_no.clone()),
            ("MetaInfo".to_string(), request.meta_info.clone()),
            ("ReturnUrl".to_string(), request.return_url.clone()),
        ];
        self.call::<InitSmartVerifyResult>("InitSmartVerify", params)
            .await
    }

    pub async fn describe_smart_verify(
        &self,
        scene_id: i64,
        certify_id: &str,
    ) -> Result<DescribeSmartVerifyResult, AliyunError> {
        let params = vec![
            ("SceneId".to_string(), scene_id.to_string()),
            ("CertifyId".to_string(), certify_id.to_string()),
        ];
        self.call::<DescribeSmartVerifyResult>("DescribeSmartVerify", params)
            .await
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        params: Vec<(String, String)>,
    ) -> Result<T, AliyunError> {
        let nonce = Uuid::new_v4().to_string();
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let signed = sign_rpc_request(
            &self.options.access_key_id,
            &self.options.access_key_secret,
            ENDPOINT,
            action,
            VERSION,
            &params,
            &nonce,
            &timestamp,
        );

        let url = format!("https://{}/?{}", ENDPOINT, signed.query);
        let mut request = self
            .client
            .post(url)
            .header("Authorization", signed.authorization);
        for (name, value) in &signed.headers {
            if name != "host" {
                request = request.header(name.as_str(), value.as_str());
            }
        }

        let envelope: CloudAuthEnvelope<T> = request
            .send()
            .await?
            .json()
            .await
            .map_err(|e| AliyunError::Parse(e.to_string()))?;

        // CloudAuth reports success as Code "200"
        match envelope.code.as_deref() {
            Some("200") | None => envelope.result_object.ok_or_else(|| {
                AliyunError::Parse(format!("{} returned no ResultObject", action))
            }),
            Some(code) => Err(AliyunError::Api {
                code: code.to_string(),
                message: envelope
                    .message
                    .unwrap_or_else(|| format!("{} failed", action)),
            }),
        }
    }
}
