//! Dysms `SendSms` client.

use chrono::Utc;
use reqwest::Client;
use uuid::Uuid;

use crate::models::SendSmsResult;
use crate::sign::sign_rpc_request;
use crate::{AliyunError, AliyunOptions};

const ENDPOINT: &str = "dysmsapi.aliyuncs.com";
const VERSION: &str = "2017-05-25";

/// Client for the Aliyun SMS delivery service.
///
/// One instance is constructed at startup and reused for every send; the
/// underlying reqwest client pools connections.
#[derive(Debug, Clone)]
pub struct SmsClient {
    options: AliyunOptions,
    client: Client,
}

impl SmsClient {
    pub fn new(options: AliyunOptions) -> Self {
        Self {
            options,
            client: crate::http_client(),
        }
    }

    /// Deliver a templated SMS to a single phone number.
    ///
    /// `template_param` is the JSON object substituted into the template,
    /// e.g. `{"code":"042317"}`.
    pub async fn send_sms(
        &self,
        phone: &str,
        sign_name: &str,
        template_code: &str,
        template_param: &serde_json::Value,
    ) -> Result<SendSmsResult, AliyunError> {
        let params = vec![
            ("PhoneNumbers".to_string(), phone.to_string()),
            ("SignName".to_string(), sign_name.to_string()),
            ("TemplateCode".to_string(), template_code.to_string()),
            ("TemplateParam".to_string(), template_param.to_string()),
        ];

        let nonce = Uuid::new_v4().to_string();
        let timestamp = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let signed = sign_rpc_request(
            &self.options.access_key_id,
            &self.options.access_key_secret,
            ENDPOINT,
            "SendSms",
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

        let response = request.send().await?;
        let result: SendSmsResult = response
            .json()
            .await
            .map_err(|e| AliyunError::Parse(e.to_string()))?;

        if result.is_ok() {
            Ok(result)
        } else {
            Err(AliyunError::Api {
                code: result.code.clone().unwrap_or_else(|| "Unknown".to_string()),
                message: result
                    .message
                    .clone()
                    .unwrap_or_else(|| "SendSms failed".to_string()),
            })
        }
    }
}
