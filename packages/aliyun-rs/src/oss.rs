//! OSS object storage client: server-mediated uploads and pre-signed
//! direct-upload URLs, both using the V4 (OSS4-HMAC-SHA256) signature.

use chrono::{DateTime, Utc};
use reqwest::Client;

use crate::sign::{hmac_sha256, percent_encode, sha256_hex};
use crate::{AliyunError, AliyunOptions};

const ALGORITHM: &str = "OSS4-HMAC-SHA256";
const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

#[derive(Debug, Clone)]
pub struct OssClient {
    options: AliyunOptions,
    /// e.g. `oss-cn-hangzhou`
    region: String,
    bucket: String,
    client: Client,
}

impl OssClient {
    pub fn new(options: AliyunOptions, region: String, bucket: String) -> Self {
        Self {
            options,
            region,
            bucket,
            client: crate::http_client(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}.{}.aliyuncs.com", self.bucket, self.region)
    }

    /// Public URL of an object (bucket policy must allow public read).
    pub fn public_url(&self, key: &str) -> String {
        format!("https://{}/{}", self.endpoint(), encode_key(key))
    }

    /// Region identifier used in the V4 credential scope (`oss-` prefix
    /// stripped, e.g. `cn-hangzhou`).
    fn scope_region(&self) -> &str {
        self.region.strip_prefix("oss-").unwrap_or(&self.region)
    }

    fn scope(&self, date: &str) -> String {
        format!("{}/{}/oss/aliyun_v4_request", date, self.scope_region())
    }

    fn signing_key(&self, date: &str) -> Vec<u8> {
        let secret = format!("aliyun_v4{}", self.options.access_key_secret);
        let k_date = hmac_sha256(secret.as_bytes(), date.as_bytes());
        let k_region = hmac_sha256(&k_date, self.scope_region().as_bytes());
        let k_product = hmac_sha256(&k_region, b"oss");
        hmac_sha256(&k_product, b"aliyun_v4_request")
    }

    fn string_to_sign(&self, datetime: &str, date: &str, canonical_request: &str) -> String {
        format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            datetime,
            self.scope(date),
            sha256_hex(canonical_request.as_bytes())
        )
    }

    /// Upload raw bytes and return the object's public URL.
    pub async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AliyunError> {
        let now = Utc::now();
        let datetime = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();

        let canonical_uri = format!("/{}/{}", self.bucket, encode_key(key));
        let canonical_headers = format!(
            "content-type:{}\nhost:{}\nx-oss-content-sha256:{}\nx-oss-date:{}\n",
            content_type,
            self.endpoint(),
            UNSIGNED_PAYLOAD,
            datetime
        );
        let canonical_request = format!(
            "PUT\n{}\n\n{}\n\n{}",
            canonical_uri, canonical_headers, UNSIGNED_PAYLOAD
        );

        let signature = hex::encode(hmac_sha256(
            &self.signing_key(&date),
            self.string_to_sign(&datetime, &date, &canonical_request)
                .as_bytes(),
        ));
        let authorization = format!(
            "{} Credential={}/{},Signature={}",
            ALGORITHM,
            self.options.access_key_id,
            self.scope(&date),
            signature
        );

        let url = format!("https://{}/{}", self.endpoint(), encode_key(key));
        let response = self
            .client
            .put(url)
            .header("Authorization", authorization)
            .header("Content-Type", content_type)
            .header("x-oss-content-sha256", UNSIGNED_PAYLOAD)
            .header("x-oss-date", &datetime)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AliyunError::Api {
                code: status.to_string(),
                message: body,
            });
        }

        Ok(self.public_url(key))
    }

    /// Build a pre-signed PUT URL valid for `expires_secs` seconds.
    ///
    /// The client uploads directly to OSS with this URL; no credentials leave
    /// the server.
    pub fn presign_put(&self, key: &str, expires_secs: u64, now: DateTime<Utc>) -> String {
        let datetime = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let credential = format!("{}/{}", self.options.access_key_id, self.scope(&date));

        let mut query: Vec<(String, String)> = vec![
            ("x-oss-credential".to_string(), credential),
            ("x-oss-date".to_string(), datetime.clone()),
            ("x-oss-expires".to_string(), expires_secs.to_string()),
            ("x-oss-signature-version".to_string(), ALGORITHM.to_string()),
        ];
        query.sort();
        let canonical_query = query
            .iter()
            .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let canonical_uri = format!("/{}/{}", self.bucket, encode_key(key));
        let canonical_headers = format!("host:{}\n", self.endpoint());
        let canonical_request = format!(
            "PUT\n{}\n{}\n{}\n\n{}",
            canonical_uri, canonical_query, canonical_headers, UNSIGNED_PAYLOAD
        );

        let signature = hex::encode(hmac_sha256(
            &self.signing_key(&date),
            self.string_to_sign(&datetime, &date, &canonical_request)
                .as_bytes(),
        ));

        format!(
            "https://{}/{}?{}&x-oss-signature={}",
            self.endpoint(),
            encode_key(key),
            canonical_query,
            signature
        )
    }
}

/// Percent-encode an object key, preserving `/` separators.
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(percent_encode)
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn client() -> OssClient {
        OssClient::new(
            AliyunOptions {
                access_key_id: "test-ak".to_string(),
                access_key_secret: "test-sk".to_string(),
            },
            "oss-cn-hangzhou".to_string(),
            "cosync-media".to_string(),
        )
    }

    #[test]
    fn public_url_shape() {
        assert_eq!(
            client().public_url("uploads/1/a.jpg"),
            "https://cosync-media.oss-cn-hangzhou.aliyuncs.com/uploads/1/a.jpg"
        );
    }

    #[test]
    fn presign_embeds_key_expiry_and_signature() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let url = client().presign_put("uploads/7/photo.jpg", 900, now);
        assert!(url.contains("/uploads/7/photo.jpg?"));
        assert!(url.contains("x-oss-expires=900"));
        assert!(url.contains("x-oss-date=20240601T120000Z"));
        assert!(url.contains("x-oss-signature="));
    }

    #[test]
    fn presign_is_deterministic_for_fixed_time() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(
            client().presign_put("k", 60, now),
            client().presign_put("k", 60, now)
        );
    }

    #[test]
    fn key_encoding_keeps_slashes() {
        assert_eq!(encode_key("uploads/1/my photo.jpg"), "uploads/1/my%20photo.jpg");
    }
}
