//! Response payloads for the Dysms and CloudAuth APIs.

use serde::Deserialize;

/// Response of `SendSms` (Dysms 2017-05-25).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendSmsResult {
    pub request_id: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub biz_id: Option<String>,
}

impl SendSmsResult {
    /// Dysms reports success with `Code: "OK"`.
    pub fn is_ok(&self) -> bool {
        self.code.as_deref() == Some("OK")
    }
}

/// Envelope returned by CloudAuth (2019-03-07) operations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CloudAuthEnvelope<T> {
    pub request_id: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
    pub result_object: Option<T>,
}

/// `ResultObject` of `InitSmartVerify`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitSmartVerifyResult {
    pub certify_id: String,
}

/// `ResultObject` of `DescribeSmartVerify`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeSmartVerifyResult {
    /// "T" when the liveness check passed, anything else otherwise.
    pub passed: Option<String>,
    pub sub_code: Option<String>,
}

impl DescribeSmartVerifyResult {
    pub fn is_passed(&self) -> bool {
        self.passed.as_deref() == Some("T")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_sms_ok_detection() {
        let ok: SendSmsResult =
            serde_json::from_str(r#"{"Code":"OK","RequestId":"r1","BizId":"b1"}"#).unwrap();
        assert!(ok.is_ok());

        let throttled: SendSmsResult = serde_json::from_str(
            r#"{"Code":"isv.BUSINESS_LIMIT_CONTROL","Message":"triggered flow control"}"#,
        )
        .unwrap();
        assert!(!throttled.is_ok());
    }

    #[test]
    fn describe_passed_detection() {
        let passed: DescribeSmartVerifyResult =
            serde_json::from_str(r#"{"Passed":"T","SubCode":"200"}"#).unwrap();
        assert!(passed.is_passed());

        let failed: DescribeSmartVerifyResult =
            serde_json::from_str(r#"{"Passed":"F","SubCode":"205"}"#).unwrap();
        assert!(!failed.is_passed());

        let pending: DescribeSmartVerifyResult = serde_json::from_str(r#"{}"#).unwrap();
        assert!(!pending.is_passed());
    }

    #[test]
    fn envelope_parses_init_result() {
        let env: CloudAuthEnvelope<InitSmartVerifyResult> = serde_json::from_str(
            r#"{"RequestId":"r1","Code":"200","Message":"success","ResultObject":{"CertifyId":"c-123"}}"#,
        )
        .unwrap();
        assert_eq!(env.result_object.unwrap().certify_id, "c-123");
    }
}
