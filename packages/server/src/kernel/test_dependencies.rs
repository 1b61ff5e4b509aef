//! Stub implementations of the infrastructure traits for tests.
//!
//! Kept in the library (not `#[cfg(test)]`) so integration tests under
//! `tests/` can build a full `ServerDeps` without touching the network.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::kernel::traits::{
    BaseIdentityService, BaseSmsService, BaseStorageService, InitVerifyParams,
};

/// Records sent codes instead of calling Dysms; can be flipped to fail.
#[derive(Default)]
pub struct StubSmsService {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail_next: AtomicBool,
}

impl StubSmsService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_codes(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Last code recorded for a phone, if any.
    pub fn last_code_for(&self, phone: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(p, _)| p == phone)
            .map(|(_, c)| c.clone())
    }
}

#[async_trait]
impl BaseSmsService for StubSmsService {
    async fn send_code(&self, phone: &str, code: &str) -> Result<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(anyhow!("sms gateway unavailable"));
        }
        self.sent
            .lock()
            .unwrap()
            .push((phone.to_string(), code.to_string()));
        Ok(())
    }
}

/// Identity service whose outcome is scripted by the test.
pub struct StubIdentityService {
    pub certify_id: String,
    pub passed: AtomicBool,
    pub init_calls: Mutex<Vec<InitVerifyParams>>,
}

impl StubIdentityService {
    pub fn passing(certify_id: &str) -> Self {
        Self {
            certify_id: certify_id.to_string(),
            passed: AtomicBool::new(true),
            init_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(certify_id: &str) -> Self {
        let stub = Self::passing(certify_id);
        stub.passed.store(false, Ordering::SeqCst);
        stub
    }
}

#[async_trait]
impl BaseIdentityService for StubIdentityService {
    async fn init_verify(&self, params: InitVerifyParams) -> Result<String> {
        self.init_calls.lock().unwrap().push(params);
        Ok(self.certify_id.clone())
    }

    async fn check_verify(&self, _certify_id: &str) -> Result<bool> {
        Ok(self.passed.load(Ordering::SeqCst))
    }
}

/// In-memory object store.
#[derive(Default)]
pub struct StubStorageService {
    pub objects: Mutex<Vec<(String, usize)>>,
}

#[async_trait]
impl BaseStorageService for StubStorageService {
    async fn put_object(&self, key: &str, body: Vec<u8>, _content_type: &str) -> Result<String> {
        self.objects
            .lock()
            .unwrap()
            .push((key.to_string(), body.len()));
        Ok(self.public_url(key))
    }

    fn presign_put(&self, key: &str, expires_secs: u64) -> String {
        format!(
            "https://stub.example.com/{}?x-oss-expires={}&x-oss-signature=stub",
            key, expires_secs
        )
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://stub.example.com/{}", key)
    }
}
