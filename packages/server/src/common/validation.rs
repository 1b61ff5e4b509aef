//! Input validation shared across handlers.
//!
//! Validation always runs before any storage or external-service side effect.

use lazy_static::lazy_static;
use regex::Regex;

use crate::common::error::{AppError, AppResult};

lazy_static! {
    /// Mainland mobile numbers: `1` followed by ten digits.
    static ref PHONE_RE: Regex = Regex::new(r"^1\d{10}$").unwrap();
    /// 18-character national ID: 17 digits plus a digit or X checksum.
    static ref ID_NUMBER_RE: Regex = Regex::new(r"^\d{17}[\dXx]$").unwrap();
}

pub fn validate_phone(phone: &str) -> AppResult<()> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        Err(AppError::Validation("手机号格式不正确".to_string()))
    }
}

pub fn validate_sms_code(code: &str) -> AppResult<()> {
    if code.len() >= 4 && code.len() <= 8 && code.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::Validation("验证码格式不正确".to_string()))
    }
}

pub fn validate_id_number(id_number: &str) -> AppResult<()> {
    if ID_NUMBER_RE.is_match(id_number) {
        Ok(())
    } else {
        Err(AppError::Validation("身份证号格式不正确".to_string()))
    }
}

pub fn validate_real_name(name: &str) -> AppResult<()> {
    let chars = name.chars().count();
    if (2..=20).contains(&chars) {
        Ok(())
    } else {
        Err(AppError::Validation("姓名长度应为2-20个字符".to_string()))
    }
}

/// Bounded text field check, counting characters rather than bytes.
pub fn validate_length(value: &str, min: usize, max: usize, field: &str) -> AppResult<()> {
    let chars = value.chars().count();
    if chars < min || chars > max {
        return Err(AppError::Validation(format!(
            "{}长度应为{}-{}个字符",
            field, min, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_pattern() {
        assert!(validate_phone("13800138000").is_ok());
        assert!(validate_phone("23800138000").is_err());
        assert!(validate_phone("1380013800").is_err());
        assert!(validate_phone("138001380001").is_err());
        assert!(validate_phone("1380013800a").is_err());
        assert!(validate_phone("+8613800138000").is_err());
    }

    #[test]
    fn sms_code_pattern() {
        assert!(validate_sms_code("042317").is_ok());
        assert!(validate_sms_code("1234").is_ok());
        assert!(validate_sms_code("12345678").is_ok());
        assert!(validate_sms_code("123").is_err());
        assert!(validate_sms_code("123456789").is_err());
        assert!(validate_sms_code("12a456").is_err());
    }

    #[test]
    fn id_number_pattern() {
        assert!(validate_id_number("110101199003071234").is_ok());
        assert!(validate_id_number("11010119900307123X").is_ok());
        assert!(validate_id_number("11010119900307123x").is_ok());
        assert!(validate_id_number("1101011990030712").is_err());
        assert!(validate_id_number("11010119900307123Y").is_err());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 4 CJK characters, 12 bytes
        assert!(validate_length("这是名字", 2, 20, "姓名").is_ok());
        assert!(validate_length("名", 2, 20, "姓名").is_err());
    }
}
