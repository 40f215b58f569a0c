//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

static RE_HTTP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[A-Za-z0-9.\-]+(:[0-9]{1,5})?(/\S*)?$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "LOG_LIMIT" => validate_int_range(value, 1, 1000)?,
        "HTTP_TIMEOUT_SECS" => validate_int_range(value, 1, 120)?,
        "INCLUDE_GLOBAL_EMOTES" => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        "OUTPUT_PATH" => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        k if k.ends_with("_API_BASE") => {
            if !RE_HTTP_URL.is_match(value) {
                return Err("must be an http(s) URL".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_boolean() {
        assert!(validate_setting("INCLUDE_GLOBAL_EMOTES", "true").is_ok());
        assert!(validate_setting("INCLUDE_GLOBAL_EMOTES", "false").is_ok());
        assert!(validate_setting("INCLUDE_GLOBAL_EMOTES", "yes").is_err());
    }

    #[test]
    fn test_valid_log_limit() {
        assert!(validate_setting("LOG_LIMIT", "300").is_ok());
        assert!(validate_setting("LOG_LIMIT", "1000").is_ok());
        assert!(validate_setting("LOG_LIMIT", "0").is_err());
        assert!(validate_setting("LOG_LIMIT", "1001").is_err());
        assert!(validate_setting("LOG_LIMIT", "many").is_err());
    }

    #[test]
    fn test_valid_api_base() {
        assert!(validate_setting("LOGS_API_BASE", "https://logs.ivr.fi").is_ok());
        assert!(validate_setting("LOGS_API_BASE", "http://127.0.0.1:8080/proxy/").is_ok());
        assert!(validate_setting("SEVENTV_API_BASE", "ftp://7tv.io").is_err());
        assert!(validate_setting("FFZ_API_BASE", "api.frankerfacez.com").is_err());
    }
}
