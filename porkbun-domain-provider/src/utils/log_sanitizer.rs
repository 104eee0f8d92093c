//! Log sanitization utilities
//!
//! Prevents sensitive data (API keys, auth codes, large response bodies)
//! from being fully exposed in debug/error logs.

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit,
/// otherwise returns the first `TRUNCATE_LIMIT` characters with a suffix
/// indicating the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// JSON keys whose values never reach the logs.
const SECRET_KEYS: &[&str] = &["apikey", "secretapikey", "authCode", "auth_code"];

/// Prepare a response body for logging: secret values of a JSON body are
/// replaced by `***`, then the result is truncated.
///
/// Bodies that are not JSON are only truncated.
pub fn sanitize_body_for_log(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(mut value) => {
            redact_secrets(&mut value);
            truncate_for_log(&value.to_string())
        }
        Err(_) => truncate_for_log(body),
    }
}

fn redact_secrets(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if SECRET_KEYS.contains(&key.as_str()) {
                    *field = serde_json::Value::String("***".to_string());
                } else {
                    redact_secrets(field);
                }
            }
        }
        serde_json::Value::Array(items) => items.iter_mut().for_each(redact_secrets),
        _ => {}
    }
}

/// Mask a secret for display, keeping only its last four characters.
///
/// Empty or very short secrets are fully hidden.
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "***".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("...{tail}")
}
