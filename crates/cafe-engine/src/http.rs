//! Shared HTTP response helpers for the engine client.
//!
//! Centralizes the status check and the `{"error": ...}` payload convention so
//! the client stays focused on request construction and response mapping.

use crate::error::EngineError;

/// Return the response unchanged on success, [`EngineError::Api`] otherwise.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, EngineError> {
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(EngineError::Api {
            status,
            message: error_message(&body).unwrap_or(body),
        });
    }
    Ok(resp)
}

/// The `error` field of a JSON object body, if there is one.
pub fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        serde_json::Value::String(message) => Some(message.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_error_field() {
        assert_eq!(
            error_message(r#"{"error": "Internal Server Error"}"#).as_deref(),
            Some("Internal Server Error")
        );
    }

    #[test]
    fn structured_error_is_stringified() {
        assert_eq!(
            error_message(r#"{"error": {"code": 3}}"#).as_deref(),
            Some(r#"{"code":3}"#)
        );
    }

    #[test]
    fn no_error_field() {
        assert_eq!(error_message(r#"{"type": "Arabica"}"#), None);
        assert_eq!(error_message(r#"{"error": null}"#), None);
        assert_eq!(error_message("<html>oops</html>"), None);
    }
}
