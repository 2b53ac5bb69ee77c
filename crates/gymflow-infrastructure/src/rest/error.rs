//! Conversion of HTTP failures into [`GymError`].

use gymflow_core::error::GymError;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// Code the data service returns when a single-row read matched nothing.
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Union of the error bodies returned by the data, auth and function endpoints.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
    /// String for the data service, number for the auth service.
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    error_code: Option<String>,
}

impl ErrorBody {
    fn message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error_description.clone())
            .or_else(|| self.msg.clone())
            .or_else(|| self.error.clone())
            .filter(|m| !m.trim().is_empty())
    }

    fn code(&self) -> Option<String> {
        let code = match &self.code {
            Some(Value::String(code)) => Some(code.clone()),
            _ => None,
        };
        code.or_else(|| self.error_code.clone())
            .or_else(|| self.error.clone())
    }
}

/// Maps a non-success response to the shared error type.
pub fn map_http_error(status: StatusCode, body: &str) -> GymError {
    let parsed = serde_json::from_str::<ErrorBody>(body).unwrap_or_default();
    let message = parsed.message().unwrap_or_else(|| {
        if body.trim().is_empty() {
            format!("Request failed with status {status}")
        } else {
            body.trim().to_string()
        }
    });

    match status {
        StatusCode::UNAUTHORIZED => GymError::auth(message),
        StatusCode::FORBIDDEN => GymError::permission(message),
        _ => GymError::remote(message, parsed.code()),
    }
}

/// Maps a transport-level failure (no response received).
pub fn map_transport_error(err: reqwest::Error) -> GymError {
    GymError::network(format!("request failed: {err}"))
}

/// Whether `err` is the "no rows" answer to a single-row read.
pub fn is_no_rows(err: &GymError) -> bool {
    matches!(err, GymError::Remote { code: Some(code), .. } if code == NO_ROWS_CODE)
}
