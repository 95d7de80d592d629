use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only envelope code the backend uses for success.
pub const SUCCESS_CODE: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Internal,
}

impl ErrorCode {
    /// Maps an envelope `code` onto a coarse category. The backend mirrors
    /// HTTP status numbers in that field; anything unrecognised is internal.
    pub fn from_envelope_code(code: i64) -> Self {
        match code {
            401 | 440 | 498 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            400 | 409 | 422 => Self::Validation,
            429 => Self::RateLimited,
            _ => Self::Internal,
        }
    }
}

/// A well-formed envelope whose `code` was not 200. `message` is the server's
/// text verbatim and may be empty.
#[derive(Debug, Clone, Error)]
#[error("{}", describe(.status, .message))]
pub struct ApiException {
    pub code: ErrorCode,
    pub status: i64,
    pub message: String,
}

fn describe(status: &i64, message: &str) -> String {
    if message.trim().is_empty() {
        format!("request failed with code {status}")
    } else {
        message.to_string()
    }
}

impl ApiException {
    pub fn new(status: i64, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::from_envelope_code(status),
            status,
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code == ErrorCode::Unauthorized
    }

    pub fn has_server_message(&self) -> bool {
        !self.message.trim().is_empty()
    }
}

/// Failure to turn an envelope into the payload an action promises.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error(transparent)]
    Api(#[from] ApiException),
    #[error("`{action}` succeeded but returned no data")]
    MissingData {
        action: &'static str,
        message: String,
    },
    #[error("malformed `{action}` payload: {source}")]
    Decode {
        action: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
