use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::constants::FIELD_ERROR_SEPARATOR;

/// Failure taxonomy for gateway operations.
///
/// Every operation returns either its payload or exactly one of these;
/// callers branch on the variant and can show the `Display` text as-is.
/// Nothing here is retried automatically.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Rejected locally before any network I/O
    #[error("{0}")]
    Validation(String),

    /// The server rejected the credentials or the stored token
    #[error("{0}")]
    Auth(String),

    /// The server answered with a non-success status
    #[error("{0}")]
    Server(String),

    /// No response within the configured deadline
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// No response at all: refused, unreachable, DNS failure
    #[error("{0}")]
    Transport(String),

    /// A success response carried a body we could not decode
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    /// The local token store failed
    #[error("{0}")]
    Storage(String),
}

impl ApiError {
    /// True when the failure is indistinguishable from the server being
    /// unreachable, so a "check your network" hint is warranted.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout(_))
    }
}

/// Uniform return type of every gateway operation.
pub type ApiResult<T> = Result<T, ApiError>;

/// FastAPI error body: `detail` carries either one string or an ordered
/// list of field validation errors.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Detail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Fields(Vec<FieldError>),
}

/// One entry of a validation error list. Extra keys (`loc`, `type`, ...)
/// are ignored; only the message is shown to the user.
#[derive(Debug, Deserialize)]
struct FieldError {
    msg: String,
}

/// Pick the most specific human-readable message out of an error body.
///
/// The order is contractual: a field-error list joined in server order
/// beats a single detail string, which beats the caller's fallback.
/// Server-supplied text always wins over the generic default.
pub(crate) fn detail_message(body: &str, fallback: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Some(Detail::Fields(fields)),
        }) if !fields.is_empty() => fields
            .iter()
            .map(|field| field.msg.as_str())
            .collect::<Vec<_>>()
            .join(FIELD_ERROR_SEPARATOR),
        Ok(ErrorBody {
            detail: Some(Detail::Message(msg)),
        }) if !msg.is_empty() => msg,
        _ => fallback.to_string(),
    }
}

/// Classify a non-success response. Auth failures get their own class so
/// callers can reset the session; everything else is a server error with
/// the best message we can extract.
pub(crate) fn status_error(status: StatusCode, body: &str, fallback: &str) -> ApiError {
    let message = detail_message(body, fallback);
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ApiError::Auth(message)
    } else {
        ApiError::Server(message)
    }
}

/// Map a transport-level failure (no usable response) to its variant.
/// Timeouts stay distinct so the caller can say so instead of showing a
/// generic connection error.
pub(crate) fn transport_error(err: reqwest::Error, timeout_secs: u64) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout(timeout_secs)
    } else {
        ApiError::Transport(err.to_string())
    }
}
