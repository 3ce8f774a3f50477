//! Error types for GitHub REST calls
//!
//! Every failure the remote layer can produce is a [`RemoteError`]: a
//! [`RemoteErrorKind`] tag plus a human-readable message. HTTP statuses are
//! classified by [`RemoteErrorKind::from_status`], a total mapping, so an
//! unexpected status never escapes as anything but one of the known kinds.

use std::fmt;

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Category of a remote failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteErrorKind {
    /// No credential configured, or GitHub rejected it (401)
    Unauthenticated,
    /// The repository or endpoint does not exist (404)
    NotFound,
    /// The credential lacks rights for the request (403)
    Forbidden,
    /// Rate limit hit and the retry budget is spent (429, or 403 with a rate-limit signal)
    RateLimited,
    /// GitHub kept failing (5xx) or could not be reached
    RemoteUnavailable,
    /// GitHub refused the change for this repository (409, 422)
    Conflict,
    /// The request or response did not have the expected shape
    Malformed,
    /// The request did not complete in time
    Timeout,
}

impl RemoteErrorKind {
    /// Classify an HTTP status.
    ///
    /// Total over every status code: unknown client errors fail closed as
    /// `Malformed`, anything else unexpected as `RemoteUnavailable`.
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 => Self::Unauthenticated,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 | 422 => Self::Conflict,
            429 => Self::RateLimited,
            400..=499 => Self::Malformed,
            500..=599 => Self::RemoteUnavailable,
            _ => Self::RemoteUnavailable,
        }
    }

    /// Like [`from_status`](Self::from_status), but honours GitHub's explicit
    /// rate-limit signals on 403 responses.
    pub fn classify(status: StatusCode, headers: &HeaderMap) -> Self {
        match Self::from_status(status) {
            Self::Forbidden if has_rate_limit_signal(headers) => Self::RateLimited,
            kind => kind,
        }
    }

    /// Fallback message used when GitHub gives no explanation
    pub fn describe(self) -> &'static str {
        match self {
            Self::Unauthenticated => "GitHub credential is missing or was rejected",
            Self::NotFound => "repository not found",
            Self::Forbidden => "credential lacks permission for this operation",
            Self::RateLimited => "GitHub rate limit exceeded",
            Self::RemoteUnavailable => "GitHub API is unavailable",
            Self::Conflict => "GitHub rejected the change for this repository",
            Self::Malformed => "unexpected request or response shape",
            Self::Timeout => "request to GitHub timed out",
        }
    }
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound => "not found",
            Self::Forbidden => "forbidden",
            Self::RateLimited => "rate limited",
            Self::RemoteUnavailable => "remote unavailable",
            Self::Conflict => "conflict",
            Self::Malformed => "malformed",
            Self::Timeout => "timeout",
        };
        f.write_str(name)
    }
}

/// A failed GitHub call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    /// Build an error, falling back to the kind's generic description
    pub fn new(kind: RemoteErrorKind, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| kind.describe().to_string());
        Self { kind, message }
    }

    pub fn unauthenticated() -> Self {
        Self::new(RemoteErrorKind::Unauthenticated, None)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Malformed, Some(message.into()))
    }

    /// Build an error from a non-success GitHub response
    pub fn from_response(status: StatusCode, headers: &HeaderMap, body: &str) -> Self {
        Self::new(RemoteErrorKind::classify(status, headers), remote_message(body))
    }

    /// Build an error from a transport failure.
    ///
    /// The reqwest error text stays in the logs; callers only get the kind's
    /// generic description.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            RemoteErrorKind::Timeout
        } else if err.is_decode() {
            RemoteErrorKind::Malformed
        } else {
            RemoteErrorKind::RemoteUnavailable
        };
        tracing::debug!(error = %err, %kind, "transport failure");
        Self::new(kind, None)
    }
}

/// Result type alias for remote calls
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Errors raised while constructing a [`RemoteClient`](super::RemoteClient)
#[derive(Error, Debug)]
pub enum ClientInitError {
    #[error("invalid GitHub API URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

fn has_rate_limit_signal(headers: &HeaderMap) -> bool {
    let exhausted = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");
    exhausted || headers.contains_key(reqwest::header::RETRY_AFTER)
}

/// Pull the most specific explanation out of a GitHub error body.
///
/// GitHub errors look like `{"message": "...", "errors": [{"message": "..."}]}`;
/// `errors` entries are sometimes plain strings.
fn remote_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let detail = value
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| {
            errors.iter().find_map(|e| match e {
                Value::String(s) => Some(s.clone()),
                other => other.get("message").and_then(Value::as_str).map(str::to_string),
            })
        });

    detail.or_else(|| value.get("message").and_then(Value::as_str).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (401, RemoteErrorKind::Unauthenticated),
            (403, RemoteErrorKind::Forbidden),
            (404, RemoteErrorKind::NotFound),
            (409, RemoteErrorKind::Conflict),
            (422, RemoteErrorKind::Conflict),
            (429, RemoteErrorKind::RateLimited),
            (400, RemoteErrorKind::Malformed),
            (418, RemoteErrorKind::Malformed),
            (500, RemoteErrorKind::RemoteUnavailable),
            (503, RemoteErrorKind::RemoteUnavailable),
            (302, RemoteErrorKind::RemoteUnavailable),
        ];
        for (code, expected) in cases {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(RemoteErrorKind::from_status(status), expected, "status {code}");
        }
    }

    #[test]
    fn test_status_mapping_is_total() {
        for code in 100..=999u16 {
            let status = StatusCode::from_u16(code).unwrap();
            // Must not panic for any representable status
            let _ = RemoteErrorKind::from_status(status);
        }
    }

    #[test]
    fn test_forbidden_with_exhausted_quota_is_rate_limited() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        assert_eq!(
            RemoteErrorKind::classify(StatusCode::FORBIDDEN, &headers),
            RemoteErrorKind::RateLimited
        );

        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("42"));
        assert_eq!(
            RemoteErrorKind::classify(StatusCode::FORBIDDEN, &headers),
            RemoteErrorKind::Forbidden
        );
    }

    #[test]
    fn test_message_prefers_specific_error() {
        let body = r#"{"message":"Validation Failed","errors":[{"resource":"Repository","message":"visibility can't be private"}]}"#;
        let err = RemoteError::from_response(StatusCode::UNPROCESSABLE_ENTITY, &HeaderMap::new(), body);
        assert_eq!(err.kind, RemoteErrorKind::Conflict);
        assert_eq!(err.message, "visibility can't be private");
    }

    #[test]
    fn test_message_falls_back_to_top_level_then_generic() {
        let err = RemoteError::from_response(
            StatusCode::NOT_FOUND,
            &HeaderMap::new(),
            r#"{"message":"Not Found"}"#,
        );
        assert_eq!(err.message, "Not Found");

        let err = RemoteError::from_response(StatusCode::BAD_GATEWAY, &HeaderMap::new(), "<html>");
        assert_eq!(err.message, RemoteErrorKind::RemoteUnavailable.describe());
    }
}
