//! Result normalization
//!
//! Maps raw GitHub payloads into [`Repository`] values and every failure into
//! an [`OperationResult::Failure`] with a stable [`FailureKind`]. Callers
//! should branch on the kind; messages are for humans.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::remote::{RawResponse, RemoteError, RemoteErrorKind, RemoteResult};
use crate::types::Repository;

/// Stable failure vocabulary reported to tool callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidArgument,
    UnknownOperation,
    Unauthenticated,
    NotFound,
    Forbidden,
    RateLimited,
    RemoteUnavailable,
    Conflict,
    Malformed,
    Timeout,
}

impl From<RemoteErrorKind> for FailureKind {
    fn from(kind: RemoteErrorKind) -> Self {
        match kind {
            RemoteErrorKind::Unauthenticated => Self::Unauthenticated,
            RemoteErrorKind::NotFound => Self::NotFound,
            RemoteErrorKind::Forbidden => Self::Forbidden,
            RemoteErrorKind::RateLimited => Self::RateLimited,
            RemoteErrorKind::RemoteUnavailable => Self::RemoteUnavailable,
            RemoteErrorKind::Conflict => Self::Conflict,
            RemoteErrorKind::Malformed => Self::Malformed,
            RemoteErrorKind::Timeout => Self::Timeout,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Same spelling as the serialized form
        let name = match self {
            Self::InvalidArgument => "invalid_argument",
            Self::UnknownOperation => "unknown_operation",
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::RateLimited => "rate_limited",
            Self::RemoteUnavailable => "remote_unavailable",
            Self::Conflict => "conflict",
            Self::Malformed => "malformed",
            Self::Timeout => "timeout",
        };
        f.write_str(name)
    }
}

/// A failed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<RemoteError> for Failure {
    fn from(err: RemoteError) -> Self {
        Self {
            kind: err.kind.into(),
            message: err.message,
        }
    }
}

/// Outcome of one tool invocation: exactly one of success or failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationResult {
    Success { payload: Value },
    Failure(Failure),
}

impl OperationResult {
    /// Wrap a serializable payload
    pub fn success<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(payload) => Self::Success { payload },
            Err(e) => Self::failure(FailureKind::Malformed, format!("could not encode result: {e}")),
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure(Failure::new(kind, message))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(f) => Some(f.kind),
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Success { payload } => Some(payload),
            Self::Failure(_) => None,
        }
    }
}

impl From<RemoteError> for OperationResult {
    fn from(err: RemoteError) -> Self {
        Self::Failure(err.into())
    }
}

// ============================================================================
// GitHub payload decoding
// ============================================================================

#[derive(Debug, Deserialize)]
struct OwnerPayload {
    login: String,
}

/// Subset of GitHub's repository object
#[derive(Debug, Deserialize)]
struct RepoPayload {
    name: String,
    full_name: String,
    owner: OwnerPayload,
    #[serde(default)]
    description: Option<String>,
    html_url: String,
    private: bool,
    #[serde(default)]
    visibility: Option<String>,
    fork: bool,
    archived: bool,
    #[serde(default)]
    default_branch: String,
    updated_at: DateTime<Utc>,
}

impl From<RepoPayload> for Repository {
    fn from(p: RepoPayload) -> Self {
        let visibility = p.visibility.unwrap_or_else(|| {
            if p.private { "private" } else { "public" }.to_string()
        });
        Self {
            owner: p.owner.login,
            name: p.name,
            full_name: p.full_name,
            description: p.description,
            url: p.html_url,
            private: p.private,
            visibility,
            fork: p.fork,
            archived: p.archived,
            default_branch: p.default_branch,
            updated_at: p.updated_at,
        }
    }
}

/// Decode a single-repository response
pub fn decode_repository(raw: &RawResponse) -> RemoteResult<Repository> {
    raw.json::<RepoPayload>().map(Repository::from)
}

/// Decode one page of a repository list, preserving order
pub fn decode_repositories(raw: &RawResponse) -> RemoteResult<Vec<Repository>> {
    let page: Vec<RepoPayload> = raw.json()?;
    Ok(page.into_iter().map(Repository::from).collect())
}
