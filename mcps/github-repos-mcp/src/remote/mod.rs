//! GitHub REST client layer
//!
//! This module issues authenticated requests, applies the retry policy,
//! walks paginated lists and classifies failures into [`RemoteErrorKind`]s.

pub mod client;
pub mod error;
pub mod pagination;
pub mod retry;

pub use client::{Credential, RawResponse, RemoteClient};
pub use error::{ClientInitError, RemoteError, RemoteErrorKind, RemoteResult};
pub use pagination::{PageCursor, Pages};
pub use retry::RetryPolicy;
