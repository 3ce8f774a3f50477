//! Type definitions for GitHub repositories
//!
//! These are the request-scoped shapes the tools work with. They are
//! independent of GitHub's wire schema; see [`crate::normalize`] for the
//! mapping from raw payloads.

pub mod repo;

pub use repo::{RepoId, RepoPatch, Repository};
