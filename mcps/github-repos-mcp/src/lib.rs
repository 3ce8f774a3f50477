//! GitHub Repositories MCP Library
//!
//! MCP-compatible tools for managing the authenticated user's GitHub
//! repositories through the REST API.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use github_repos_mcp::{Config, GitHubReposMcpServer};
//!
//! let server = GitHubReposMcpServer::from_config(&Config::load()?)?;
//! let result = server.invoke("list_repositories", serde_json::json!({ "fork": true })).await;
//! ```
//!
//! # Features
//! - List repositories, filtered by archived / fork / private
//! - Update attributes, make private
//! - Archive and unarchive (idempotent)
//! - Delete
//!
//! # Requirements
//! - `GITHUB_TOKEN` with `repo` scope (and `delete_repo` for deletion)

pub mod config;
pub mod dispatcher;
pub mod init;
pub mod normalize;
pub mod operations;
pub mod params;
pub mod remote;
pub mod server;
pub mod types;

// Re-export main server type
pub use config::Config;
pub use dispatcher::{Dispatcher, ToolInvocation};
pub use normalize::{Failure, FailureKind, OperationResult};
pub use server::GitHubReposMcpServer;

// Re-export parameter types for direct API usage
pub use params::*;
