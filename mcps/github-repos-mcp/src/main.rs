//! GitHub Repositories MCP Server
//!
//! Exposes repository management for the authenticated GitHub user as MCP
//! tools: list (with archived/fork/private filters), update, make private,
//! archive, unarchive and delete.
//!
//! # Requirements
//!
//! - `GITHUB_TOKEN` set to a token with `repo` scope (`delete_repo` to delete)
//!
//! # Usage
//!
//! Configure in `.mcp.json`:
//! ```json
//! {
//!   "mcpServers": {
//!     "github-repos": {
//!       "command": "./mcps/github-repos-mcp/target/release/github-repos-mcp",
//!       "env": { "GITHUB_TOKEN": "..." }
//!     }
//!   }
//! }
//! ```
//!
//! Optional settings live in `~/.binks/github-repos.toml` (or the file named
//! by `GITHUB_REPOS_CONFIG_PATH`).

use rmcp::{transport::stdio, ServiceExt};

use github_repos_mcp::{init::init_tracing, Config, GitHubReposMcpServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    tracing::info!("Starting GitHub Repositories MCP Server");

    let config = Config::load()?;
    // A missing credential is fatal at startup
    config.require_token()?;

    let server = GitHubReposMcpServer::from_config(&config)?;
    let service = server.serve(stdio()).await?;

    tracing::info!("Server running, waiting for requests...");
    service.waiting().await?;

    tracing::info!("Server shutting down");
    Ok(())
}
