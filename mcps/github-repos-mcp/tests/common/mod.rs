//! Shared helpers for integration tests
//!
//! A `wiremock` server stands in for the GitHub API.

#![allow(dead_code)]

use std::time::Duration;

use github_repos_mcp::config::GitHubConfig;
use github_repos_mcp::remote::{RemoteClient, RetryPolicy};
use github_repos_mcp::Dispatcher;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

pub fn github_config(server: &MockServer) -> GitHubConfig {
    GitHubConfig {
        api_url: server.uri(),
        token: Some(TOKEN.to_string()),
        per_page: 2,
        ..GitHubConfig::default()
    }
}

/// Retries with millisecond delays so tests stay fast
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_rate_limit_retries: 3,
        max_server_retries: 2,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(10),
    }
}

pub fn client_with(server: &MockServer, retry: RetryPolicy) -> RemoteClient {
    RemoteClient::new(&github_config(server), retry).expect("client should build")
}

pub fn dispatcher(server: &MockServer) -> Dispatcher {
    Dispatcher::new(client_with(server, fast_retry()))
}

/// Minimal GitHub repository object
pub fn repo_json(name: &str, archived: bool, fork: bool, private: bool) -> Value {
    json!({
        "id": 1,
        "name": name,
        "full_name": format!("octocat/{name}"),
        "owner": { "login": "octocat" },
        "description": format!("{name} description"),
        "html_url": format!("https://github.com/octocat/{name}"),
        "private": private,
        "visibility": if private { "private" } else { "public" },
        "fork": fork,
        "archived": archived,
        "default_branch": "main",
        "updated_at": "2024-05-01T12:00:00Z"
    })
}

/// `Link` header pointing at page `page` of the repository list
pub fn next_link(server: &MockServer, page: u32) -> String {
    format!(
        "<{}/user/repos?per_page=2&page={page}>; rel=\"next\"",
        server.uri()
    )
}

/// Names of the repositories in a list payload, in order
pub fn names(payload: &Value) -> Vec<String> {
    payload["repositories"]
        .as_array()
        .expect("repositories array")
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}
