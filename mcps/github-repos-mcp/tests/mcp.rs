//! Tool calls over a real MCP session
//!
//! Client and server talk over an in-memory duplex pipe; a `wiremock`
//! server stands in for GitHub.

mod common;

use common::*;
use github_repos_mcp::config::Config;
use github_repos_mcp::GitHubReposMcpServer;
use rmcp::model::{CallToolRequestParam, CallToolResult};
use rmcp::service::RunningService;
use rmcp::{RoleClient, ServiceExt};
use serde_json::{json, Value};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn connect(github: &MockServer) -> RunningService<RoleClient, ()> {
    let mut config = Config::default();
    config.github = github_config(github);
    let server = GitHubReposMcpServer::from_config(&config).expect("server should build");

    let (server_transport, client_transport) = tokio::io::duplex(64 * 1024);
    tokio::spawn(async move {
        if let Ok(running) = server.serve(server_transport).await {
            let _ = running.waiting().await;
        }
    });

    ().serve(client_transport).await.expect("client should connect")
}

async fn call(client: &RunningService<RoleClient, ()>, name: &'static str, args: Value) -> CallToolResult {
    client
        .call_tool(CallToolRequestParam {
            name: name.into(),
            arguments: args.as_object().cloned(),
            task: None,
        })
        .await
        .expect("tool call should not be a protocol error")
}

fn body(result: &CallToolResult) -> Value {
    let text = result
        .content
        .first()
        .and_then(|c| c.raw.as_text())
        .map(|t| t.text.as_str())
        .expect("text content");
    serde_json::from_str(text).expect("JSON content")
}

#[tokio::test]
async fn test_tool_success() {
    let github = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/repos/octocat/hello"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&github)
        .await;

    let client = connect(&github).await;
    let result = call(
        &client,
        "delete_repository",
        json!({ "owner": "octocat", "name": "hello" }),
    )
    .await;

    assert!(!result.is_error.unwrap_or(false));
    assert_eq!(body(&result)["deleted"], "octocat/hello");
    client.cancel().await.unwrap();
}

#[tokio::test]
async fn test_tool_remote_failure() {
    let github = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .expect(1)
        .mount(&github)
        .await;

    let client = connect(&github).await;
    let result = call(
        &client,
        "archive_repository",
        json!({ "owner": "octocat", "name": "missing" }),
    )
    .await;

    assert!(result.is_error.unwrap_or(false));
    let failure = body(&result);
    assert_eq!(failure["status"], "failure");
    assert_eq!(failure["kind"], "not_found");
    assert_eq!(failure["message"], "Not Found");
    client.cancel().await.unwrap();
}

#[tokio::test]
async fn test_tool_invalid_arguments_are_tool_errors() {
    let github = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&github)
        .await;

    let client = connect(&github).await;
    for (name, args) in [
        ("delete_repository", json!({ "owner": "octocat" })),
        ("list_repositories", json!({ "archived": "yes" })),
        ("make_private", json!({ "owner": "octocat", "name": "hello", "force": true })),
        ("update_repository", json!({ "owner": "..", "name": "user", "description": "x" })),
    ] {
        let result = call(&client, name, args).await;
        assert!(result.is_error.unwrap_or(false), "{name}");
        assert_eq!(body(&result)["kind"], "invalid_argument", "{name}");
    }
    client.cancel().await.unwrap();
}

#[tokio::test]
async fn test_tool_list_advertises_all_operations() {
    let github = MockServer::start().await;
    let client = connect(&github).await;

    let mut names: Vec<String> = client
        .list_all_tools()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name.to_string())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "archive_repository",
            "delete_repository",
            "list_repositories",
            "make_private",
            "unarchive_repository",
            "update_repository",
        ]
    );
    client.cancel().await.unwrap();
}
