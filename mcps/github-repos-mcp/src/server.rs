//! MCP Server implementation
//!
//! This module exposes the repository operations as MCP tools. Every tool
//! call goes through the [`Dispatcher`]; failures come back as tool results
//! flagged `is_error`, carrying the failure kind and message as JSON, never
//! as protocol errors.
//!
//! Tools take their arguments as a raw JSON object so that argument errors
//! are reported by the dispatcher like any other failure. The published
//! input schemas still come from the typed parameter structs.

use std::sync::Arc;

use rmcp::{
    handler::server::{common::schema_for_type, router::tool::ToolRouter},
    model::{CallToolResult, Content, JsonObject, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use serde_json::Value;

use crate::config::Config;
use crate::dispatcher::{Dispatcher, ToolInvocation};
use crate::normalize::OperationResult;
use crate::params::{ListReposParams, RepoRefParams, UpdateRepoParams};
use crate::remote::{ClientInitError, RemoteClient, RetryPolicy};

/// The main GitHub Repositories MCP Server
#[derive(Clone)]
pub struct GitHubReposMcpServer {
    dispatcher: Arc<Dispatcher>,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl GitHubReposMcpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            tool_router: Self::tool_router(),
        }
    }

    /// Build the client and dispatcher from configuration
    pub fn from_config(config: &Config) -> Result<Self, ClientInitError> {
        let client = RemoteClient::new(&config.github, RetryPolicy::from(&config.retry))?;
        tracing::info!("Using GitHub API at {}", client.base_url());
        if !client.has_credential() {
            tracing::warn!("No GitHub token configured; every call will fail as unauthenticated");
        }

        let dispatcher = Dispatcher::new(client).with_timeout(config.dispatch.timeout());
        Ok(Self::new(dispatcher))
    }

    /// Invoke an operation in-process, bypassing the MCP transport
    pub async fn invoke(&self, name: &str, arguments: Value) -> OperationResult {
        self.dispatcher
            .dispatch(ToolInvocation::new(name, arguments))
            .await
    }

    async fn route(&self, name: &str, arguments: JsonObject) -> Result<CallToolResult, McpError> {
        to_call_result(self.invoke(name, Value::Object(arguments)).await)
    }

    // ========================================================================
    // Repository Tools
    // ========================================================================

    #[tool(
        description = "List repositories owned by the authenticated user, in creation order. Optional exact-match filters: archived, fork, private.",
        input_schema = schema_for_type::<ListReposParams>()
    )]
    async fn list_repositories(&self, arguments: JsonObject) -> Result<CallToolResult, McpError> {
        self.route("list_repositories", arguments).await
    }

    #[tool(
        description = "Permanently delete a repository. Deleting a repository that does not exist fails with not_found.",
        input_schema = schema_for_type::<RepoRefParams>()
    )]
    async fn delete_repository(&self, arguments: JsonObject) -> Result<CallToolResult, McpError> {
        self.route("delete_repository", arguments).await
    }

    #[tool(
        description = "Update repository attributes (description, homepage, private, archived, default_branch). Only the supplied attributes are changed.",
        input_schema = schema_for_type::<UpdateRepoParams>()
    )]
    async fn update_repository(&self, arguments: JsonObject) -> Result<CallToolResult, McpError> {
        self.route("update_repository", arguments).await
    }

    #[tool(
        description = "Set a repository's visibility to private. Fails with conflict if the account plan does not allow it.",
        input_schema = schema_for_type::<RepoRefParams>()
    )]
    async fn make_private(&self, arguments: JsonObject) -> Result<CallToolResult, McpError> {
        self.route("make_private", arguments).await
    }

    #[tool(
        description = "Archive a repository, making it read-only. Archiving an archived repository succeeds without changes.",
        input_schema = schema_for_type::<RepoRefParams>()
    )]
    async fn archive_repository(&self, arguments: JsonObject) -> Result<CallToolResult, McpError> {
        self.route("archive_repository", arguments).await
    }

    #[tool(
        description = "Unarchive a repository. Unarchiving an active repository succeeds without changes.",
        input_schema = schema_for_type::<RepoRefParams>()
    )]
    async fn unarchive_repository(&self, arguments: JsonObject) -> Result<CallToolResult, McpError> {
        self.route("unarchive_repository", arguments).await
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for GitHubReposMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "GitHub Repositories MCP Server - list, filter, update, archive, make private \
                 and delete repositories of the authenticated GitHub user via the REST API. \
                 Failed calls return a JSON object with a stable `kind` \
                 (e.g. not_found, forbidden, conflict, rate_limited) and a `message`."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Render an operation result as a tool result
fn to_call_result(result: OperationResult) -> Result<CallToolResult, McpError> {
    match result {
        OperationResult::Success { payload } => {
            let json = serde_json::to_string_pretty(&payload)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult::success(vec![Content::text(json)]))
        }
        failure => {
            let json = serde_json::to_string_pretty(&failure)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult::error(vec![Content::text(json)]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::FailureKind;
    use serde_json::json;

    #[test]
    fn test_success_becomes_plain_result() {
        let result = to_call_result(OperationResult::success(&json!({ "count": 0 }))).unwrap();
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(result.content.len(), 1);
    }

    #[test]
    fn test_failure_becomes_error_result() {
        let result = to_call_result(OperationResult::failure(FailureKind::Conflict, "nope")).unwrap();
        assert!(result.is_error.unwrap_or(false));
    }

    #[test]
    fn test_tools_registered_with_operation_names() {
        let mut config = Config::default();
        config.github.token = Some("t".to_string());
        let server = GitHubReposMcpServer::from_config(&config).unwrap();

        let mut tools: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        tools.sort();
        let expected: Vec<String> = server
            .dispatcher
            .operation_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        assert_eq!(tools, expected);
    }

    #[test]
    fn test_tools_publish_typed_schemas() {
        let mut config = Config::default();
        config.github.token = Some("t".to_string());
        let server = GitHubReposMcpServer::from_config(&config).unwrap();

        let tool = server
            .tool_router
            .list_all()
            .into_iter()
            .find(|t| t.name == "update_repository")
            .unwrap();
        let properties = tool.input_schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("owner"));
        assert!(properties.contains_key("default_branch"));
    }
}
