//! Tool dispatch
//!
//! The [`Dispatcher`] owns the operation registry and the shared
//! [`RemoteClient`]. It looks an invocation up by exact name, lets the
//! operation validate its own arguments, applies the optional per-call
//! timeout and always answers with an [`OperationResult`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::normalize::{FailureKind, OperationResult};
use crate::operations::{
    ArchiveRepository, DeleteRepository, ListRepositories, MakePrivate, Operation, ToolHandler,
    UnarchiveRepository, UpdateRepository,
};
use crate::remote::RemoteClient;

/// A single request naming one operation and its arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub operation_name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolInvocation {
    pub fn new(operation_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            operation_name: operation_name.into(),
            arguments,
        }
    }
}

/// Routes invocations to repository operations
pub struct Dispatcher {
    client: RemoteClient,
    handlers: HashMap<&'static str, Arc<dyn ToolHandler>>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    /// Build a dispatcher with every repository operation registered
    pub fn new(client: RemoteClient) -> Self {
        let mut dispatcher = Self {
            client,
            handlers: HashMap::new(),
            timeout: None,
        };
        dispatcher.register(ListRepositories);
        dispatcher.register(DeleteRepository);
        dispatcher.register(UpdateRepository);
        dispatcher.register(MakePrivate);
        dispatcher.register(ArchiveRepository);
        dispatcher.register(UnarchiveRepository);
        dispatcher
    }

    /// Abandon invocations that run longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn register<O: Operation>(&mut self, operation: O) {
        self.handlers.insert(O::NAME, Arc::new(operation));
    }

    /// Registered operation names, sorted
    pub fn operation_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Run exactly one operation for `invocation`
    pub async fn dispatch(&self, invocation: ToolInvocation) -> OperationResult {
        let name = invocation.operation_name.as_str();

        let Some(handler) = self.handlers.get(name) else {
            warn!(operation = name, "unknown operation");
            return OperationResult::failure(
                FailureKind::UnknownOperation,
                format!("unknown operation '{name}'"),
            );
        };

        let call = handler.call(&self.client, invocation.arguments);
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => OperationResult::failure(
                    FailureKind::Timeout,
                    format!("'{name}' did not finish within {}s", limit.as_secs_f64()),
                ),
            },
            None => call.await,
        };

        match result.failure_kind() {
            None => info!(operation = handler.name(), "operation succeeded"),
            Some(kind) => warn!(operation = handler.name(), %kind, "operation failed"),
        }
        result
    }
}
