//! Repository operations
//!
//! One module per capability: list, delete, update, archive. Each operation
//! is a typed [`Operation`]: it declares its argument schema, turns raw
//! arguments into a validated input, then maps that input onto one or more
//! [`RemoteClient`] calls. Operations never retry; the client owns that.
//!
//! [`ToolHandler`] is the object-safe face the dispatcher stores. Every
//! `Operation` gets it for free.

mod archive;
mod delete;
mod list;
mod update;

pub use archive::{ArchiveOutcome, ArchiveRepository, UnarchiveRepository};
pub use delete::{DeleteConfirmation, DeleteRepository};
pub use list::{ListRepositories, RepoFilter, RepoList};
pub use update::{MakePrivate, UpdateOutcome, UpdateRepository};

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::normalize::{decode_repository, FailureKind, OperationResult};
use crate::remote::{RemoteClient, RemoteResult};
use crate::types::{RepoId, RepoPatch, Repository};

/// A single repository capability with a typed contract
#[async_trait]
pub trait Operation: Send + Sync + 'static {
    /// Arguments as they arrive from the caller
    type Params: DeserializeOwned + Send;
    /// Arguments after validation
    type Input: Send;
    /// Success payload
    type Output: Serialize + Send;

    /// Tool name this operation is registered under
    const NAME: &'static str;

    /// Check arguments that serde alone cannot. Runs before any remote call.
    fn validate(params: Self::Params) -> Result<Self::Input, String>;

    async fn run(&self, client: &RemoteClient, input: Self::Input) -> RemoteResult<Self::Output>;
}

/// Type-erased operation, as stored by the dispatcher
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Validate `arguments` and, if they pass, run the operation
    async fn call(&self, client: &RemoteClient, arguments: Value) -> OperationResult;
}

#[async_trait]
impl<O: Operation> ToolHandler for O {
    fn name(&self) -> &'static str {
        O::NAME
    }

    async fn call(&self, client: &RemoteClient, arguments: Value) -> OperationResult {
        let input = match parse_arguments::<O::Params>(arguments).and_then(O::validate) {
            Ok(input) => input,
            Err(message) => {
                tracing::debug!(operation = O::NAME, %message, "rejected arguments");
                return OperationResult::failure(FailureKind::InvalidArgument, message);
            }
        };

        match self.run(client, input).await {
            Ok(output) => OperationResult::success(&output),
            Err(err) => err.into(),
        }
    }
}

/// Deserialize tool arguments; a missing/null argument object counts as `{}`
fn parse_arguments<P: DeserializeOwned>(arguments: Value) -> Result<P, String> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    if !arguments.is_object() {
        return Err("arguments must be a JSON object".to_string());
    }
    serde_json::from_value(arguments).map_err(|e| format!("invalid arguments: {e}"))
}

/// GET a single repository
pub(crate) async fn fetch_repository(client: &RemoteClient, id: &RepoId) -> RemoteResult<Repository> {
    let raw = client.send(Method::GET, &id.api_path(), &[], None).await?;
    decode_repository(&raw)
}

/// PATCH only the attributes present in `patch`
pub(crate) async fn patch_repository(
    client: &RemoteClient,
    id: &RepoId,
    patch: &RepoPatch,
) -> RemoteResult<Repository> {
    let body = serde_json::to_value(patch)
        .map_err(|e| crate::remote::RemoteError::malformed(format!("could not encode update: {e}")))?;
    let raw = client
        .send(Method::PATCH, &id.api_path(), &[], Some(&body))
        .await?;
    decode_repository(&raw)
}
