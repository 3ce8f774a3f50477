//! Delete a repository

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::Operation;
use crate::params::RepoRefParams;
use crate::remote::{RemoteClient, RemoteResult};
use crate::types::RepoId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    /// "owner/name" of the removed repository
    pub deleted: String,
}

/// `delete_repository`: a single DELETE.
///
/// Deleting a repository that is already gone reports `NotFound`; success is
/// never synthesized.
pub struct DeleteRepository;

#[async_trait]
impl Operation for DeleteRepository {
    type Params = RepoRefParams;
    type Input = RepoId;
    type Output = DeleteConfirmation;

    const NAME: &'static str = "delete_repository";

    fn validate(params: RepoRefParams) -> Result<RepoId, String> {
        params.repo_id()
    }

    async fn run(&self, client: &RemoteClient, id: RepoId) -> RemoteResult<DeleteConfirmation> {
        info!(repo = %id, "deleting repository");
        client.send(Method::DELETE, &id.api_path(), &[], None).await?;
        Ok(DeleteConfirmation {
            deleted: id.to_string(),
        })
    }
}
