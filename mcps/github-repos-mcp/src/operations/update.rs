//! Update repository attributes

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{patch_repository, Operation};
use crate::params::{RepoRefParams, UpdateRepoParams};
use crate::remote::{RemoteClient, RemoteResult};
use crate::types::{RepoId, RepoPatch, Repository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub repository: Repository,
    /// Attributes that were sent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updated: Vec<String>,
}

/// `update_repository`: PATCH only the supplied attributes
pub struct UpdateRepository;

#[async_trait]
impl Operation for UpdateRepository {
    type Params = UpdateRepoParams;
    type Input = (RepoId, RepoPatch);
    type Output = UpdateOutcome;

    const NAME: &'static str = "update_repository";

    fn validate(params: UpdateRepoParams) -> Result<(RepoId, RepoPatch), String> {
        let id = params.repo_id()?;
        let patch = params.patch();
        if patch.is_empty() {
            return Err("at least one attribute to update must be supplied".to_string());
        }
        if patch.default_branch.as_deref().is_some_and(|b| b.trim().is_empty()) {
            return Err("default_branch must not be empty".to_string());
        }
        Ok((id, patch))
    }

    async fn run(
        &self,
        client: &RemoteClient,
        input: (RepoId, RepoPatch),
    ) -> RemoteResult<UpdateOutcome> {
        let (id, patch) = input;
        let updated: Vec<String> = patch.fields().into_iter().map(str::to_string).collect();
        info!(repo = %id, fields = ?updated, "updating repository");

        let repository = patch_repository(client, &id, &patch).await?;
        Ok(UpdateOutcome {
            repository,
            updated,
        })
    }
}

/// `make_private`: update restricted to `private = true`.
///
/// GitHub answers 422 when the plan does not allow it; that surfaces as
/// `Conflict`, distinct from `Forbidden`.
pub struct MakePrivate;

#[async_trait]
impl Operation for MakePrivate {
    type Params = RepoRefParams;
    type Input = RepoId;
    type Output = UpdateOutcome;

    const NAME: &'static str = "make_private";

    fn validate(params: RepoRefParams) -> Result<RepoId, String> {
        params.repo_id()
    }

    async fn run(&self, client: &RemoteClient, id: RepoId) -> RemoteResult<UpdateOutcome> {
        info!(repo = %id, "making repository private");
        let repository = patch_repository(client, &id, &RepoPatch::private(true)).await?;
        Ok(UpdateOutcome {
            repository,
            updated: vec!["private".to_string()],
        })
    }
}
