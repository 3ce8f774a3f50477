//! Archive and unarchive repositories
//!
//! Both directions read the current state first. When the repository is
//! already in the requested state nothing is written and the call succeeds
//! with `changed: false`. A conflict GitHub reports on the write itself is
//! passed through as `Conflict`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{fetch_repository, patch_repository, Operation};
use crate::params::RepoRefParams;
use crate::remote::{RemoteClient, RemoteResult};
use crate::types::{RepoId, RepoPatch, Repository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveOutcome {
    pub repository: Repository,
    /// False when the repository was already in the requested state
    pub changed: bool,
}

async fn set_archived(client: &RemoteClient, id: &RepoId, archived: bool) -> RemoteResult<ArchiveOutcome> {
    let current = fetch_repository(client, id).await?;
    if current.archived == archived {
        info!(repo = %id, archived, "repository already in requested state");
        return Ok(ArchiveOutcome {
            repository: current,
            changed: false,
        });
    }

    info!(repo = %id, archived, "changing archive state");
    let repository = patch_repository(client, id, &RepoPatch::archived(archived)).await?;
    Ok(ArchiveOutcome {
        repository,
        changed: true,
    })
}

/// `archive_repository`: make the repository read-only
pub struct ArchiveRepository;

#[async_trait]
impl Operation for ArchiveRepository {
    type Params = RepoRefParams;
    type Input = RepoId;
    type Output = ArchiveOutcome;

    const NAME: &'static str = "archive_repository";

    fn validate(params: RepoRefParams) -> Result<RepoId, String> {
        params.repo_id()
    }

    async fn run(&self, client: &RemoteClient, id: RepoId) -> RemoteResult<ArchiveOutcome> {
        set_archived(client, &id, true).await
    }
}

/// `unarchive_repository`: make an archived repository writable again
pub struct UnarchiveRepository;

#[async_trait]
impl Operation for UnarchiveRepository {
    type Params = RepoRefParams;
    type Input = RepoId;
    type Output = ArchiveOutcome;

    const NAME: &'static str = "unarchive_repository";

    fn validate(params: RepoRefParams) -> Result<RepoId, String> {
        params.repo_id()
    }

    async fn run(&self, client: &RemoteClient, id: RepoId) -> RemoteResult<ArchiveOutcome> {
        set_archived(client, &id, false).await
    }
}
