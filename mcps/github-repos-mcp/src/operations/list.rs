//! List and filter repositories

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Operation;
use crate::normalize::decode_repositories;
use crate::params::ListReposParams;
use crate::remote::{RemoteClient, RemoteResult};
use crate::types::Repository;

/// Exact-match filters over repository flags; `None` means "any"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoFilter {
    pub archived: Option<bool>,
    pub fork: Option<bool>,
    pub private: Option<bool>,
}

impl RepoFilter {
    pub fn matches(&self, repo: &Repository) -> bool {
        self.archived.map_or(true, |v| repo.archived == v)
            && self.fork.map_or(true, |v| repo.fork == v)
            && self.private.map_or(true, |v| repo.private == v)
    }
}

impl From<ListReposParams> for RepoFilter {
    fn from(p: ListReposParams) -> Self {
        Self {
            archived: p.archived,
            fork: p.fork,
            private: p.private,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoList {
    pub count: usize,
    pub repositories: Vec<Repository>,
}

/// `list_repositories`: every repository of the authenticated user, filtered
pub struct ListRepositories;

#[async_trait]
impl Operation for ListRepositories {
    type Params = ListReposParams;
    type Input = RepoFilter;
    type Output = RepoList;

    const NAME: &'static str = "list_repositories";

    fn validate(params: ListReposParams) -> Result<RepoFilter, String> {
        Ok(params.into())
    }

    async fn run(&self, client: &RemoteClient, filter: RepoFilter) -> RemoteResult<RepoList> {
        info!(?filter, "listing repositories");

        let query = [
            ("sort", "created".to_string()),
            ("direction", "asc".to_string()),
        ];
        let mut pages = client.list_paged("user/repos", &query);

        // Any failing page aborts the whole listing; no partial results
        let mut repositories = Vec::new();
        let mut page_count = 0usize;
        while let Some(page) = pages.next_page().await {
            let page = page?;
            repositories.extend(decode_repositories(&page)?);
            page_count += 1;
        }
        debug!(pages = page_count, total = repositories.len(), "fetched all pages");

        repositories.retain(|r| filter.matches(r));
        Ok(RepoList {
            count: repositories.len(),
            repositories,
        })
    }
}
