//! Repository parameter types

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::{RepoId, RepoPatch};

#[derive(Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListReposParams {
    #[schemars(description = "Only archived (true) or only active (false) repositories; omit for both")]
    pub archived: Option<bool>,
    #[schemars(description = "Only forks (true) or only non-forks (false); omit for both")]
    pub fork: Option<bool>,
    #[schemars(description = "Only private (true) or only public (false) repositories; omit for both")]
    pub private: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RepoRefParams {
    #[schemars(description = "User or organization that owns the repository")]
    pub owner: String,
    #[schemars(description = "Repository name")]
    pub name: String,
}

impl RepoRefParams {
    pub fn repo_id(&self) -> Result<RepoId, String> {
        RepoId::parse(&self.owner, &self.name)
    }
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateRepoParams {
    #[schemars(description = "User or organization that owns the repository")]
    pub owner: String,
    #[schemars(description = "Repository name")]
    pub name: String,
    #[schemars(description = "New description")]
    pub description: Option<String>,
    #[schemars(description = "New homepage URL")]
    pub homepage: Option<String>,
    #[schemars(description = "Set visibility to private (true) or public (false)")]
    pub private: Option<bool>,
    #[schemars(description = "Archive (true) or unarchive (false)")]
    pub archived: Option<bool>,
    #[schemars(description = "Branch to use as the default branch")]
    pub default_branch: Option<String>,
}

impl UpdateRepoParams {
    pub fn repo_id(&self) -> Result<RepoId, String> {
        RepoId::parse(&self.owner, &self.name)
    }

    /// The attributes the caller supplied; unset ones stay unset
    pub fn patch(&self) -> RepoPatch {
        RepoPatch {
            description: self.description.clone(),
            homepage: self.homepage.clone(),
            private: self.private,
            archived: self.archived,
            default_branch: self.default_branch.clone(),
        }
    }
}
