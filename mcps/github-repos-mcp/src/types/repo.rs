//! Repository type definitions

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies a repository by owner and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    /// Validate and build an identifier.
    ///
    /// Both parts must be non-empty and use only the characters GitHub
    /// allows in logins and repository names.
    pub fn parse(owner: &str, name: &str) -> Result<Self, String> {
        validate_segment("owner", owner)?;
        validate_segment("name", name)?;
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Path of this repository under the API root
    pub fn api_path(&self) -> String {
        format!("repos/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn validate_segment(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(format!("{field} '{value}' contains invalid character '{bad}'"));
    }
    // Dot segments would be collapsed when joined onto the API root
    if value == "." || value == ".." {
        return Err(format!("{field} '{value}' is not a valid path segment"));
    }
    Ok(())
}

/// A repository as returned to tool callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub owner: String,
    pub name: String,
    /// "owner/name"
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Web URL of the repository
    pub url: String,
    pub private: bool,
    /// "public", "private" or "internal"
    pub visibility: String,
    pub fork: bool,
    pub archived: bool,
    pub default_branch: String,
    pub updated_at: DateTime<Utc>,
}

/// Partial set of mutable repository attributes.
///
/// Only fields that are `Some` are serialized, so a PATCH built from this
/// never touches attributes the caller did not name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}

impl RepoPatch {
    pub fn private(value: bool) -> Self {
        Self {
            private: Some(value),
            ..Self::default()
        }
    }

    pub fn archived(value: bool) -> Self {
        Self {
            archived: Some(value),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Names of the attributes this patch sets
    pub fn fields(&self) -> Vec<&'static str> {
        [
            ("description", self.description.is_some()),
            ("homepage", self.homepage.is_some()),
            ("private", self.private.is_some()),
            ("archived", self.archived.is_some()),
            ("default_branch", self.default_branch.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repo_id_parse() {
        let id = RepoId::parse("octo-cat", "hello_world.rs").unwrap();
        assert_eq!(id.to_string(), "octo-cat/hello_world.rs");
        assert_eq!(id.api_path(), "repos/octo-cat/hello_world.rs");
    }

    #[test]
    fn test_repo_id_rejects_bad_input() {
        assert!(RepoId::parse("", "repo").is_err());
        assert!(RepoId::parse("owner", "").is_err());
        assert!(RepoId::parse("owner", "a/b").is_err());
        assert!(RepoId::parse("own er", "repo").is_err());
        assert!(RepoId::parse("owner", "..").is_err());
        assert!(RepoId::parse("..", "user").is_err());
        assert!(RepoId::parse(".", "repo").is_err());
        // dots inside a name are fine
        assert!(RepoId::parse("octocat", "..hidden").is_ok());
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = RepoPatch {
            description: Some("x".to_string()),
            ..RepoPatch::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "description": "x" }));
        assert_eq!(patch.fields(), vec!["description"]);
    }

    #[test]
    fn test_empty_patch() {
        assert!(RepoPatch::default().is_empty());
        assert!(!RepoPatch::archived(false).is_empty());
        assert_eq!(
            serde_json::to_value(RepoPatch::archived(false)).unwrap(),
            json!({ "archived": false })
        );
    }
}
