use serde::{Deserialize, Serialize};

use folio_history::ROOT_BRANCH;

/// Configuration for one project checkout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Project id everything is namespaced under.
    pub project: String,
    /// Author recorded on snapshots.
    pub author: String,
    /// Name of the branch created on first access.
    pub root_branch: String,
}

impl FolioConfig {
    /// Config for `project` with default author and root branch.
    pub fn for_project(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            ..Self::default()
        }
    }
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            project: "default".into(),
            author: "anonymous".into(),
            root_branch: ROOT_BRANCH.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = FolioConfig::default();
        assert_eq!(config.project, "default");
        assert_eq!(config.author, "anonymous");
        assert_eq!(config.root_branch, "master");
    }

    #[test]
    fn for_project_overrides_only_the_project() {
        let config = FolioConfig::for_project("workspace-1");
        assert_eq!(config.project, "workspace-1");
        assert_eq!(config.root_branch, "master");
    }
}
