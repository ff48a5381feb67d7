//! Project configuration types
//!
//! A [`Project`] is what a lookup produces: repository access, cluster
//! placement and the user-supplied secrets for one project.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sidecar image used when a project does not name one
pub const DEFAULT_VCS_SIDECAR: &str = "acidic.azurecr.io/vcs-sidecar:latest";

/// Stand-in for newlines in stored SSH keys
///
/// Record values cannot carry raw newlines, so keys are written with every
/// newline replaced by this character.
pub const SSH_KEY_NEWLINE_ESCAPE: char = '$';

const REDACTED: &str = "********";

/// Fully resolved project configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Record name the project was loaded from
    pub name: String,
    /// Secret shared with webhook senders
    pub shared_secret: String,
    /// Token for the GitHub API
    pub github_token: String,
    /// Cluster placement
    pub kubernetes: Kubernetes,
    /// Source repository
    pub repo: Repo,
    /// Environment secrets passed to jobs
    pub secrets: BTreeMap<String, String>,
}

/// Cluster placement of a project's jobs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kubernetes {
    /// Namespace jobs run in
    pub namespace: String,
    /// Image that checks out the repository
    pub vcs_sidecar: String,
}

/// Source repository of a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repo {
    /// Repository name, e.g. `deis/acid`
    pub name: String,
    /// Private SSH key, multi-line
    pub ssh_key: String,
    /// URL to clone from
    #[serde(rename = "cloneURL")]
    pub clone_url: String,
}

impl Project {
    /// Copy with credentials masked
    ///
    /// Empty credentials stay empty so the output still shows what is unset.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut out = self.clone();
        mask(&mut out.shared_secret);
        mask(&mut out.github_token);
        mask(&mut out.repo.ssh_key);
        out.secrets.values_mut().for_each(mask);
        out
    }
}

fn mask(value: &mut String) {
    if !value.is_empty() {
        *value = REDACTED.to_string();
    }
}

/// Restore a stored SSH key to its multi-line form
///
/// Every escape character is replaced, not only the first.
#[inline]
#[must_use]
pub fn unescape_ssh_key(stored: &str) -> String {
    stored.replace(SSH_KEY_NEWLINE_ESCAPE, "\n")
}

/// Escape an SSH key for storage
///
/// Lossy for keys that already contain the escape character: those come back
/// with newlines in its place.
#[inline]
#[must_use]
pub fn escape_ssh_key(key: &str) -> String {
    key.replace('\n', &SSH_KEY_NEWLINE_ESCAPE.to_string())
}
