//! Record data → [`Project`] decoding
//!
//! Project records are sparse: any key may be missing, and a present but
//! empty value means the same as a missing one. Each field falls back to a
//! fixed default or to a value supplied by the caller.

use crate::error::DecodeError;
use crate::project::{unescape_ssh_key, Kubernetes, Project, Repo, DEFAULT_VCS_SIDECAR};
use std::collections::BTreeMap;

/// Data keys of a project record
///
/// Existing records use these exact spellings.
pub mod keys {
    pub const SHARED_SECRET: &str = "sharedSecret";
    pub const GITHUB_TOKEN: &str = "githubToken";
    pub const NAMESPACE: &str = "namespace";
    pub const VCS_SIDECAR: &str = "vcsSidecar";
    pub const REPOSITORY: &str = "repository";
    pub const SSH_KEY: &str = "sshKey";
    pub const CLONE_URL: &str = "cloneURL";
    pub const SECRETS: &str = "secrets";
}

/// Decode record data into a project
///
/// `fallback_namespace` is the namespace the record was read from and
/// `record_name` its name; they default `kubernetes.namespace` and
/// `repo.name`. The `projectName` annotation is accepted for tracing only:
/// records predating the `repository` key were named after their record, and
/// that fallback is kept.
///
/// # Errors
/// Returns [`DecodeError::Secrets`] if `secrets` is present but not a JSON
/// object of strings. Nothing is returned in that case.
pub fn decode(
    data: &BTreeMap<String, Vec<u8>>,
    fallback_namespace: &str,
    record_name: &str,
    annotated_repo_name: &str,
) -> Result<Project, DecodeError> {
    let field = |key: &str, default: &str| or_default(data.get(key), default);

    let repo = Repo {
        name: field(keys::REPOSITORY, record_name),
        ssh_key: unescape_ssh_key(&field(keys::SSH_KEY, "")),
        clone_url: field(keys::CLONE_URL, ""),
    };
    tracing::trace!(
        annotated = annotated_repo_name,
        resolved = %repo.name,
        "repository name resolved"
    );

    Ok(Project {
        name: record_name.to_string(),
        shared_secret: field(keys::SHARED_SECRET, ""),
        github_token: field(keys::GITHUB_TOKEN, ""),
        kubernetes: Kubernetes {
            namespace: field(keys::NAMESPACE, fallback_namespace),
            vcs_sidecar: field(keys::VCS_SIDECAR, DEFAULT_VCS_SIDECAR),
        },
        repo,
        secrets: decode_secrets(data.get(keys::SECRETS))?,
    })
}

/// Value as a string, or `default` when missing or empty
///
/// Invalid UTF-8 is replaced rather than rejected.
#[inline]
#[must_use]
pub fn or_default(value: Option<&Vec<u8>>, default: &str) -> String {
    match value {
        Some(bytes) if !bytes.is_empty() => String::from_utf8_lossy(bytes).into_owned(),
        _ => default.to_string(),
    }
}

fn decode_secrets(value: Option<&Vec<u8>>) -> Result<BTreeMap<String, String>, DecodeError> {
    match value {
        Some(bytes) if !bytes.is_empty() => {
            serde_json::from_slice(bytes).map_err(DecodeError::Secrets)
        }
        _ => Ok(BTreeMap::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn data(entries: &[(&str, &str)]) -> BTreeMap<String, Vec<u8>> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.as_bytes().to_vec()))
            .collect()
    }

    #[test]
    fn empty_record_gets_defaults() {
        let project = decode(&BTreeMap::new(), "default", "acid-abc", "").unwrap();

        assert_eq!(project.name, "acid-abc");
        assert_eq!(project.shared_secret, "");
        assert_eq!(project.github_token, "");
        assert_eq!(project.kubernetes.namespace, "default");
        assert_eq!(project.kubernetes.vcs_sidecar, DEFAULT_VCS_SIDECAR);
        assert_eq!(project.repo.name, "acid-abc");
        assert_eq!(project.repo.ssh_key, "");
        assert_eq!(project.repo.clone_url, "");
        assert!(project.secrets.is_empty());
    }

    #[test]
    fn empty_values_count_as_missing() {
        let record = data(&[
            (keys::NAMESPACE, ""),
            (keys::VCS_SIDECAR, ""),
            (keys::REPOSITORY, ""),
            (keys::SECRETS, ""),
        ]);
        let project = decode(&record, "ci", "acid-abc", "").unwrap();

        assert_eq!(project.kubernetes.namespace, "ci");
        assert_eq!(project.kubernetes.vcs_sidecar, DEFAULT_VCS_SIDECAR);
        assert_eq!(project.repo.name, "acid-abc");
        assert!(project.secrets.is_empty());
    }

    #[test]
    fn present_values_are_used_verbatim() {
        let record = data(&[
            (keys::SHARED_SECRET, "hook-secret"),
            (keys::GITHUB_TOKEN, "ghp_$abc"),
            (keys::NAMESPACE, "builds"),
            (keys::VCS_SIDECAR, "example.com/sidecar:v2"),
            (keys::REPOSITORY, "deis/acid"),
            (keys::CLONE_URL, "https://github.com/deis/acid.git"),
        ]);
        let project = decode(&record, "default", "acid-abc", "deis/acid").unwrap();

        assert_eq!(project.shared_secret, "hook-secret");
        // Only the SSH key is unescaped
        assert_eq!(project.github_token, "ghp_$abc");
        assert_eq!(project.kubernetes.namespace, "builds");
        assert_eq!(project.kubernetes.vcs_sidecar, "example.com/sidecar:v2");
        assert_eq!(project.repo.name, "deis/acid");
        assert_eq!(project.repo.clone_url, "https://github.com/deis/acid.git");
    }

    #[test]
    fn ssh_key_is_unescaped() {
        let record = data(&[(keys::SSH_KEY, "line1$line2$line3")]);
        let project = decode(&record, "default", "acid-abc", "").unwrap();
        assert_eq!(project.repo.ssh_key, "line1\nline2\nline3");
    }

    #[test]
    fn annotation_does_not_override_repository_fallback() {
        let project = decode(&BTreeMap::new(), "default", "acid-abc", "my-repo").unwrap();
        assert_eq!(project.repo.name, "acid-abc");
    }

    #[test]
    fn secrets_are_parsed() {
        let record = data(&[(keys::SECRETS, r#"{"A":"1","B":"2"}"#)]);
        let project = decode(&record, "default", "acid-abc", "").unwrap();

        let expected: BTreeMap<String, String> =
            [("A".to_string(), "1".to_string()), ("B".to_string(), "2".to_string())]
                .into_iter()
                .collect();
        assert_eq!(project.secrets, expected);
    }

    #[test]
    fn malformed_secrets_abort_decode() {
        let record = data(&[(keys::SECRETS, "not-json"), (keys::REPOSITORY, "deis/acid")]);
        let result = decode(&record, "default", "acid-abc", "");
        assert!(matches!(result, Err(DecodeError::Secrets(_))));
    }

    #[test]
    fn non_string_secret_values_are_rejected() {
        let record = data(&[(keys::SECRETS, r#"{"A":1}"#)]);
        assert!(decode(&record, "default", "acid-abc", "").is_err());
    }

    #[test]
    fn or_default_handles_invalid_utf8() {
        let bytes = vec![b'o', 0xff, b'k'];
        assert_eq!(or_default(Some(&bytes), "x"), "o\u{fffd}k");
        assert_eq!(or_default(None, "x"), "x");
        assert_eq!(or_default(Some(&Vec::new()), "x"), "x");
    }
}
