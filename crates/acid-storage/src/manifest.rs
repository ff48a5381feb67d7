//! Secret store backed by Kubernetes manifests on disk
//!
//! Records live at `<root>/<namespace>/<name>.yaml` (or `.yml`) as ordinary
//! `v1/Secret` manifests, the same documents `kubectl apply` accepts:
//!
//! ```yaml
//! apiVersion: v1
//! kind: Secret
//! metadata:
//!   name: acid-2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e730433
//!   annotations:
//!     projectName: deis/acid
//! data:
//!   sshKey: LS0tLS1CRUdJTi...
//! stringData:
//!   repository: deis/acid
//! ```
//!
//! `data` values are base64; `stringData` values are plain and win over a
//! `data` entry with the same key.

use crate::error::StoreError;
use crate::record::{SecretRecord, SecretStore};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const SECRET_KIND: &str = "Secret";
const EXTENSIONS: [&str; 2] = ["yaml", "yml"];

/// Store reading one manifest file per lookup
#[derive(Debug, Clone)]
pub struct ManifestSecretStore {
    root: PathBuf,
}

impl ManifestSecretStore {
    /// Create store rooted at `root`
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate manifest paths for a record, in lookup order
    #[must_use]
    pub fn manifest_paths(&self, namespace: &str, name: &str) -> Vec<PathBuf> {
        let dir = self.root.join(namespace);
        EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{name}.{ext}")))
            .collect()
    }

    async fn read_manifest(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<(PathBuf, String), StoreError> {
        for path in self.manifest_paths(namespace, name) {
            match tokio::fs::read_to_string(&path).await {
                Ok(contents) => return Ok((path, contents)),
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => {
                    return Err(StoreError::Unavailable(format!(
                        "reading {}: {err}",
                        path.display()
                    )))
                }
            }
        }
        Err(StoreError::not_found(namespace, name))
    }
}

#[async_trait]
impl SecretStore for ManifestSecretStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretRecord, StoreError> {
        // Such names cannot exist in a cluster and must not escape the root
        if !is_path_safe(namespace) || !is_path_safe(name) {
            return Err(StoreError::not_found(namespace, name));
        }

        let (path, contents) = self.read_manifest(namespace, name).await?;
        tracing::debug!(path = %path.display(), "read secret manifest");
        parse_manifest(&path, &contents, namespace, name)
    }
}

fn is_path_safe(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretManifest {
    kind: String,
    metadata: ManifestMetadata,
    #[serde(default)]
    data: BTreeMap<String, String>,
    #[serde(default)]
    string_data: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ManifestMetadata {
    name: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    annotations: BTreeMap<String, String>,
}

/// Parse a manifest into a record
///
/// # Errors
/// Returns [`StoreError::Malformed`] if the document is not a `Secret`, names
/// a different record, or carries `data` that is not base64.
pub fn parse_manifest(
    path: &Path,
    contents: &str,
    namespace: &str,
    name: &str,
) -> Result<SecretRecord, StoreError> {
    let manifest: SecretManifest = serde_yaml::from_str(contents)
        .map_err(|e| StoreError::malformed(path, e.to_string()))?;

    if manifest.kind != SECRET_KIND {
        return Err(StoreError::malformed(
            path,
            format!("expected kind {SECRET_KIND}, got {}", manifest.kind),
        ));
    }
    if manifest.metadata.name != name {
        return Err(StoreError::malformed(
            path,
            format!("metadata.name is {}, expected {name}", manifest.metadata.name),
        ));
    }
    if let Some(ns) = manifest.metadata.namespace.as_deref() {
        if ns != namespace {
            return Err(StoreError::malformed(
                path,
                format!("metadata.namespace is {ns}, expected {namespace}"),
            ));
        }
    }

    let mut data = BTreeMap::new();
    for (key, encoded) in manifest.data {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| StoreError::malformed(path, format!("data.{key}: {e}")))?;
        data.insert(key, bytes);
    }
    for (key, value) in manifest.string_data {
        data.insert(key, value.into_bytes());
    }

    Ok(SecretRecord {
        name: manifest.metadata.name,
        namespace: namespace.to_string(),
        annotations: manifest.metadata.annotations,
        data,
    })
}
