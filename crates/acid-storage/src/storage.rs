//! Project lookup
//!
//! [`Storage`] resolves a project name (or an already-derived key) to a
//! [`Project`]: derive the store key, read the record once, decode it.

use crate::decode::decode;
use crate::digest::derive_store_key;
use crate::error::StorageResult;
use crate::project::Project;
use crate::record::SecretStore;

/// Project configuration loader
///
/// Holds nothing but the store, so one instance can serve concurrent lookups.
/// Every call performs exactly one read and builds a fresh [`Project`].
///
/// # Example
/// ```
/// use acid_storage::{MemorySecretStore, SecretRecord, Storage, derive_store_key};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), acid_storage::StorageError> {
/// let store = MemorySecretStore::new();
/// store.insert(SecretRecord::new("default", derive_store_key("deis/acid")));
///
/// let project = Storage::new(store).get("deis/acid", "default").await?;
/// assert_eq!(project.kubernetes.namespace, "default");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Storage<S> {
    store: S,
}

impl<S: SecretStore> Storage<S> {
    /// Create loader over `store`
    #[inline]
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the project `id` from `namespace`
    ///
    /// `id` may be a project name or a key from
    /// [`derive_store_key`](crate::derive_store_key).
    ///
    /// # Errors
    /// - [`StorageError::NotFound`](crate::StorageError::NotFound) if no
    ///   record exists under the derived key
    /// - [`StorageError::Connectivity`](crate::StorageError::Connectivity) if
    ///   the store fails for any other reason
    /// - [`StorageError::Decode`](crate::StorageError::Decode) if the record's
    ///   secrets are malformed
    pub async fn get(&self, id: &str, namespace: &str) -> StorageResult<Project> {
        let key = derive_store_key(id);
        tracing::debug!(%key, namespace, "loading project");

        let record = self.store.get(namespace, &key).await?;
        let project = decode(&record.data, namespace, &record.name, record.project_name())?;

        tracing::debug!(%key, repo = %project.repo.name, "project loaded");
        Ok(project)
    }
}
