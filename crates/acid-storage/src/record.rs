//! Secret records and the store seam
//!
//! [`SecretStore`] is the only thing this crate needs from a cluster: one
//! read of a named record in a namespace. [`MemorySecretStore`] backs tests
//! and embedders that already hold their records in memory.

use crate::error::StoreError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Annotation carrying the human-readable project name
pub const PROJECT_NAME_ANNOTATION: &str = "projectName";

/// A secret as returned by the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretRecord {
    /// Record name (the derived store key for project records)
    pub name: String,
    /// Namespace the record lives in
    pub namespace: String,
    /// Free-form annotations
    pub annotations: BTreeMap<String, String>,
    /// Raw values
    pub data: BTreeMap<String, Vec<u8>>,
}

impl SecretRecord {
    /// Create empty record
    #[inline]
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Add annotation
    #[inline]
    #[must_use]
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Add data entry
    #[inline]
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Value of the `projectName` annotation, empty if unset
    #[inline]
    #[must_use]
    pub fn project_name(&self) -> &str {
        self.annotations
            .get(PROJECT_NAME_ANNOTATION)
            .map_or("", String::as_str)
    }
}

/// Read access to a namespaced secret store
///
/// Implementations must report a missing record as [`StoreError::NotFound`]
/// so callers can tell it apart from transport failures. Deadlines belong to
/// the caller: dropping the returned future cancels the read.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the record `name` in `namespace`
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretRecord, StoreError>;
}

#[async_trait]
impl<S: SecretStore + ?Sized> SecretStore for Arc<S> {
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretRecord, StoreError> {
        (**self).get(namespace, name).await
    }
}

/// In-memory secret store
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    records: RwLock<HashMap<(String, String), SecretRecord>>,
}

impl MemorySecretStore {
    /// Create empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record, keyed by its namespace and name
    pub fn insert(&self, record: SecretRecord) {
        let key = (record.namespace.clone(), record.name.clone());
        self.records.write().insert(key, record);
    }

    /// Remove a record, returning whether it existed
    pub fn remove(&self, namespace: &str, name: &str) -> bool {
        self.records
            .write()
            .remove(&(namespace.to_string(), name.to_string()))
            .is_some()
    }

    /// Number of stored records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl FromIterator<SecretRecord> for MemorySecretStore {
    fn from_iter<I: IntoIterator<Item = SecretRecord>>(iter: I) -> Self {
        let store = Self::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, namespace: &str, name: &str) -> Result<SecretRecord, StoreError> {
        self.records
            .read()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::not_found(namespace, name))
    }
}
