//! Acid project storage
//!
//! Resolves a project name into its configuration, stored as a secret in a
//! cluster namespace.
//!
//! # Core Concepts
//!
//! - [`derive_store_key`]: project name → `acid-<short sha>` record name
//! - [`SecretStore`]: one-read seam to the cluster's secret store
//! - [`decode`]: sparse record data → [`Project`] with defaults applied
//! - [`Storage`]: derive, read, decode
//!
//! # Example
//!
//! ```rust,ignore
//! use acid_storage::{ManifestSecretStore, Storage};
//!
//! let storage = Storage::new(ManifestSecretStore::new("/etc/acid/secrets"));
//! let project = storage.get("deis/acid", "default").await?;
//! println!("clone from {}", project.repo.clone_url);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod decode;
pub mod digest;
pub mod error;
pub mod manifest;
pub mod project;
pub mod record;
pub mod storage;

// Re-exports
pub use config::CliConfig;
pub use decode::decode;
pub use digest::{derive_store_key, is_store_key, short_sha, PROJECT_KEY_PREFIX, SHORT_SHA_LEN};
pub use error::{DecodeError, StorageError, StorageResult, StoreError};
pub use manifest::ManifestSecretStore;
pub use project::{
    escape_ssh_key, unescape_ssh_key, Kubernetes, Project, Repo, DEFAULT_VCS_SIDECAR,
};
pub use record::{MemorySecretStore, SecretRecord, SecretStore, PROJECT_NAME_ANNOTATION};
pub use storage::Storage;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
