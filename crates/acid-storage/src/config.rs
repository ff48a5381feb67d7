//! Command-line configuration
//!
//! The library itself is configuration-free; this only feeds the binary.
//! Command-line flags override the environment, which overrides defaults.

use std::path::PathBuf;

/// Environment variable naming the manifest root
pub const MANIFEST_DIR_ENV: &str = "ACID_MANIFEST_DIR";

/// Environment variable naming the lookup namespace
pub const NAMESPACE_ENV: &str = "ACID_NAMESPACE";

/// Default manifest root, relative to the working directory
pub const DEFAULT_MANIFEST_DIR: &str = "secrets";

/// Default lookup namespace
pub const DEFAULT_NAMESPACE: &str = "default";

/// Settings for the `acid-storage` binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Root directory of `<namespace>/<name>.yaml` manifests
    pub manifest_dir: PathBuf,
    /// Namespace projects are looked up in
    pub namespace: String,
}

impl CliConfig {
    /// Create config with built-in defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            manifest_dir: PathBuf::from(DEFAULT_MANIFEST_DIR),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    /// Defaults overridden by the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`; empty values are ignored
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();
        if let Some(dir) = lookup(MANIFEST_DIR_ENV).filter(|v| !v.is_empty()) {
            config.manifest_dir = PathBuf::from(dir);
        }
        if let Some(ns) = lookup(NAMESPACE_ENV).filter(|v| !v.is_empty()) {
            config.namespace = ns;
        }
        config
    }

    /// Set manifest root
    #[inline]
    #[must_use]
    pub fn with_manifest_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.manifest_dir = dir.into();
        self
    }

    /// Set namespace
    #[inline]
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::new()
    }
}
