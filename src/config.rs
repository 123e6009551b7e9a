// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Operator configuration.
//!
//! The operator is configured through a ConfigMap and a Secret mounted below a single
//! directory (default `./mnt`):
//!
//! ```text
//! mnt/
//! ├── config/
//! │   ├── domain          # managed deSEC domain, e.g. some-domain.dedyn.io
//! │   ├── namespace       # namespace holding the ManagedDomain record
//! │   ├── mgmtHost        # optional, default https://desec.io
//! │   └── updateIpHost    # optional, default https://update.dedyn.io
//! └── secret/
//!     └── token           # deSEC API token
//! ```
//!
//! Reconcilers only see the [`ConfigProvider`] trait and load the configuration on every
//! call, so edits to the mounted files are picked up without a restart.

use crate::constants::{
    CONFIG_FILE_DOMAIN, CONFIG_FILE_MGMT_HOST, CONFIG_FILE_NAMESPACE, CONFIG_FILE_UPDATE_HOST,
    DEFAULT_MGMT_HOST, DEFAULT_UPDATE_HOST, SECRET_FILE_TOKEN,
};
use crate::errors::ConfigError;
use crate::store::ObjectKey;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolved operator configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct OperatorConfig {
    /// Managed deSEC domain (also the `ManagedDomain` record name)
    pub domain: String,
    /// Namespace of the `ManagedDomain` record
    pub namespace: String,
    /// deSEC API token
    pub token: String,
    /// Base URL of the management API
    pub mgmt_host: String,
    /// Base URL of the dynamic DNS update endpoint
    pub update_host: String,
}

impl OperatorConfig {
    /// Configuration for `domain` in `namespace` using the default deSEC hosts.
    #[must_use]
    pub fn new(domain: &str, namespace: &str, token: &str) -> Self {
        Self {
            domain: domain.to_string(),
            namespace: namespace.to_string(),
            token: token.to_string(),
            mgmt_host: DEFAULT_MGMT_HOST.to_string(),
            update_host: DEFAULT_UPDATE_HOST.to_string(),
        }
    }

    /// Key of the `ManagedDomain` record owned by this configuration.
    #[must_use]
    pub fn managed_domain_key(&self) -> ObjectKey {
        ObjectKey::new(&self.namespace, &self.domain)
    }
}

// The token must never end up in logs.
impl fmt::Debug for OperatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorConfig")
            .field("domain", &self.domain)
            .field("namespace", &self.namespace)
            .field("token", &"<redacted>")
            .field("mgmt_host", &self.mgmt_host)
            .field("update_host", &self.update_host)
            .finish()
    }
}

/// Source of the operator configuration.
pub trait ConfigProvider: Send + Sync {
    /// Load the current configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is missing or unreadable.
    fn load(&self) -> Result<OperatorConfig, ConfigError>;
}

/// Configuration read from mounted ConfigMap/Secret files.
#[derive(Clone, Debug)]
pub struct MountedConfig {
    dir: PathBuf,
}

impl MountedConfig {
    /// Read configuration below `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn required(&self, relative: &'static str) -> Result<String, ConfigError> {
        let path = self.dir.join(relative);
        let value = read_trimmed(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        if value.is_empty() {
            return Err(ConfigError::Empty(relative));
        }
        Ok(value)
    }

    fn optional(&self, relative: &str, default: &str) -> String {
        let path = self.dir.join(relative);
        match read_trimmed(&path) {
            Ok(value) if !value.is_empty() => value,
            _ => {
                debug!(path = %path.display(), default, "Optional config file absent, using default");
                default.to_string()
            }
        }
    }
}

impl ConfigProvider for MountedConfig {
    fn load(&self) -> Result<OperatorConfig, ConfigError> {
        Ok(OperatorConfig {
            domain: self.required(CONFIG_FILE_DOMAIN)?,
            namespace: self.required(CONFIG_FILE_NAMESPACE)?,
            token: self.required(SECRET_FILE_TOKEN)?,
            mgmt_host: self.optional(CONFIG_FILE_MGMT_HOST, DEFAULT_MGMT_HOST),
            update_host: self.optional(CONFIG_FILE_UPDATE_HOST, DEFAULT_UPDATE_HOST),
        })
    }
}

/// Fixed in-memory configuration.
#[derive(Clone, Debug)]
pub struct StaticConfig(pub OperatorConfig);

impl ConfigProvider for StaticConfig {
    fn load(&self) -> Result<OperatorConfig, ConfigError> {
        Ok(self.0.clone())
    }
}

/// Mounted ConfigMap values usually end with a newline.
fn read_trimmed(path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path).map(|s| s.trim().to_string())
}
