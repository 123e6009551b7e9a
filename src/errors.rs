// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the deSEC DNS operator.
//!
//! This module provides specialized error types for:
//! - Reading the mounted operator configuration
//! - deSEC HTTP API operations (domains, record sets, dynamic updates)
//! - Reads and writes against the Kubernetes API (the state store)
//! - The reconcile result handed back to the controller runtime
//!
//! # Taxonomy
//!
//! - **Not found** is never an error for a reconcile's top-level key: the reconcilers
//!   turn it into a no-op. [`StoreError::NotFound`] only surfaces when an object
//!   vanishes between a read and a write.
//! - **Transient I/O** ([`ProviderError`], [`StoreError::Api`]) is returned to the
//!   controller runtime, which re-runs the reconcile after a backoff. No state was
//!   advanced, so the next call resumes from the same step.
//! - **Conflict** ([`StoreError::Conflict`]) means another writer won the optimistic
//!   concurrency race. The reconcile is re-run against a fresh read.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors reading the operator configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// The file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A required configuration value is empty.
    #[error("config value '{0}' is empty")]
    Empty(&'static str),
}

/// Errors returned by the deSEC API client.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The API answered with an unexpected HTTP status code.
    ///
    /// The message format is what ends up in the `IpUpdate` condition.
    #[error("got status code {0}")]
    Status(u16),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or the response body could not be read.
    #[error("request to {url} failed: {source}")]
    Request {
        /// URL of the failed request
        url: String,
        /// Underlying HTTP client error
        #[source]
        source: reqwest::Error,
    },

    /// A URL could not be built from the configured host.
    #[error("invalid URL '{url}': {source}")]
    Url {
        /// The offending URL
        url: String,
        /// Parse error
        #[source]
        source: url::ParseError,
    },

    /// The response body was not the expected JSON document.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// URL of the request
        url: String,
        /// JSON error
        #[source]
        source: serde_json::Error,
    },
}

/// Errors returned by a [`StateStore`](crate::store::StateStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The object does not exist.
    #[error("{kind} '{key}' not found")]
    NotFound {
        /// Kind of the missing object
        kind: &'static str,
        /// `namespace/name` of the missing object
        key: String,
    },

    /// The write was based on a stale resource version.
    #[error("conflict writing {kind} '{key}': object was modified concurrently")]
    Conflict {
        /// Kind of the object
        kind: &'static str,
        /// `namespace/name` of the object
        key: String,
    },

    /// Any other API failure.
    #[error("Kubernetes API error: {0}")]
    Api(String),
}

/// Error returned from a reconcile call.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The operator configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A state store read or write failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A deSEC API call failed.
    ///
    /// `requeue_after` is set when the reconciler already decided when it wants to
    /// run again (for example the periodic IP refresh); the error policy honours it.
    #[error("{source}")]
    Provider {
        /// Underlying provider error
        #[source]
        source: ProviderError,
        /// Requeue delay requested alongside the error
        requeue_after: Option<Duration>,
    },
}

impl From<ProviderError> for ReconcileError {
    fn from(source: ProviderError) -> Self {
        Self::Provider {
            source,
            requeue_after: None,
        }
    }
}

impl ReconcileError {
    /// Wrap a provider error together with a requeue request.
    #[must_use]
    pub fn provider_with_requeue(source: ProviderError, requeue_after: Duration) -> Self {
        Self::Provider {
            source,
            requeue_after: Some(requeue_after),
        }
    }

    /// Requeue delay the reconciler attached to this error, if any.
    #[must_use]
    pub fn requeue_after(&self) -> Option<Duration> {
        match self {
            Self::Provider { requeue_after, .. } => *requeue_after,
            _ => None,
        }
    }

    /// Whether this error is an optimistic concurrency conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(StoreError::Conflict { .. }))
    }

    /// Short label used for the error metrics.
    #[must_use]
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::Store(StoreError::Conflict { .. }) => "conflict",
            Self::Store(_) => "api_error",
            Self::Provider { .. } => "provider_error",
        }
    }
}
