// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Object store used by the reconcilers.
//!
//! The reconcilers never talk to the Kubernetes API directly. They read ingresses and
//! read/write `ManagedDomain` records through the [`StateStore`] trait, which has two
//! implementations:
//!
//! - [`KubeStore`] - the real API server, via `kube::Api`
//! - [`MemoryStore`] - an in-process store with the same resource-version semantics,
//!   used by the test-suite and for embedding the reconcilers elsewhere
//!
//! Every write carries the resource version of the object it was based on. A stale
//! write fails with [`StoreError::Conflict`](crate::errors::StoreError::Conflict) and is
//! never retried inside the store: the reconcile is re-run against a fresh read.

mod kube_store;
mod memory;

pub use kube_store::KubeStore;
pub use memory::MemoryStore;

use crate::crd::ManagedDomain;
use crate::errors::StoreError;
use async_trait::async_trait;
use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use std::fmt;

/// Identity of a namespaced object.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    /// Key for `name` in `namespace`.
    #[must_use]
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    /// Key of an existing object. Cluster-scoped objects get an empty namespace.
    #[must_use]
    pub fn of<K: ResourceExt>(object: &K) -> Self {
        Self {
            namespace: object.namespace().unwrap_or_default(),
            name: object.name_any(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Read/write access to the objects the reconcilers work on.
///
/// Getters return `Ok(None)` when the object does not exist; "not found" is not an
/// error for a read.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Fetch an ingress.
    async fn get_ingress(&self, key: &ObjectKey) -> Result<Option<Ingress>, StoreError>;

    /// Fetch a `ManagedDomain` record.
    async fn get_managed_domain(&self, key: &ObjectKey)
        -> Result<Option<ManagedDomain>, StoreError>;

    /// Create a `ManagedDomain` record. Any status on `record` is ignored.
    async fn create_managed_domain(
        &self,
        record: &ManagedDomain,
    ) -> Result<ManagedDomain, StoreError>;

    /// Replace the spec of an existing `ManagedDomain` record.
    async fn update_managed_domain(
        &self,
        record: &ManagedDomain,
    ) -> Result<ManagedDomain, StoreError>;

    /// Replace the status of an existing `ManagedDomain` record.
    async fn update_managed_domain_status(
        &self,
        record: &ManagedDomain,
    ) -> Result<ManagedDomain, StoreError>;
}
