// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory [`StateStore`].
//!
//! Mirrors the API server behaviour the reconcilers rely on:
//! - every successful write bumps `metadata.resourceVersion`
//! - a write whose resource version is stale fails with a conflict
//! - spec writes leave the status untouched and status writes leave the spec untouched
//! - `metadata.generation` only moves when the spec changes
//!
//! Writes are counted so tests can assert that a converged reconcile does not touch the
//! store at all.

use super::{ObjectKey, StateStore};
use crate::constants::KIND_MANAGED_DOMAIN;
use crate::crd::ManagedDomain;
use crate::errors::StoreError;
use async_trait::async_trait;
use k8s_openapi::api::networking::v1::Ingress;
use kube::ResourceExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Thread-safe in-memory object store.
#[derive(Default)]
pub struct MemoryStore {
    ingresses: Mutex<HashMap<ObjectKey, Ingress>>,
    managed_domains: Mutex<HashMap<ObjectKey, ManagedDomain>>,
    resource_version: AtomicU64,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an ingress. Not counted as a write.
    pub fn insert_ingress(&self, mut ingress: Ingress) {
        ingress.metadata.resource_version = Some(self.next_resource_version());
        let key = ObjectKey::of(&ingress);
        lock(&self.ingresses).insert(key, ingress);
    }

    /// Remove an ingress, returning it if it existed.
    pub fn remove_ingress(&self, key: &ObjectKey) -> Option<Ingress> {
        lock(&self.ingresses).remove(key)
    }

    /// Seed a `ManagedDomain` record, spec and status included. Not counted as a write.
    pub fn insert_managed_domain(&self, mut record: ManagedDomain) {
        record.metadata.resource_version = Some(self.next_resource_version());
        record.metadata.generation = Some(1);
        let key = ObjectKey::of(&record);
        lock(&self.managed_domains).insert(key, record);
    }

    /// Current stored copy of a `ManagedDomain` record.
    #[must_use]
    pub fn managed_domain(&self, key: &ObjectKey) -> Option<ManagedDomain> {
        lock(&self.managed_domains).get(key).cloned()
    }

    /// Number of successful create/update/update-status calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn next_resource_version(&self) -> String {
        (self.resource_version.fetch_add(1, Ordering::SeqCst) + 1).to_string()
    }

    /// Apply `mutate` to the stored copy of `record` after the optimistic concurrency check.
    fn write_existing(
        &self,
        record: &ManagedDomain,
        mutate: impl FnOnce(&mut ManagedDomain, &ManagedDomain),
    ) -> Result<ManagedDomain, StoreError> {
        let key = ObjectKey::of(record);
        let mut records = lock(&self.managed_domains);
        let stored = records.get_mut(&key).ok_or_else(|| StoreError::NotFound {
            kind: KIND_MANAGED_DOMAIN,
            key: key.to_string(),
        })?;

        if let Some(expected) = record.resource_version() {
            if stored.resource_version().as_deref() != Some(expected.as_str()) {
                return Err(StoreError::Conflict {
                    kind: KIND_MANAGED_DOMAIN,
                    key: key.to_string(),
                });
            }
        }

        mutate(stored, record);
        stored.metadata.resource_version = Some(self.next_resource_version());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(stored.clone())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    // A panic while holding the lock cannot leave a map half-updated.
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get_ingress(&self, key: &ObjectKey) -> Result<Option<Ingress>, StoreError> {
        Ok(lock(&self.ingresses).get(key).cloned())
    }

    async fn get_managed_domain(
        &self,
        key: &ObjectKey,
    ) -> Result<Option<ManagedDomain>, StoreError> {
        Ok(lock(&self.managed_domains).get(key).cloned())
    }

    async fn create_managed_domain(
        &self,
        record: &ManagedDomain,
    ) -> Result<ManagedDomain, StoreError> {
        let key = ObjectKey::of(record);
        let mut records = lock(&self.managed_domains);
        if records.contains_key(&key) {
            return Err(StoreError::Conflict {
                kind: KIND_MANAGED_DOMAIN,
                key: key.to_string(),
            });
        }

        let mut created = record.clone();
        created.status = None;
        created.metadata.resource_version = Some(self.next_resource_version());
        created.metadata.generation = Some(1);
        records.insert(key, created.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(created)
    }

    async fn update_managed_domain(
        &self,
        record: &ManagedDomain,
    ) -> Result<ManagedDomain, StoreError> {
        self.write_existing(record, |stored, incoming| {
            if stored.spec != incoming.spec {
                stored.spec = incoming.spec.clone();
                stored.metadata.generation = Some(stored.metadata.generation.unwrap_or(0) + 1);
            }
        })
    }

    async fn update_managed_domain_status(
        &self,
        record: &ManagedDomain,
    ) -> Result<ManagedDomain, StoreError> {
        self.write_existing(record, |stored, incoming| {
            stored.status = incoming.status.clone();
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::new_managed_domain;
    use kube::api::ObjectMeta;

    fn ingress(namespace: &str, name: &str) -> Ingress {
        Ingress {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = MemoryStore::new();
        let key = ObjectKey::new("ns", "missing");

        assert!(store.get_ingress(&key).await.unwrap().is_none());
        assert!(store.get_managed_domain(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_seeded_ingress_is_readable() {
        let store = MemoryStore::new();
        store.insert_ingress(ingress("some-namespace", "some-ingress"));

        let key = ObjectKey::new("some-namespace", "some-ingress");
        let fetched = store.get_ingress(&key).await.unwrap().unwrap();

        assert!(fetched.metadata.resource_version.is_some());
        assert_eq!(store.write_count(), 0);
        assert_eq!(ObjectKey::of(&fetched), key);
        assert!(store.remove_ingress(&key).is_some());
        assert!(store.get_ingress(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_twice_conflicts() {
        let store = MemoryStore::new();
        let record = new_managed_domain("d.dedyn.io", "ns");

        store.create_managed_domain(&record).await.unwrap();
        let err = store.create_managed_domain(&record).await.unwrap_err();

        assert!(matches!(err, StoreError::Conflict { .. }));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_stale_write_conflicts() {
        let store = MemoryStore::new();
        let created = store
            .create_managed_domain(&new_managed_domain("d.dedyn.io", "ns"))
            .await
            .unwrap();

        let mut first = created.clone();
        first.spec.ips = vec!["1.2.3.4".into()];
        let updated = store.update_managed_domain(&first).await.unwrap();
        assert_ne!(updated.resource_version(), created.resource_version());
        assert_eq!(updated.metadata.generation, Some(2));

        let mut stale = created;
        stale.spec.ips = vec!["9.9.9.9".into()];
        let err = store.update_managed_domain(&stale).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_status_write_keeps_spec() {
        let store = MemoryStore::new();
        let mut record = new_managed_domain("d.dedyn.io", "ns");
        record.spec.ips = vec!["1.2.3.4".into()];
        store.insert_managed_domain(record);
        let key = ObjectKey::new("ns", "d.dedyn.io");

        let mut fetched = store.get_managed_domain(&key).await.unwrap().unwrap();
        fetched.spec.ips.clear();
        fetched.status = Some(crate::reconcilers::status::initial_status());
        let written = store.update_managed_domain_status(&fetched).await.unwrap();

        assert_eq!(written.spec.ips, vec!["1.2.3.4".to_string()]);
        assert_eq!(written.conditions().len(), 2);
        assert_eq!(written.metadata.generation, Some(1));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update_managed_domain_status(&new_managed_domain("d.dedyn.io", "ns"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
