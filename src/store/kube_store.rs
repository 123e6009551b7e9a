// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! [`StateStore`] backed by the Kubernetes API server.

use super::{ObjectKey, StateStore};
use crate::constants::{KIND_INGRESS, KIND_MANAGED_DOMAIN};
use crate::crd::ManagedDomain;
use crate::errors::StoreError;
use async_trait::async_trait;
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::{Patch, PatchParams, PostParams};
use kube::{Api, Client, ResourceExt};
use serde_json::json;
use tracing::debug;

/// State store talking to the cluster through `kube::Api`.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    /// Create a store using `client`.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn managed_domains(&self, namespace: &str) -> Api<ManagedDomain> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Map a kube error to the store taxonomy (404 and 409 are distinguished).
fn map_kube_error(err: kube::Error, kind: &'static str, key: &ObjectKey) -> StoreError {
    match err {
        kube::Error::Api(ae) if ae.code == 404 => StoreError::NotFound {
            kind,
            key: key.to_string(),
        },
        kube::Error::Api(ae) if ae.code == 409 => StoreError::Conflict {
            kind,
            key: key.to_string(),
        },
        other => StoreError::Api(other.to_string()),
    }
}

#[async_trait]
impl StateStore for KubeStore {
    async fn get_ingress(&self, key: &ObjectKey) -> Result<Option<Ingress>, StoreError> {
        let api: Api<Ingress> = Api::namespaced(self.client.clone(), &key.namespace);
        api.get_opt(&key.name)
            .await
            .map_err(|e| map_kube_error(e, KIND_INGRESS, key))
    }

    async fn get_managed_domain(
        &self,
        key: &ObjectKey,
    ) -> Result<Option<ManagedDomain>, StoreError> {
        self.managed_domains(&key.namespace)
            .get_opt(&key.name)
            .await
            .map_err(|e| map_kube_error(e, KIND_MANAGED_DOMAIN, key))
    }

    async fn create_managed_domain(
        &self,
        record: &ManagedDomain,
    ) -> Result<ManagedDomain, StoreError> {
        let key = ObjectKey::of(record);
        debug!(record = %key, "Creating ManagedDomain");
        self.managed_domains(&key.namespace)
            .create(&PostParams::default(), record)
            .await
            .map_err(|e| map_kube_error(e, KIND_MANAGED_DOMAIN, &key))
    }

    async fn update_managed_domain(
        &self,
        record: &ManagedDomain,
    ) -> Result<ManagedDomain, StoreError> {
        let key = ObjectKey::of(record);
        debug!(record = %key, ips = ?record.spec.ips, "Replacing ManagedDomain spec");
        // `replace` sends metadata.resourceVersion, so a stale record is rejected with 409.
        self.managed_domains(&key.namespace)
            .replace(&key.name, &PostParams::default(), record)
            .await
            .map_err(|e| map_kube_error(e, KIND_MANAGED_DOMAIN, &key))
    }

    async fn update_managed_domain_status(
        &self,
        record: &ManagedDomain,
    ) -> Result<ManagedDomain, StoreError> {
        let key = ObjectKey::of(record);
        debug!(record = %key, "Replacing ManagedDomain status");
        let patch = json!({
            "metadata": { "resourceVersion": record.resource_version() },
            "status": record.status,
        });
        self.managed_domains(&key.namespace)
            .patch_status(&key.name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|e| map_kube_error(e, KIND_MANAGED_DOMAIN, &key))
    }
}
