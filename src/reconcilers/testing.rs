// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Test fixtures shared by the reconciler tests.

use crate::config::{OperatorConfig, StaticConfig};
use crate::context::Context;
use crate::desec::{DnsProvider, Domain, RRSet};
use crate::errors::ProviderError;
use crate::store::{MemoryStore, ObjectKey};
use async_trait::async_trait;
use k8s_openapi::api::networking::v1::{
    Ingress, IngressLoadBalancerIngress, IngressLoadBalancerStatus, IngressRule, IngressSpec,
    IngressStatus,
};
use kube::api::ObjectMeta;
use std::sync::{Arc, Mutex};

pub const DOMAIN: &str = "some-domain.dedyn.io";
pub const NAMESPACE: &str = "some-namespace";
pub const INGRESS_NAME: &str = "some-ingress";

/// In-process deSEC double with the same create/list behaviour as the real API.
#[derive(Default)]
pub struct FakeDns {
    pub domains: Mutex<Vec<Domain>>,
    pub rrsets: Mutex<Vec<RRSet>>,
    /// IP lists received by `update_ip`, in call order
    pub ip_updates: Mutex<Vec<Vec<String>>>,
    /// Status code returned by `update_ip` instead of succeeding
    pub update_failure: Mutex<Option<u16>>,
    /// Status code returned by the create calls instead of succeeding
    pub create_failure: Mutex<Option<u16>>,
}

impl FakeDns {
    pub fn domain_names(&self) -> Vec<String> {
        self.domains.lock().unwrap().iter().map(|d| d.name.clone()).collect()
    }

    pub fn rrsets(&self) -> Vec<RRSet> {
        self.rrsets.lock().unwrap().clone()
    }

    pub fn ip_update_count(&self) -> usize {
        self.ip_updates.lock().unwrap().len()
    }

    pub fn fail_updates_with(&self, code: Option<u16>) {
        *self.update_failure.lock().unwrap() = code;
    }

    pub fn fail_creates_with(&self, code: Option<u16>) {
        *self.create_failure.lock().unwrap() = code;
    }

    fn create_result(&self) -> Result<(), ProviderError> {
        match *self.create_failure.lock().unwrap() {
            Some(code) => Err(ProviderError::Status(code)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DnsProvider for FakeDns {
    async fn list_domains(&self) -> Result<Vec<Domain>, ProviderError> {
        Ok(self.domains.lock().unwrap().clone())
    }

    async fn create_domain(&self, name: &str) -> Result<Domain, ProviderError> {
        self.create_result()?;
        let domain = Domain {
            name: name.to_string(),
            ..Default::default()
        };
        self.domains.lock().unwrap().push(domain.clone());
        Ok(domain)
    }

    async fn list_rrsets(&self, domain: &str) -> Result<Vec<RRSet>, ProviderError> {
        Ok(self
            .rrsets
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.domain == domain)
            .cloned()
            .collect())
    }

    async fn create_rrset(&self, rrset: &RRSet) -> Result<RRSet, ProviderError> {
        self.create_result()?;
        self.rrsets.lock().unwrap().push(rrset.clone());
        Ok(rrset.clone())
    }

    async fn update_ip(&self, _domain: &str, ips: &[String]) -> Result<(), ProviderError> {
        self.ip_updates.lock().unwrap().push(ips.to_vec());
        match *self.update_failure.lock().unwrap() {
            Some(code) => Err(ProviderError::Status(code)),
            None => Ok(()),
        }
    }
}

/// Ingress with one rule per host and one load-balancer entry per IP.
pub fn ingress(namespace: &str, name: &str, hosts: &[&str], ips: &[&str]) -> Ingress {
    let rules = hosts
        .iter()
        .map(|host| IngressRule {
            host: Some((*host).to_string()),
            ..Default::default()
        })
        .collect();
    let lb_entries = ips
        .iter()
        .map(|ip| IngressLoadBalancerIngress {
            ip: Some((*ip).to_string()),
            ..Default::default()
        })
        .collect();

    Ingress {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: Some(IngressSpec {
            rules: Some(rules),
            ..Default::default()
        }),
        status: Some(IngressStatus {
            load_balancer: Some(IngressLoadBalancerStatus {
                ingress: Some(lb_entries),
            }),
        }),
    }
}

/// The ingress used throughout the topology tests.
pub fn default_ingress() -> Ingress {
    ingress(
        NAMESPACE,
        INGRESS_NAME,
        &[
            "some-domain.dedyn.io",
            "www.some-domain.dedyn.io",
            "wrong-domain.dedyn.io",
            "www.wrong-domain.dedyn.io",
            "git.some-domain.dedyn.io",
        ],
        &["2.3.4.5", "1.2.3.4"],
    )
}

pub fn ingress_key() -> ObjectKey {
    ObjectKey::new(NAMESPACE, INGRESS_NAME)
}

pub fn record_key() -> ObjectKey {
    ObjectKey::new(NAMESPACE, DOMAIN)
}

/// Context over a fresh in-memory store and fake provider.
pub fn test_context() -> (Arc<Context>, Arc<MemoryStore>, Arc<FakeDns>) {
    let store = Arc::new(MemoryStore::new());
    let dns = Arc::new(FakeDns::default());
    let config = StaticConfig(OperatorConfig::new(DOMAIN, NAMESPACE, "token"));
    let ctx = Arc::new(Context::new(Arc::new(config), store.clone(), dns.clone()));
    (ctx, store, dns)
}
