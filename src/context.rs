// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context for both controllers.
//!
//! All reconcilers receive an `Arc<Context>` that contains:
//! - the configuration source (domain, namespace, deSEC credentials)
//! - the object store standing in for the Kubernetes API
//! - the deSEC client
//!
//! Each collaborator sits behind a trait object so the reconcilers can be driven by an
//! in-memory store and a fake provider in tests.

use crate::config::ConfigProvider;
use crate::desec::DnsProvider;
use crate::store::StateStore;
use std::sync::Arc;

/// Shared context passed to all controllers.
#[derive(Clone)]
pub struct Context {
    /// Source of the operator configuration, read on every reconcile
    pub config: Arc<dyn ConfigProvider>,

    /// Ingress and `ManagedDomain` reads and writes
    pub store: Arc<dyn StateStore>,

    /// deSEC API client
    pub dns: Arc<dyn DnsProvider>,
}

impl Context {
    /// Bundle the collaborators into a context.
    #[must_use]
    pub fn new(
        config: Arc<dyn ConfigProvider>,
        store: Arc<dyn StateStore>,
        dns: Arc<dyn DnsProvider>,
    ) -> Self {
        Self { config, store, dns }
    }
}
