// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # deSEC DNS Operator for Kubernetes
//!
//! Keeps DNS records at [deSEC](https://desec.io) in sync with the ingresses of a
//! cluster, and keeps the domain's dynamic DNS address pointed at the cluster's
//! load-balancer IPs.
//!
//! ## Overview
//!
//! Two controllers communicate through a `ManagedDomain` custom resource:
//!
//! - the **ingress reconciler** makes sure the domain exists at deSEC, copies the
//!   ingress's load-balancer IPs into `ManagedDomain.spec.ips` and creates one CNAME
//!   per ingress host below the domain, one step per reconcile
//! - the **IP-sync reconciler** pushes `spec.ips` to the deSEC dynamic DNS endpoint and
//!   repeats every five minutes
//!
//! Progress is reported through the `ManagedDomain` status conditions.
//!
//! ## Modules
//!
//! - [`crd`] - The `ManagedDomain` custom resource
//! - [`reconcilers`] - Reconciliation logic for ingresses and `ManagedDomain` records
//! - [`controller`] - `kube::runtime::Controller` wiring, metrics and error policy
//! - [`desec`] - deSEC API client
//! - [`store`] - Object store abstraction over the Kubernetes API
//! - [`config`] - Mounted operator configuration
//! - [`context`] - Shared context handed to the reconcilers
//!
//! ## Example
//!
//! ```rust,no_run
//! use desec_dns_operator::config::{OperatorConfig, StaticConfig};
//! use desec_dns_operator::context::Context;
//! use desec_dns_operator::desec::DesecClient;
//! use desec_dns_operator::reconcilers::reconcile_ingress;
//! use desec_dns_operator::store::{MemoryStore, ObjectKey};
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = OperatorConfig::new("some-domain.dedyn.io", "default", "token");
//! let dns = Arc::new(DesecClient::new(&config)?);
//! let ctx = Arc::new(Context::new(
//!     Arc::new(StaticConfig(config)),
//!     Arc::new(MemoryStore::new()),
//!     dns,
//! ));
//!
//! let action = reconcile_ingress(ctx, &ObjectKey::new("default", "web")).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod controller;
pub mod crd;
pub mod desec;
pub mod errors;
pub mod metrics;
pub mod reconcilers;
pub mod status_reasons;
pub mod store;

#[cfg(test)]
mod crd_tests;
