// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation logic for ingresses and `ManagedDomain` records.
//!
//! # Reconciliation Architecture
//!
//! Two level-triggered reconcilers cooperate through the `ManagedDomain` record:
//!
//! 1. [`reconcile_ingress`] - derives the desired deSEC state from an ingress, writes
//!    the record's spec (desired IPs) and per-step conditions, and creates the domain
//!    and CNAMEs at deSEC
//! 2. [`reconcile_managed_domain`] - pushes the record's IPs to the dynamic DNS
//!    endpoint and records the outcome in the `IpUpdate` condition
//!
//! Neither reconciler calls the other. Both take the object key and an `Arc<Context>`
//! and return the `Action` the controller runtime should take next:
//!
//! | Outcome | Action |
//! |---------|--------|
//! | more work pending | `requeue(100ms)` |
//! | IPs pushed | `requeue(5m)` |
//! | converged or nothing to do | `await_change()` |
//!
//! # Example
//!
//! ```rust,no_run
//! use desec_dns_operator::context::Context;
//! use desec_dns_operator::reconcilers::reconcile_ingress;
//! use desec_dns_operator::store::ObjectKey;
//! use std::sync::Arc;
//!
//! async fn sync(ctx: Arc<Context>) -> anyhow::Result<()> {
//!     let action = reconcile_ingress(ctx, &ObjectKey::new("default", "web")).await?;
//!     println!("next: {action:?}");
//!     Ok(())
//! }
//! ```

pub mod ingress;
pub mod ip_sync;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;


pub use ingress::reconcile_ingress;
pub use ip_sync::reconcile_managed_domain;
