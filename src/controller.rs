// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Controller runtime wiring.
//!
//! Runs the two reconcilers under `kube::runtime::Controller`:
//!
//! - `Ingress` (all namespaces) → [`reconcile_ingress`]
//! - `ManagedDomain` (all namespaces) → [`reconcile_managed_domain`], filtered on
//!   `metadata.generation` so the reconciler's own status writes do not retrigger it
//!
//! Each wrapper times the reconcile, records metrics and logs the outcome. Failed
//! reconciles go through [`error_policy`].

use crate::constants::{
    CONFLICT_REQUEUE_DURATION_SECS, ERROR_REQUEUE_DURATION_SECS, KIND_INGRESS,
    KIND_MANAGED_DOMAIN,
};
use crate::context::Context;
use crate::crd::ManagedDomain;
use crate::errors::ReconcileError;
use crate::metrics;
use crate::reconcilers::{reconcile_ingress, reconcile_managed_domain};
use crate::store::ObjectKey;
use futures::StreamExt;
use k8s_openapi::api::networking::v1::Ingress;
use kube::runtime::controller::Action;
use kube::runtime::watcher::Config as WatcherConfig;
use kube::runtime::{predicates, reflector, watcher, Controller, PredicateConfig, WatchStreamExt};
use kube::{Api, Client};
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Run the `Ingress` controller until its watch stream ends.
pub async fn run_ingress_controller(client: Client, ctx: Arc<Context>) {
    info!("Starting Ingress controller");

    let api = Api::<Ingress>::all(client);

    Controller::new(api, WatcherConfig::default())
        .run(
            |ingress: Arc<Ingress>, ctx: Arc<Context>| async move {
                let key = ObjectKey::of(ingress.as_ref());
                observe(KIND_INGRESS, &key, reconcile_ingress(ctx, &key)).await
            },
            error_policy,
            ctx,
        )
        .for_each(log_result)
        .await;
}

/// Run the `ManagedDomain` controller until its watch stream ends.
pub async fn run_managed_domain_controller(client: Client, ctx: Arc<Context>) {
    info!("Starting ManagedDomain controller");

    let api = Api::<ManagedDomain>::all(client);
    let (reader, writer) = reflector::store();
    let stream = watcher(api, WatcherConfig::default())
        .default_backoff()
        .reflect(writer)
        .applied_objects()
        .predicate_filter(predicates::generation, PredicateConfig::default());

    Controller::for_stream(stream, reader)
        .run(
            |record: Arc<ManagedDomain>, ctx: Arc<Context>| async move {
                let key = ObjectKey::of(record.as_ref());
                observe(KIND_MANAGED_DOMAIN, &key, reconcile_managed_domain(ctx, &key)).await
            },
            error_policy,
            ctx,
        )
        .for_each(log_result)
        .await;
}

/// Time a reconcile, record its metrics and log the outcome.
pub(crate) async fn observe<F>(
    kind: &'static str,
    key: &ObjectKey,
    reconcile: F,
) -> Result<Action, ReconcileError>
where
    F: Future<Output = Result<Action, ReconcileError>>,
{
    let start = Instant::now();
    let result = reconcile.await;
    let duration = start.elapsed();

    match &result {
        Ok(action) => {
            metrics::record_reconciliation_success(kind, duration);
            if *action == Action::await_change() {
                debug!(kind, key = %key, "Reconciled, waiting for changes");
            } else {
                metrics::record_requeue(kind, requeue_reason(kind));
                debug!(kind, key = %key, action = ?action, "Reconciled, requeue requested");
            }
        }
        Err(e) => {
            metrics::record_reconciliation_error(kind, e.metric_label(), duration);
            metrics::record_requeue(kind, "error");
            error!(kind, key = %key, error = %e, "Failed to reconcile {}", kind);
        }
    }
    result
}

fn requeue_reason(kind: &str) -> &'static str {
    if kind == KIND_MANAGED_DOMAIN {
        "refresh"
    } else {
        "pending"
    }
}

/// Error policy shared by both controllers.
///
/// Uses the requeue the reconciler attached to the error, otherwise a short retry for
/// optimistic concurrency conflicts and a fixed backoff for everything else.
#[allow(clippy::needless_pass_by_value)] // Signature required by kube::runtime::Controller
pub fn error_policy<K: Debug>(
    _resource: Arc<K>,
    err: &ReconcileError,
    _ctx: Arc<Context>,
) -> Action {
    let delay = requeue_delay(err);
    warn!(error = %err, "Reconciliation error - will retry in {:?}", delay);
    Action::requeue(delay)
}

/// Requeue delay for a failed reconcile.
#[must_use]
pub fn requeue_delay(err: &ReconcileError) -> Duration {
    if let Some(delay) = err.requeue_after() {
        return delay;
    }
    if err.is_conflict() {
        return Duration::from_secs(CONFLICT_REQUEUE_DURATION_SECS);
    }
    Duration::from_secs(ERROR_REQUEUE_DURATION_SECS)
}

async fn log_result<T: Debug, E: std::fmt::Display>(result: Result<T, E>) {
    if let Err(e) = result {
        debug!("Controller stream error: {}", e);
    }
}
