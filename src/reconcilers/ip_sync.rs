// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `ManagedDomain` (IP-sync) reconciliation logic.
//!
//! Pushes `spec.ips` to the deSEC dynamic DNS endpoint and records the outcome in the
//! `IpUpdate` condition. Runs again every five minutes whether or not the update
//! succeeded, so the provider keeps seeing the current addresses.

use crate::constants::IP_REFRESH_REQUEUE;
use crate::context::Context;
use crate::crd::ConditionStatus;
use crate::errors::ReconcileError;
use crate::reconcilers::status::set_condition_if_changed;
use crate::status_reasons::{
    ip_update_message, CONDITION_TYPE_IP_UPDATE, REASON_ERROR, REASON_UPDATED,
};
use crate::store::ObjectKey;
use kube::runtime::controller::Action;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reconciles a `ManagedDomain` by pushing its IPs to deSEC.
///
/// The record name is the domain to update.
///
/// # Returns
///
/// * `Action::requeue(5m)` - the update was attempted
/// * `Action::await_change()` - the record is gone or has no IPs yet
///
/// # Errors
///
/// Returns an error if a store read or write fails. A failed dynamic update is returned
/// as an error carrying the 5 minute requeue, after the `IpUpdate` condition has been
/// set to `False/Error`.
pub async fn reconcile_managed_domain(
    ctx: Arc<Context>,
    key: &ObjectKey,
) -> Result<Action, ReconcileError> {
    info!("Reconciling ManagedDomain: {}", key);

    let Some(mut record) = ctx.store.get_managed_domain(key).await? else {
        debug!(record = %key, "ManagedDomain not found, nothing to do");
        return Ok(Action::await_change());
    };

    if record.spec.ips.is_empty() {
        debug!(record = %key, "No IPs yet, nothing to do");
        return Ok(Action::await_change());
    }

    let ips = record.spec.ips.clone();
    let update = ctx.dns.update_ip(&key.name, &ips).await;

    let conditions = &mut record.status.get_or_insert_with(Default::default).conditions;
    let changed = match &update {
        Ok(()) => {
            info!(domain = %key.name, ips = ?ips, "Dynamic DNS updated");
            set_condition_if_changed(
                conditions,
                CONDITION_TYPE_IP_UPDATE,
                ConditionStatus::True,
                REASON_UPDATED,
                &ip_update_message(&ips),
            )
        }
        Err(e) => {
            warn!(domain = %key.name, error = %e, "Dynamic DNS update failed");
            set_condition_if_changed(
                conditions,
                CONDITION_TYPE_IP_UPDATE,
                ConditionStatus::False,
                REASON_ERROR,
                &e.to_string(),
            )
        }
    };

    if changed {
        ctx.store.update_managed_domain_status(&record).await?;
    }

    match update {
        Ok(()) => Ok(Action::requeue(IP_REFRESH_REQUEUE)),
        Err(e) => Err(ReconcileError::provider_with_requeue(e, IP_REFRESH_REQUEUE)),
    }
}
