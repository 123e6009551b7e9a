// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Ingress (topology) reconciliation logic.
//!
//! Derives the desired deSEC state from an ingress and drives it into existence one step
//! per call:
//!
//! 1. the `ManagedDomain` record exists
//! 2. its `Domain` and `IpUpdate` conditions are initialized
//! 3. the domain exists at deSEC (`Domain` condition)
//! 4. `spec.ips` equals the ingress's sorted load-balancer IPs
//! 5. a CNAME exists for every ingress host below the domain (one condition per subname)
//!
//! A call that changes anything returns `Action::requeue(100ms)` right after the first
//! mutation. A call that finds nothing to do returns `Action::await_change()` without
//! touching the store.

use crate::constants::PENDING_WORK_REQUEUE;
use crate::context::Context;
use crate::crd::{new_managed_domain, ConditionStatus, ManagedDomain};
use crate::desec::cname_for;
use crate::errors::ReconcileError;
use crate::reconcilers::status::{initial_status, set_condition_if_changed};
use crate::status_reasons::{CONDITION_TYPE_DOMAIN, REASON_CREATED, REASON_CREATING};
use crate::store::ObjectKey;
use k8s_openapi::api::networking::v1::Ingress;
use kube::runtime::controller::Action;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reconciles an `Ingress` against the managed deSEC domain.
///
/// # Arguments
///
/// * `ctx` - Shared context with config, store and deSEC client
/// * `key` - `namespace/name` of the ingress
///
/// # Returns
///
/// * `Action::requeue(100ms)` - one step was applied and more work may be pending
/// * `Action::await_change()` - the ingress is gone or everything is in place
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, a store read or write fails,
/// or a deSEC call fails. Failed creations carry no requeue hint and fall back to the
/// controller's error backoff.
pub async fn reconcile_ingress(
    ctx: Arc<Context>,
    key: &ObjectKey,
) -> Result<Action, ReconcileError> {
    info!("Reconciling Ingress: {}", key);

    let Some(ingress) = ctx.store.get_ingress(key).await? else {
        debug!(ingress = %key, "Ingress not found, nothing to do");
        return Ok(Action::await_change());
    };

    let config = ctx.config.load()?;
    let record_key = config.managed_domain_key();

    // Step 1: the state record exists
    let Some(mut record) = ctx.store.get_managed_domain(&record_key).await? else {
        info!(record = %record_key, "Creating ManagedDomain");
        ctx.store
            .create_managed_domain(&new_managed_domain(&config.domain, &config.namespace))
            .await?;
        return Ok(Action::requeue(PENDING_WORK_REQUEUE));
    };

    // Step 2: the fixed conditions are seeded
    if record.conditions().is_empty() {
        debug!(record = %record_key, "Initializing ManagedDomain status");
        record.status = Some(initial_status());
        ctx.store.update_managed_domain_status(&record).await?;
        return Ok(Action::requeue(PENDING_WORK_REQUEUE));
    }

    // Step 3: the domain exists at deSEC
    let domains = ctx.dns.list_domains().await?;
    if !domains.iter().any(|d| d.name == config.domain) {
        if set_condition(
            &mut record,
            CONDITION_TYPE_DOMAIN,
            ConditionStatus::False,
            REASON_CREATING,
        ) {
            ctx.store.update_managed_domain_status(&record).await?;
        }
        info!(domain = %config.domain, "Creating domain at deSEC");
        return match ctx.dns.create_domain(&config.domain).await {
            Ok(_) => Ok(Action::requeue(PENDING_WORK_REQUEUE)),
            Err(e) => {
                warn!(domain = %config.domain, error = %e, "Failed to create domain");
                Err(ReconcileError::from(e))
            }
        };
    }
    if set_condition(
        &mut record,
        CONDITION_TYPE_DOMAIN,
        ConditionStatus::True,
        REASON_CREATED,
    ) {
        ctx.store.update_managed_domain_status(&record).await?;
        return Ok(Action::requeue(PENDING_WORK_REQUEUE));
    }

    // Step 4: the desired IP set follows the load balancer
    let ips = load_balancer_ips(&ingress);
    if ips != record.spec.ips {
        info!(record = %record_key, ips = ?ips, "Updating desired IPs");
        record.spec.ips = ips;
        ctx.store.update_managed_domain(&record).await?;
        return Ok(Action::requeue(PENDING_WORK_REQUEUE));
    }

    // Step 5: one CNAME per subname, at most one creation per call
    let subnames = subnames(&ingress, &config.domain);
    if subnames.is_empty() {
        return Ok(Action::await_change());
    }

    let rrsets = ctx.dns.list_rrsets(&config.domain).await?;
    for subname in &subnames {
        if !rrsets.iter().any(|rrset| rrset.is_cname_for(subname)) {
            if set_condition(&mut record, subname, ConditionStatus::False, REASON_CREATING) {
                ctx.store.update_managed_domain_status(&record).await?;
            }
            info!(subname = %subname, domain = %config.domain, "Adding CNAME");
            return match ctx.dns.create_rrset(&cname_for(&config.domain, subname)).await {
                Ok(cname) => {
                    info!(name = %cname.name, "CNAME created");
                    Ok(Action::requeue(PENDING_WORK_REQUEUE))
                }
                Err(e) => {
                    warn!(subname = %subname, error = %e, "Failed to create CNAME");
                    Err(ReconcileError::from(e))
                }
            };
        }
        if set_condition(&mut record, subname, ConditionStatus::True, REASON_CREATED) {
            ctx.store.update_managed_domain_status(&record).await?;
            return Ok(Action::requeue(PENDING_WORK_REQUEUE));
        }
    }

    debug!(ingress = %key, "Ingress is in sync");
    Ok(Action::await_change())
}

fn set_condition(
    record: &mut ManagedDomain,
    condition_type: &str,
    status: ConditionStatus,
    reason: &str,
) -> bool {
    let conditions = &mut record.status.get_or_insert_with(Default::default).conditions;
    set_condition_if_changed(conditions, condition_type, status, reason, "")
}

/// Subnames of all ingress hosts below `domain`, in rule order.
///
/// Trailing dots on hosts are ignored. The apex and hosts outside `domain` are skipped;
/// duplicates are kept.
///
/// # Example
///
/// ```rust
/// use desec_dns_operator::reconcilers::ingress::subnames;
/// use k8s_openapi::api::networking::v1::{Ingress, IngressRule, IngressSpec};
///
/// let rules = ["some-domain.dedyn.io", "www.some-domain.dedyn.io", "other.dedyn.io"]
///     .iter()
///     .map(|host| IngressRule { host: Some(host.to_string()), ..Default::default() })
///     .collect();
/// let ingress = Ingress {
///     spec: Some(IngressSpec { rules: Some(rules), ..Default::default() }),
///     ..Default::default()
/// };
///
/// assert_eq!(subnames(&ingress, "some-domain.dedyn.io"), vec!["www"]);
/// ```
#[must_use]
pub fn subnames(ingress: &Ingress, domain: &str) -> Vec<String> {
    let suffix = format!(".{domain}");
    ingress
        .spec
        .iter()
        .flat_map(|spec| spec.rules.iter().flatten())
        .filter_map(|rule| rule.host.as_deref())
        .filter_map(|host| host.trim_end_matches('.').strip_suffix(&suffix))
        .map(str::to_string)
        .collect()
}

/// Load-balancer IPs of an ingress, sorted ascending.
///
/// Entries without an IP (hostname-only load balancers) are skipped.
#[must_use]
pub fn load_balancer_ips(ingress: &Ingress) -> Vec<String> {
    let mut ips: Vec<String> = ingress
        .status
        .iter()
        .filter_map(|status| status.load_balancer.as_ref())
        .flat_map(|lb| lb.ingress.iter().flatten())
        .filter_map(|entry| entry.ip.clone())
        .collect();
    ips.sort();
    ips
}
