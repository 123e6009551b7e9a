// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Status condition helpers for `ManagedDomain` resources.
//!
//! Conditions are stored as a list on the wire but treated as a map keyed by
//! condition type: there is never more than one entry per type.
//!
//! The central operation is [`set_condition_if_changed`], which is the idempotency
//! gate of both reconcilers. It only touches the list (and reports `true`) when
//! `(status, reason, message)` differs from what is stored, so a reconciler that
//! persists status only on `true` never writes an unchanged status back and never
//! re-triggers itself through status churn.
//!
//! # Example
//!
//! ```rust
//! use desec_dns_operator::crd::ConditionStatus;
//! use desec_dns_operator::reconcilers::status::set_condition_if_changed;
//!
//! let mut conditions = Vec::new();
//! assert!(set_condition_if_changed(&mut conditions, "Domain", ConditionStatus::True, "Created", ""));
//! assert!(!set_condition_if_changed(&mut conditions, "Domain", ConditionStatus::True, "Created", ""));
//! ```

use crate::crd::{Condition, ConditionStatus, ManagedDomainStatus};
use crate::status_reasons::{CONDITION_TYPE_DOMAIN, CONDITION_TYPE_IP_UPDATE, REASON_INITIALIZING};
use chrono::Utc;

/// Create a new condition with the current timestamp.
#[must_use]
pub fn create_condition(
    condition_type: &str,
    status: ConditionStatus,
    reason: &str,
    message: &str,
) -> Condition {
    Condition {
        r#type: condition_type.to_string(),
        status,
        reason: reason.to_string(),
        message: message.to_string(),
        last_transition_time: Utc::now().to_rfc3339(),
    }
}

/// Find a condition by type.
#[must_use]
pub fn find_condition<'a>(
    conditions: &'a [Condition],
    condition_type: &str,
) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.r#type == condition_type)
}

/// Insert or update a condition, but only if its content changes.
///
/// Returns `true` when the list was modified and the status must be persisted,
/// `false` when the stored condition already carries the same status, reason and
/// message.
///
/// `lastTransitionTime` is kept when only the reason or message changes and is
/// reset when the status itself flips.
pub fn set_condition_if_changed(
    conditions: &mut Vec<Condition>,
    condition_type: &str,
    status: ConditionStatus,
    reason: &str,
    message: &str,
) -> bool {
    match conditions.iter_mut().find(|c| c.r#type == condition_type) {
        Some(existing) => {
            if existing.status == status && existing.reason == reason && existing.message == message
            {
                return false;
            }

            if existing.status != status {
                existing.last_transition_time = Utc::now().to_rfc3339();
            }
            existing.status = status;
            existing.reason = reason.to_string();
            existing.message = message.to_string();
            true
        }
        None => {
            conditions.push(create_condition(condition_type, status, reason, message));
            true
        }
    }
}

/// Status of a freshly created `ManagedDomain`: `Domain` and `IpUpdate` both
/// `Unknown/Initializing`.
#[must_use]
pub fn initial_status() -> ManagedDomainStatus {
    let mut conditions = Vec::with_capacity(2);
    for condition_type in [CONDITION_TYPE_DOMAIN, CONDITION_TYPE_IP_UPDATE] {
        set_condition_if_changed(
            &mut conditions,
            condition_type,
            ConditionStatus::Unknown,
            REASON_INITIALIZING,
            "",
        );
    }
    ManagedDomainStatus { conditions }
}
