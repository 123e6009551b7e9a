// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definitions (CRDs) for the deSEC DNS operator.
//!
//! # Resource Types
//!
//! - [`ManagedDomain`] - The state record for one deSEC domain. Its `spec` holds the
//!   last-observed load-balancer IP set; its `status` holds one condition per
//!   sub-goal (domain exists, IPs pushed, one CNAME per subname).
//!
//! The topology reconciler writes the record and the IP-sync reconciler reads it, so the
//! record is the only channel between the two controllers.
//!
//! # Example
//!
//! ```rust,no_run
//! use desec_dns_operator::crd::new_managed_domain;
//!
//! let record = new_managed_domain("some-domain.dedyn.io", "desec-dns-operator");
//! assert!(record.spec.ips.is_empty());
//! ```

use kube::api::ObjectMeta;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status value of a [`Condition`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::True => "True",
            Self::False => "False",
            Self::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Standard Kubernetes condition, keyed by `type` within a status.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition name: `Domain`, `IpUpdate`, or a managed subname.
    pub r#type: String,

    /// Status of the condition: True, False, or Unknown.
    pub status: ConditionStatus,

    /// Brief CamelCase reason for the condition's last transition.
    #[serde(default)]
    pub reason: String,

    /// Human-readable message indicating details about the transition.
    #[serde(default)]
    pub message: String,

    /// Last time the condition transitioned from one status to another (RFC3339 format).
    #[serde(default)]
    pub last_transition_time: String,
}

/// `ManagedDomain` tracks one deSEC domain served by the cluster's ingresses.
///
/// # Example YAML
///
/// ```yaml
/// apiVersion: desec.owly.dedyn.io/v1
/// kind: ManagedDomain
/// metadata:
///   name: some-domain.dedyn.io
///   namespace: desec-dns-operator
/// spec:
///   ips:
///     - 1.2.3.4
///     - 2.3.4.5
/// ```
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "desec.owly.dedyn.io",
    version = "v1",
    kind = "ManagedDomain",
    namespaced,
    shortname = "mdom",
    doc = "ManagedDomain holds the desired dynamic DNS IP set of a deSEC domain and the progress of its provider-side records."
)]
#[kube(status = "ManagedDomainStatus")]
#[kube(
    printcolumn = r#"{"name":"Domain","type":"string","jsonPath":".status.conditions[?(@.type==\"Domain\")].status"}"#,
    printcolumn = r#"{"name":"IpUpdate","type":"string","jsonPath":".status.conditions[?(@.type==\"IpUpdate\")].status"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ManagedDomainSpec {
    /// Load-balancer IPs of the owning ingress, sorted ascending.
    ///
    /// Empty until the ingress has been assigned an address.
    #[serde(default)]
    pub ips: Vec<String>,
}

/// `ManagedDomain` status
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ManagedDomainStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl ManagedDomain {
    /// Conditions of this record, empty if no status was written yet.
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        self.status.as_ref().map_or(&[], |s| s.conditions.as_slice())
    }
}

/// Build an empty `ManagedDomain` (no IPs, no status) for `name` in `namespace`.
#[must_use]
pub fn new_managed_domain(name: &str, namespace: &str) -> ManagedDomain {
    ManagedDomain {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: ManagedDomainSpec::default(),
        status: None,
    }
}
