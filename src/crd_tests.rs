// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `crd.rs`

#[cfg(test)]
mod tests {
    use crate::constants::{API_GROUP, API_GROUP_VERSION, API_VERSION, KIND_MANAGED_DOMAIN};
    use crate::crd::*;
    use kube::{CustomResourceExt, Resource};
    use serde_json::json;

    #[test]
    fn test_new_managed_domain_is_empty() {
        let record = new_managed_domain("some-domain.dedyn.io", "desec-dns-operator");

        assert_eq!(record.metadata.name.as_deref(), Some("some-domain.dedyn.io"));
        assert_eq!(
            record.metadata.namespace.as_deref(),
            Some("desec-dns-operator")
        );
        assert!(record.spec.ips.is_empty());
        assert!(record.status.is_none());
        assert!(record.conditions().is_empty());
    }

    #[test]
    fn test_managed_domain_api_identity() {
        assert_eq!(ManagedDomain::group(&()), API_GROUP);
        assert_eq!(ManagedDomain::version(&()), API_VERSION);
        assert_eq!(ManagedDomain::api_version(&()), API_GROUP_VERSION);
        assert_eq!(ManagedDomain::kind(&()), KIND_MANAGED_DOMAIN);
        assert_eq!(ManagedDomain::plural(&()), "manageddomains");
    }

    #[test]
    fn test_crd_has_status_subresource() {
        let crd = ManagedDomain::crd();
        let version = &crd.spec.versions[0];

        assert_eq!(crd.spec.scope, "Namespaced");
        assert!(version
            .subresources
            .as_ref()
            .and_then(|s| s.status.as_ref())
            .is_some());
        assert_eq!(
            crd.spec.names.short_names,
            Some(vec!["mdom".to_string()])
        );
    }

    #[test]
    fn test_condition_status_serializes_as_kubernetes_strings() {
        assert_eq!(serde_json::to_value(ConditionStatus::True).unwrap(), "True");
        assert_eq!(
            serde_json::to_value(ConditionStatus::False).unwrap(),
            "False"
        );
        assert_eq!(
            serde_json::to_value(ConditionStatus::Unknown).unwrap(),
            "Unknown"
        );
        assert_eq!(ConditionStatus::Unknown.to_string(), "Unknown");
    }

    #[test]
    fn test_condition_camel_case_wire_format() {
        let condition = Condition {
            r#type: "Domain".into(),
            status: ConditionStatus::True,
            reason: "Created".into(),
            message: String::new(),
            last_transition_time: "2025-01-01T00:00:00+00:00".into(),
        };

        let value = serde_json::to_value(&condition).unwrap();
        assert_eq!(value["type"], "Domain");
        assert_eq!(value["status"], "True");
        assert_eq!(value["lastTransitionTime"], "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_deserialize_record_without_status_or_ips() {
        let record: ManagedDomain = serde_json::from_value(json!({
            "apiVersion": "desec.owly.dedyn.io/v1",
            "kind": "ManagedDomain",
            "metadata": { "name": "some-domain.dedyn.io", "namespace": "default" },
            "spec": {}
        }))
        .unwrap();

        assert!(record.spec.ips.is_empty());
        assert!(record.conditions().is_empty());
    }

    #[test]
    fn test_deserialize_conditions_without_message() {
        let status: ManagedDomainStatus = serde_json::from_value(json!({
            "conditions": [
                { "type": "IpUpdate", "status": "Unknown", "reason": "Initializing", "lastTransitionTime": "" }
            ]
        }))
        .unwrap();

        assert_eq!(status.conditions.len(), 1);
        assert_eq!(status.conditions[0].status, ConditionStatus::Unknown);
        assert_eq!(status.conditions[0].message, "");
    }
}
