// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Status condition types and reasons for `ManagedDomain` resources.
//!
//! Reasons are programmatic identifiers in CamelCase that explain why a condition has
//! a particular status.
//!
//! # Condition Types
//!
//! A `ManagedDomain` carries two fixed conditions plus one per managed subname:
//!
//! - `Domain` - whether the domain exists at deSEC
//! - `IpUpdate` - outcome of the last dynamic DNS update
//! - `<subname>` - whether the CNAME for `<subname>.<domain>` exists
//!
//! # Example Status
//!
//! ```yaml
//! status:
//!   conditions:
//!     - type: Domain
//!       status: "True"
//!       reason: Created
//!       message: ""
//!     - type: IpUpdate
//!       status: "True"
//!       reason: Updated
//!       message: "Updated to: [1.2.3.4, 2.3.4.5]"
//!     - type: www
//!       status: "True"
//!       reason: Created
//!       message: ""
//! ```

// ============================================================================
// Condition Types
// ============================================================================

/// Condition type tracking the existence of the domain at the provider.
pub const CONDITION_TYPE_DOMAIN: &str = "Domain";

/// Condition type tracking the last dynamic IP update.
pub const CONDITION_TYPE_IP_UPDATE: &str = "IpUpdate";

// ============================================================================
// Reasons
// ============================================================================

/// Conditions were just seeded and nothing has been checked yet.
pub const REASON_INITIALIZING: &str = "Initializing";

/// The domain or CNAME is missing and a create request is being issued.
pub const REASON_CREATING: &str = "Creating";

/// The domain or CNAME exists at the provider.
pub const REASON_CREATED: &str = "Created";

/// The dynamic DNS endpoint accepted the current IP set.
pub const REASON_UPDATED: &str = "Updated";

/// The dynamic DNS endpoint rejected the update or could not be reached.
pub const REASON_ERROR: &str = "Error";

// ============================================================================
// Helper Functions
// ============================================================================

/// Build the `IpUpdate` success message for a set of IPs.
///
/// # Example
///
/// ```rust
/// use desec_dns_operator::status_reasons::ip_update_message;
///
/// let ips = vec!["1.2.3.4".to_string(), "2.3.4.5".to_string()];
/// assert_eq!(ip_update_message(&ips), "Updated to: [1.2.3.4, 2.3.4.5]");
/// ```
#[must_use]
pub fn ip_update_message(ips: &[String]) -> String {
    format!("Updated to: [{}]", ips.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_update_message_single() {
        assert_eq!(
            ip_update_message(&["1.2.3.4".to_string()]),
            "Updated to: [1.2.3.4]"
        );
    }

    #[test]
    fn test_ip_update_message_empty() {
        assert_eq!(ip_update_message(&[]), "Updated to: []");
    }

    #[test]
    fn test_reason_constants() {
        assert_eq!(REASON_INITIALIZING, "Initializing");
        assert_eq!(REASON_CREATING, "Creating");
        assert_eq!(REASON_CREATED, "Created");
        assert_eq!(REASON_UPDATED, "Updated");
        assert_eq!(REASON_ERROR, "Error");
    }
}
