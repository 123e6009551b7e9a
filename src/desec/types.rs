// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire types of the deSEC management API.

use crate::constants::{CNAME_TTL_SECS, RECORD_TYPE_CNAME};
use serde::{Deserialize, Serialize};

/// A domain registered at deSEC.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    #[serde(default)]
    pub minimum_ttl: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touched: Option<String>,
}

/// A resource record set below a deSEC domain.
///
/// `subname` is empty for the apex; `name` is fully qualified with a trailing dot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RRSet {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub subname: String,
    #[serde(default)]
    pub name: String,
    pub r#type: String,
    #[serde(default)]
    pub records: Vec<String>,
    #[serde(default)]
    pub ttl: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touched: Option<String>,
}

impl RRSet {
    /// Whether this is the CNAME record set of `subname`.
    #[must_use]
    pub fn is_cname_for(&self, subname: &str) -> bool {
        self.r#type == RECORD_TYPE_CNAME && self.subname == subname
    }
}

/// Payload for creating a domain.
#[derive(Debug, Serialize)]
pub(crate) struct CreateDomainRequest<'a> {
    pub name: &'a str,
}

/// CNAME record set pointing `<subname>.<domain>.` at the apex `<domain>.`.
///
/// # Example
///
/// ```rust
/// use desec_dns_operator::desec::cname_for;
///
/// let rrset = cname_for("some-domain.dedyn.io", "www");
/// assert_eq!(rrset.name, "www.some-domain.dedyn.io.");
/// assert_eq!(rrset.records, vec!["some-domain.dedyn.io.".to_string()]);
/// assert_eq!(rrset.ttl, 3600);
/// ```
#[must_use]
pub fn cname_for(domain: &str, subname: &str) -> RRSet {
    RRSet {
        domain: domain.to_string(),
        subname: subname.to_string(),
        name: format!("{subname}.{domain}."),
        r#type: RECORD_TYPE_CNAME.to_string(),
        records: vec![format!("{domain}.")],
        ttl: CNAME_TTL_SECS,
        created: None,
        touched: None,
    }
}
