// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! deSEC DNS provider client.
//!
//! The reconcilers depend only on the [`DnsProvider`] trait. [`DesecClient`] implements it
//! against the deSEC REST API:
//!
//! | Operation | Request | Success |
//! |-----------|---------|---------|
//! | `list_domains` | `GET {mgmt}/api/v1/domains/` | 200 (404 ⇒ empty) |
//! | `create_domain` | `POST {mgmt}/api/v1/domains/` | 201 |
//! | `list_rrsets` | `GET {mgmt}/api/v1/domains/{domain}/rrsets/` | 200 (404 ⇒ empty) |
//! | `create_rrset` | `POST {mgmt}/api/v1/domains/{domain}/rrsets/` | 201 |
//! | `update_ip` | `GET {update}?hostname={domain}&myip={ip,ip}` | 200 |
//!
//! All requests carry `Authorization: Token <token>`. Any other status code is returned as
//! [`ProviderError::Status`](crate::errors::ProviderError::Status).
//!
//! The client is stateless: nothing fetched from deSEC is cached between calls.

mod client;
mod types;

pub use client::DesecClient;
pub use types::{cname_for, Domain, RRSet};

use crate::errors::ProviderError;
use async_trait::async_trait;

/// Operations the reconcilers need from the DNS provider.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// All domains owned by the account.
    async fn list_domains(&self) -> Result<Vec<Domain>, ProviderError>;

    /// Register `name` as a new domain.
    async fn create_domain(&self, name: &str) -> Result<Domain, ProviderError>;

    /// All record sets of `domain`.
    async fn list_rrsets(&self, domain: &str) -> Result<Vec<RRSet>, ProviderError>;

    /// Create a record set below `rrset.domain`.
    async fn create_rrset(&self, rrset: &RRSet) -> Result<RRSet, ProviderError>;

    /// Point the dynamic DNS A/AAAA records of `domain` at `ips`.
    async fn update_ip(&self, domain: &str, ips: &[String]) -> Result<(), ProviderError>;
}
