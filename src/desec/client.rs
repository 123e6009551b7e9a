// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `reqwest` implementation of [`DnsProvider`] for deSEC.

use super::types::{CreateDomainRequest, Domain, RRSet};
use super::DnsProvider;
use crate::config::OperatorConfig;
use crate::constants::{DOMAINS_PATH, PROVIDER_REQUEST_TIMEOUT_SECS};
use crate::errors::ProviderError;
use crate::metrics::record_provider_request;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// deSEC REST API client.
#[derive(Clone)]
pub struct DesecClient {
    http: HttpClient,
    token: String,
    mgmt_host: String,
    update_host: String,
}

impl std::fmt::Debug for DesecClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesecClient")
            .field("mgmt_host", &self.mgmt_host)
            .field("update_host", &self.update_host)
            .finish_non_exhaustive()
    }
}

impl DesecClient {
    /// Create a client for the hosts and token in `config`.
    ///
    /// Every request is bounded by a fixed timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &OperatorConfig) -> Result<Self, ProviderError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(PROVIDER_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(ProviderError::Client)?;
        Ok(Self::with_http_client(http, config))
    }

    /// Create a client reusing an existing HTTP client (and its connection pool).
    #[must_use]
    pub fn with_http_client(http: HttpClient, config: &OperatorConfig) -> Self {
        Self {
            http,
            token: config.token.clone(),
            mgmt_host: config.mgmt_host.trim_end_matches('/').to_string(),
            update_host: config.update_host.clone(),
        }
    }

    fn domains_url(&self) -> String {
        format!("{}{DOMAINS_PATH}", self.mgmt_host)
    }

    fn rrsets_url(&self, domain: &str) -> String {
        format!("{}{domain}/rrsets/", self.domains_url())
    }

    fn update_url(&self, domain: &str, ips: &[String]) -> Result<Url, ProviderError> {
        Url::parse_with_params(
            &self.update_host,
            &[("hostname", domain), ("myip", ips.join(",").as_str())],
        )
        .map_err(|source| ProviderError::Url {
            url: self.update_host.clone(),
            source,
        })
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    /// GET a JSON list. A 404 yields an empty list.
    async fn get_list<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, ProviderError> {
        debug!(method = "GET", url = %url, "HTTP API request to deSEC");
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.auth_header())
            .send()
            .await
            .map_err(|source| request_error(url, source))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(url = %url, "deSEC returned 404, treating as empty list");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "deSEC GET failed");
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|source| request_error(url, source))?;
        decode(url, &body)
    }

    /// POST a JSON payload, expecting `201 Created`.
    async fn post<B, T>(&self, url: &str, payload: &B) -> Result<T, ProviderError>
    where
        B: Serialize + std::fmt::Debug + Sync,
        T: DeserializeOwned,
    {
        debug!(method = "POST", url = %url, body = ?payload, "HTTP API request to deSEC");
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, self.auth_header())
            .json(payload)
            .send()
            .await
            .map_err(|source| request_error(url, source))?;

        let status = response.status();
        if status != StatusCode::CREATED {
            warn!(url = %url, status = status.as_u16(), body = ?payload, "deSEC POST failed");
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|source| request_error(url, source))?;
        decode(url, &body)
    }
}

fn request_error(url: &str, source: reqwest::Error) -> ProviderError {
    ProviderError::Request {
        url: url.to_string(),
        source,
    }
}

fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|source| ProviderError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Count the call in the provider metrics and pass the result through.
fn observed<T>(operation: &str, result: Result<T, ProviderError>) -> Result<T, ProviderError> {
    record_provider_request(operation, result.is_ok());
    result
}

#[async_trait]
impl DnsProvider for DesecClient {
    async fn list_domains(&self) -> Result<Vec<Domain>, ProviderError> {
        observed("list_domains", self.get_list(&self.domains_url()).await)
    }

    async fn create_domain(&self, name: &str) -> Result<Domain, ProviderError> {
        let result = self
            .post(&self.domains_url(), &CreateDomainRequest { name })
            .await;
        observed("create_domain", result)
    }

    async fn list_rrsets(&self, domain: &str) -> Result<Vec<RRSet>, ProviderError> {
        observed("list_rrsets", self.get_list(&self.rrsets_url(domain)).await)
    }

    async fn create_rrset(&self, rrset: &RRSet) -> Result<RRSet, ProviderError> {
        let result = self.post(&self.rrsets_url(&rrset.domain), rrset).await;
        observed("create_rrset", result)
    }

    async fn update_ip(&self, domain: &str, ips: &[String]) -> Result<(), ProviderError> {
        let result = async {
            let url = self.update_url(domain, ips)?;
            debug!(method = "GET", hostname = %domain, myip = ?ips, "Dynamic DNS update");
            let response = self
                .http
                .get(url.clone())
                .header(AUTHORIZATION, self.auth_header())
                .send()
                .await
                .map_err(|source| request_error(url.as_str(), source))?;

            let status = response.status();
            if status != StatusCode::OK {
                warn!(hostname = %domain, status = status.as_u16(), "Dynamic DNS update rejected");
                return Err(ProviderError::Status(status.as_u16()));
            }
            Ok(())
        }
        .await;
        observed("update_ip", result)
    }
}
