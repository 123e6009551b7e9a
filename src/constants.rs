// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the deSEC DNS operator.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

use std::time::Duration;

// ============================================================================
// API Constants
// ============================================================================

/// API group for the operator's CRDs (must match the `#[kube(group)]` attribute in `crd.rs`)
pub const API_GROUP: &str = "desec.owly.dedyn.io";

/// API version for the operator's CRDs
pub const API_VERSION: &str = "v1";

/// Fully qualified API version (group/version)
pub const API_GROUP_VERSION: &str = "desec.owly.dedyn.io/v1";

/// Kind name for `ManagedDomain` resource
pub const KIND_MANAGED_DOMAIN: &str = "ManagedDomain";

/// Kind name for the watched `Ingress` resource
pub const KIND_INGRESS: &str = "Ingress";

// ============================================================================
// deSEC Provider Constants
// ============================================================================

/// Default deSEC management API host
pub const DEFAULT_MGMT_HOST: &str = "https://desec.io";

/// Default deSEC dynamic DNS update host
pub const DEFAULT_UPDATE_HOST: &str = "https://update.dedyn.io";

/// Path of the domains collection below the management host
pub const DOMAINS_PATH: &str = "/api/v1/domains/";

/// TTL for CNAME record sets created by the operator (1 hour)
pub const CNAME_TTL_SECS: i64 = 3600;

/// Record type string for canonical name record sets
pub const RECORD_TYPE_CNAME: &str = "CNAME";

/// Timeout applied to every provider HTTP request
pub const PROVIDER_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Mounted Configuration Constants
// ============================================================================

/// Default directory where the config map and secret are mounted
pub const DEFAULT_CONFIG_DIR: &str = "./mnt";

/// Relative path of the managed domain name file
pub const CONFIG_FILE_DOMAIN: &str = "config/domain";

/// Relative path of the namespace file (where the `ManagedDomain` lives)
pub const CONFIG_FILE_NAMESPACE: &str = "config/namespace";

/// Relative path of the optional management host override
pub const CONFIG_FILE_MGMT_HOST: &str = "config/mgmtHost";

/// Relative path of the optional update host override
pub const CONFIG_FILE_UPDATE_HOST: &str = "config/updateIpHost";

/// Relative path of the API token secret
pub const SECRET_FILE_TOKEN: &str = "secret/token";

// ============================================================================
// Requeue Constants
// ============================================================================

/// Requeue delay while the topology reconciler still has pending steps (100ms)
pub const PENDING_WORK_REQUEUE: Duration = Duration::from_millis(100);

/// Periodic dynamic DNS refresh interval (5 minutes)
pub const IP_REFRESH_REQUEUE: Duration = Duration::from_secs(300);

/// Requeue duration for controller errors (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

/// Requeue duration after an optimistic concurrency conflict (1 second)
pub const CONFLICT_REQUEUE_DURATION_SECS: u64 = 1;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

// ============================================================================
// Metrics Server Constants
// ============================================================================

/// Path for Prometheus metrics endpoint
pub const METRICS_SERVER_PATH: &str = "/metrics";

/// Path for the liveness endpoint
pub const HEALTH_SERVER_PATH: &str = "/healthz";

/// Default bind address for metrics HTTP server
pub const METRICS_SERVER_BIND_ADDRESS: &str = "0.0.0.0:8080";
