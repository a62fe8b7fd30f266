// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the `ConfigMap` DNS provider.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

use std::time::Duration;

// ============================================================================
// DNS Rendering Constants
// ============================================================================

/// TTL applied to every standard record and to wildcard records without a TTL
pub const DEFAULT_RECORD_TTL_SECS: u64 = 60;

/// The only record type rendered into the CoreDNS `hosts` block
pub const SUPPORTED_RECORD_TYPE: &str = "A";

/// Prefix marking a wildcard record name
pub const WILDCARD_PREFIX: char = '*';

/// Full wildcard label that is stripped to obtain the template zone suffix
pub const WILDCARD_LABEL: &str = "*.";

// ============================================================================
// Blob Store Constants
// ============================================================================

/// `ConfigMap` data key holding the serialized canonical record list
pub const RECORDS_KEY: &str = "records";

/// `ConfigMap` data key holding the rendered CoreDNS configuration
pub const CONFIG_KEY: &str = "config";

/// Placeholder record list written when the `ConfigMap` is first created
pub const EMPTY_RECORDS: &str = "[]";

/// Placeholder configuration written when the `ConfigMap` is first created
pub const EMPTY_CONFIG: &str = "";

/// Namespace used when none is given on the command line
pub const DEFAULT_NAMESPACE: &str = "default";

// ============================================================================
// Webhook Constants
// ============================================================================

/// Media type (with API version) understood by external-dns webhook clients
pub const WEBHOOK_MEDIA_TYPE: &str = "application/external.dns.webhook+json;version=1";

/// Default `[address]:[port]` the webhook listens on
pub const DEFAULT_LISTEN_ADDRESS: &str = ":8080";

/// Address substituted when the listen address omits the host part
pub const UNSPECIFIED_LISTEN_HOST: &str = "0.0.0.0";

/// Grace period for in-flight requests after a shutdown signal
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Metrics Constants
// ============================================================================

/// Namespace prefix for all provider metrics (prometheus-safe)
pub const METRICS_NAMESPACE: &str = "configmap_dns";
