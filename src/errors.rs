// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the `ConfigMap` DNS provider.
//!
//! This module provides specialized error types for:
//! - Blob store operations (Kubernetes `ConfigMap` access, persisted state decoding)
//! - Webhook request handling (malformed bodies, store failures)
//!
//! Unsupported record content found while rendering is not an error: it is
//! logged and skipped, so it has no variant here.

use thiserror::Error;

/// Errors raised while loading or saving the canonical record list.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The Kubernetes API rejected or failed a `ConfigMap` request
    ///
    /// Covers transport failures, authentication problems and server-side errors.
    /// No retry is attempted; the caller retries the whole webhook request.
    #[error("Kubernetes request to {operation} ConfigMap '{namespace}/{name}' failed: {source}")]
    Kubernetes {
        /// The store operation that failed (`get`, `create`, `update`)
        operation: &'static str,
        /// Namespace of the `ConfigMap`
        namespace: String,
        /// Name of the `ConfigMap`
        name: String,
        #[source]
        source: kube::Error,
    },

    /// The persisted record list exists but cannot be decoded
    ///
    /// Treated as a hard failure rather than an empty list so that legitimate
    /// prior state is never silently discarded.
    #[error("Stored records in '{key}' are malformed: {source}")]
    MalformedRecords {
        /// Blob key that held the records
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The blob exists but has no `records` entry
    #[error("Stored blob '{key}' is malformed (missing records key)")]
    MissingRecordsKey {
        /// Blob key that was read
        key: String,
    },

    /// The record list could not be serialized for storage
    #[error("Serializing records failed: {0}")]
    SerializeRecords(#[source] serde_json::Error),

    /// Failure reported by a non-Kubernetes backend
    #[error("Blob store backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by the webhook HTTP handlers.
#[derive(Error, Debug)]
pub enum WebhookError {
    /// The request body could not be decoded; nothing was attempted
    #[error("Malformed request body: {0}")]
    BadRequest(#[from] serde_json::Error),

    /// Loading or saving records failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Prometheus exposition failed
    #[error("Gathering metrics failed: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl WebhookError {
    /// Label value used in request metrics and logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Store(_) => "store_error",
            Self::Metrics(_) => "metrics_error",
        }
    }
}
