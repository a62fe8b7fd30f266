// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # ConfigMap DNS Provider - external-dns webhook for CoreDNS
//!
//! An external-dns webhook provider that keeps DNS records in a Kubernetes
//! `ConfigMap` and renders them into a CoreDNS configuration snippet stored next
//! to them.
//!
//! ## Overview
//!
//! Each change-set from external-dns goes through the same cycle:
//!
//! 1. load the canonical record list from the `records` key
//! 2. reconcile it with the change-set (delete, update, create)
//! 3. render the result into CoreDNS `hosts` and `template` stanzas
//! 4. write records and rendered config back in one update
//!
//! ## Modules
//!
//! - [`endpoint`] - Record and change-set types in external-dns wire format
//! - [`reconcile`] - Change-set application and wildcard adjustment
//! - [`render`] - CoreDNS configuration rendering
//! - [`record_store`] - Loading and saving the canonical record list
//! - [`store`] - Blob store contract, `ConfigMap` and in-memory backends
//! - [`provider`] - Load/reconcile/save orchestration
//! - [`webhook`] - axum router for the webhook HTTP surface
//!
//! ## Example
//!
//! ```rust
//! use configmap_dns_provider::endpoint::{Changes, Endpoint};
//! use configmap_dns_provider::reconcile::reconcile;
//! use configmap_dns_provider::render::render_config;
//!
//! let changes = Changes {
//!     create: vec![Endpoint::new("www.example.com", "A", ["192.0.2.1"])],
//!     ..Default::default()
//! };
//! let records = reconcile(Vec::new(), changes);
//!
//! let config = render_config(&records);
//! assert!(config.contains("192.0.2.1 www.example.com"));
//! ```

pub mod cli;
pub mod constants;
pub mod domain_filter;
pub mod endpoint;
pub mod errors;
pub mod metrics;
pub mod provider;
pub mod reconcile;
pub mod record_store;
pub mod render;
pub mod store;
pub mod webhook;
