// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Synchronization between external-dns and the record store.
//!
//! [`Provider`] sequences load, reconcile and save for each change-set. There is
//! no lock across requests: concurrent change-sets race on the backing store and
//! the last write wins.

use crate::domain_filter::DomainFilter;
use crate::endpoint::{Changes, Endpoint};
use crate::errors::StoreError;
use crate::metrics::record_changes;
use crate::reconcile::{adjust_endpoints, reconcile};
use crate::record_store::RecordStore;
use crate::render::sort_records;
use tracing::{debug, info};

/// Startup configuration injected into the provider.
#[derive(Clone, Debug, Default)]
pub struct ProviderConfig {
    /// Zones advertised to external-dns
    pub domain_filter: DomainFilter,
    /// Whether wildcard records survive `adjust_endpoints`
    pub allow_wildcards: bool,
}

/// The webhook provider: reconciles change-sets into the record store.
#[derive(Clone)]
pub struct Provider {
    config: ProviderConfig,
    records: RecordStore,
}

impl Provider {
    #[must_use]
    pub fn new(config: ProviderConfig, records: RecordStore) -> Self {
        Self { config, records }
    }

    /// The static domain filter.
    #[must_use]
    pub fn domain_filter(&self) -> &DomainFilter {
        &self.config.domain_filter
    }

    /// Current canonical record list.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store cannot be read.
    pub async fn records(&self) -> Result<Vec<Endpoint>, StoreError> {
        self.records.load().await
    }

    /// Apply a change-set and persist the result.
    ///
    /// A failed load aborts before anything is written.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving the record list fails.
    pub async fn apply_changes(&self, changes: Changes) -> Result<Vec<Endpoint>, StoreError> {
        if changes.is_empty() {
            debug!("Received empty plan, re-rendering stored records");
        } else {
            debug!("Received plan: {:?}", changes);
        }

        let current = self.records.load().await?;

        record_changes("create", changes.create.len());
        record_changes("update", changes.update_new.len());
        record_changes("delete", changes.delete.len());

        let mut updated = reconcile(current, changes);
        sort_records(&mut updated);
        debug!("New records: {:?}", updated);

        self.records.save(updated.clone()).await?;
        Ok(updated)
    }

    /// Filter candidate records according to the wildcard policy.
    ///
    /// Pure: never touches the record store.
    #[must_use]
    pub fn adjust_endpoints(&self, candidates: Vec<Endpoint>) -> Vec<Endpoint> {
        debug!("Pre-adjust endpoints: {:?}", candidates);
        let adjusted = adjust_endpoints(candidates, self.config.allow_wildcards);
        debug!("Post-adjust endpoints: {:?}", adjusted);
        adjusted
    }

    /// Load and immediately save, so the stored configuration matches the
    /// stored records and the blob exists before the first request.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving fails.
    pub async fn canonicalize(&self) -> Result<(), StoreError> {
        let records = self.records.load().await?;
        let count = records.len();
        self.records.save(records).await?;
        info!(
            name = %self.records.name(),
            count,
            "Canonicalized stored records"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod provider_tests;
