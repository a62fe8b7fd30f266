// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Persistence of the canonical record list.
//!
//! The record list and the configuration rendered from it live side by side in
//! one blob (`records` and `config`). They are always written together, so the
//! configuration served by CoreDNS never drifts from the stored records.

use crate::constants::{CONFIG_KEY, EMPTY_CONFIG, EMPTY_RECORDS, RECORDS_KEY};
use crate::endpoint::Endpoint;
use crate::errors::StoreError;
use crate::metrics::record_managed_records;
use crate::render::{render_config, sort_records};
use crate::store::{BlobData, BlobStore};
use std::sync::Arc;
use tracing::{debug, info};

/// Loads and saves the canonical record list through a [`BlobStore`].
#[derive(Clone)]
pub struct RecordStore {
    store: Arc<dyn BlobStore>,
    name: String,
}

impl RecordStore {
    /// Create a record store persisting to the blob called `name`.
    pub fn new(store: Arc<dyn BlobStore>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }

    /// Name of the backing blob.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Load the canonical record list.
    ///
    /// A missing blob is a valid starting state and yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached, or if the blob exists but
    /// its `records` entry is missing or cannot be decoded.
    pub async fn load(&self) -> Result<Vec<Endpoint>, StoreError> {
        let Some(data) = self.store.get(&self.name).await? else {
            debug!(name = %self.name, "No stored records yet, starting empty");
            return Ok(Vec::new());
        };

        let raw = data
            .get(RECORDS_KEY)
            .ok_or_else(|| StoreError::MissingRecordsKey {
                key: self.name.clone(),
            })?;

        serde_json::from_str(raw).map_err(|source| StoreError::MalformedRecords {
            key: self.name.clone(),
            source,
        })
    }

    /// Render and persist a record list.
    ///
    /// The list is stored in canonical order together with its rendered
    /// configuration. When the blob does not exist yet it is created with empty
    /// placeholders and then updated; a failure between the two steps leaves the
    /// empty placeholder behind and is returned as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or any store call fails.
    pub async fn save(&self, mut records: Vec<Endpoint>) -> Result<(), StoreError> {
        sort_records(&mut records);
        let config = render_config(&records);
        let serialized = serde_json::to_string(&records).map_err(StoreError::SerializeRecords)?;

        let mut data = match self.store.get(&self.name).await? {
            Some(existing) => existing,
            None => {
                info!(name = %self.name, "Creating record store blob");
                self.store.create(&self.name, empty_blob()).await?
            }
        };
        data.insert(RECORDS_KEY.to_string(), serialized);
        data.insert(CONFIG_KEY.to_string(), config);

        self.store.update(&self.name, data).await?;

        debug!(name = %self.name, count = records.len(), "Saved records");
        record_managed_records(records.len());
        Ok(())
    }
}

fn empty_blob() -> BlobData {
    BlobData::from([
        (RECORDS_KEY.to_string(), EMPTY_RECORDS.to_string()),
        (CONFIG_KEY.to_string(), EMPTY_CONFIG.to_string()),
    ])
}

#[cfg(test)]
#[path = "record_store_tests.rs"]
mod record_store_tests;
