// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Blob store adapters.
//!
//! The record store only needs get-or-absent, create and update of one named text
//! map. [`ConfigMapStore`] provides that on top of a Kubernetes `ConfigMap`;
//! [`MemoryBlobStore`] keeps blobs in process for tests and local runs.
//!
//! Adapters own no logic beyond moving bytes: no retries, no caching, and no
//! optimistic concurrency. Concurrent writers resolve last-write-wins.

use crate::errors::StoreError;
use crate::metrics::record_store_operation;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::PostParams;
use kube::{Api, Client};
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Contents of one stored blob: text fields keyed by name.
pub type BlobData = BTreeMap<String, String>;

/// Minimal persistence contract used by the record store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch a blob, returning `None` when it does not exist.
    async fn get(&self, key: &str) -> Result<Option<BlobData>, StoreError>;

    /// Create a new blob with the given initial contents.
    async fn create(&self, key: &str, data: BlobData) -> Result<BlobData, StoreError>;

    /// Replace the contents of an existing blob, keeping any metadata the
    /// backend attaches to it.
    async fn update(&self, key: &str, data: BlobData) -> Result<(), StoreError>;
}

/// Blob store backed by `ConfigMap`s in a single namespace.
#[derive(Clone)]
pub struct ConfigMapStore {
    api: Api<ConfigMap>,
    namespace: String,
}

impl ConfigMapStore {
    /// Create a store for `ConfigMap`s in `namespace`.
    #[must_use]
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
            namespace: namespace.to_string(),
        }
    }

    fn build_configmap(&self, name: &str, data: BlobData) -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(self.namespace.clone()),
                ..Default::default()
            },
            data: Some(data),
            ..Default::default()
        }
    }

    fn kube_error(&self, operation: &'static str, name: &str, source: kube::Error) -> StoreError {
        record_store_operation(operation, "error");
        StoreError::Kubernetes {
            operation,
            namespace: self.namespace.clone(),
            name: name.to_string(),
            source,
        }
    }
}

#[async_trait]
impl BlobStore for ConfigMapStore {
    async fn get(&self, key: &str) -> Result<Option<BlobData>, StoreError> {
        debug!(namespace = %self.namespace, name = %key, "Fetching ConfigMap");
        let configmap = self
            .api
            .get_opt(key)
            .await
            .map_err(|e| self.kube_error("get", key, e))?;

        match configmap {
            Some(cm) => {
                record_store_operation("get", "success");
                Ok(Some(cm.data.unwrap_or_default()))
            }
            None => {
                debug!(namespace = %self.namespace, name = %key, "ConfigMap does not exist");
                record_store_operation("get", "absent");
                Ok(None)
            }
        }
    }

    async fn create(&self, key: &str, data: BlobData) -> Result<BlobData, StoreError> {
        let configmap = self.build_configmap(key, data);
        let created = self
            .api
            .create(&PostParams::default(), &configmap)
            .await
            .map_err(|e| self.kube_error("create", key, e))?;

        info!("Created ConfigMap {}/{}", self.namespace, key);
        record_store_operation("create", "success");
        Ok(created.data.unwrap_or_default())
    }

    async fn update(&self, key: &str, data: BlobData) -> Result<(), StoreError> {
        // Start from the live object so labels, annotations, owner references and
        // binaryData survive. A missing object falls through to a 404 on replace.
        let mut configmap = self
            .api
            .get_opt(key)
            .await
            .map_err(|e| self.kube_error("update", key, e))?
            .unwrap_or_else(|| self.build_configmap(key, BlobData::new()));
        configmap.data = Some(data);
        // No resourceVersion is sent, so the API server does not reject stale writes
        configmap.metadata.resource_version = None;

        self.api
            .replace(key, &PostParams::default(), &configmap)
            .await
            .map_err(|e| self.kube_error("update", key, e))?;

        debug!(namespace = %self.namespace, name = %key, "Updated ConfigMap");
        record_store_operation("update", "success");
        Ok(())
    }
}

/// In-process blob store with failure injection.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, BlobData>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one blob.
    #[must_use]
    pub fn with_blob(key: &str, data: BlobData) -> Self {
        Self {
            blobs: Mutex::new(HashMap::from([(key.to_string(), data)])),
            ..Default::default()
        }
    }

    /// Make every subsequent call of `operation` (`get`, `create`, `update`) fail.
    pub async fn fail_on(&self, operation: &'static str) {
        self.failing.lock().await.insert(operation);
    }

    /// Snapshot of a stored blob.
    pub async fn blob(&self, key: &str) -> Option<BlobData> {
        self.blobs.lock().await.get(key).cloned()
    }

    async fn check(&self, operation: &'static str) -> Result<(), StoreError> {
        if self.failing.lock().await.contains(operation) {
            return Err(StoreError::Backend(format!("injected {operation} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<BlobData>, StoreError> {
        self.check("get").await?;
        Ok(self.blobs.lock().await.get(key).cloned())
    }

    async fn create(&self, key: &str, data: BlobData) -> Result<BlobData, StoreError> {
        self.check("create").await?;
        let mut blobs = self.blobs.lock().await;
        if blobs.contains_key(key) {
            return Err(StoreError::Backend(format!("blob '{key}' already exists")));
        }
        blobs.insert(key.to_string(), data.clone());
        Ok(data)
    }

    async fn update(&self, key: &str, data: BlobData) -> Result<(), StoreError> {
        self.check("update").await?;
        let mut blobs = self.blobs.lock().await;
        match blobs.get_mut(key) {
            Some(existing) => {
                *existing = data;
                Ok(())
            }
            None => Err(StoreError::Backend(format!("blob '{key}' does not exist"))),
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
