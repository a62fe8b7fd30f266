// Common test utilities for integration tests

#![allow(dead_code)]

use configmap_dns_provider::endpoint::Endpoint;
use configmap_dns_provider::provider::{Provider, ProviderConfig};
use configmap_dns_provider::record_store::RecordStore;
use configmap_dns_provider::store::{BlobStore, MemoryBlobStore};
use kube::{
    api::{Api, DeleteParams, PostParams},
    client::Client,
};
use serde_json::json;
use std::sync::Arc;

/// Name of the `ConfigMap` used by integration tests
pub const TEST_CONFIGMAP: &str = "configmap-dns-test";

/// Get a Kubernetes client or skip the test if not in a cluster
pub async fn get_kube_client_or_skip() -> Option<Client> {
    match Client::try_default().await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test: not running in Kubernetes cluster: {}", e);
            None
        }
    }
}

/// Create a test namespace
pub async fn create_test_namespace(
    client: &Client,
    name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let namespaces: Api<k8s_openapi::api::core::v1::Namespace> = Api::all(client.clone());

    let ns = serde_json::from_value(json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "labels": {
                "test": "integration",
                "managed-by": "configmap-dns-test"
            }
        }
    }))?;

    match namespaces.create(&PostParams::default(), &ns).await {
        Ok(_) => {
            println!("Created test namespace: {}", name);
            Ok(())
        }
        Err(kube::Error::Api(ae)) if ae.code == 409 => {
            println!("Test namespace already exists: {}", name);
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Cleanup test namespace
pub async fn cleanup_test_namespace(client: &Client, name: &str) {
    let namespaces: Api<k8s_openapi::api::core::v1::Namespace> = Api::all(client.clone());

    match namespaces.delete(name, &DeleteParams::default()).await {
        Ok(_) => println!("Deleted test namespace: {}", name),
        Err(kube::Error::Api(ae)) if ae.code == 404 => {
            println!("Test namespace already deleted: {}", name);
        }
        Err(e) => eprintln!("Failed to delete test namespace {}: {}", name, e),
    }
}

/// Build a provider over any blob store
pub fn provider_with(store: Arc<dyn BlobStore>, allow_wildcards: bool) -> Provider {
    Provider::new(
        ProviderConfig {
            allow_wildcards,
            ..Default::default()
        },
        RecordStore::new(store, TEST_CONFIGMAP),
    )
}

/// Build a provider over a fresh in-memory store
pub fn memory_provider(allow_wildcards: bool) -> (Arc<MemoryBlobStore>, Provider) {
    let store = Arc::new(MemoryBlobStore::new());
    let provider = provider_with(store.clone(), allow_wildcards);
    (store, provider)
}

/// Shorthand for an `A` record
pub fn a_record(name: &str, targets: &[&str]) -> Endpoint {
    Endpoint::new(name, "A", targets.iter().copied())
}
