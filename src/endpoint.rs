// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS record and change-set types exchanged with external-dns.
//!
//! The field names follow the external-dns webhook wire format so that records
//! received from the controller can be stored and handed back verbatim.

use crate::constants::{DEFAULT_RECORD_TTL_SECS, WILDCARD_PREFIX};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A single DNS resource record as managed by external-dns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Fully-qualified DNS name; a leading `*` marks a wildcard record
    pub dns_name: String,

    /// Ordered record targets (IP addresses for `A` records)
    #[serde(default, deserialize_with = "null_as_default")]
    pub targets: Vec<String>,

    /// Resource record type (e.g. `A`, `CNAME`)
    #[serde(default)]
    pub record_type: String,

    /// Disambiguates records sharing a name; empty means the unqualified set
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub set_identifier: String,

    /// Record TTL in seconds. `None` means unconfigured, which is distinct from zero.
    #[serde(
        default,
        rename = "recordTTL",
        skip_serializing_if = "Option::is_none"
    )]
    pub record_ttl: Option<u64>,

    /// Labels attached by external-dns (ownership, resource references)
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub labels: BTreeMap<String, String>,

    /// Provider-specific key/value properties, carried through untouched
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub provider_specific: Vec<ProviderSpecificProperty>,
}

/// Opaque provider-specific property attached to an [`Endpoint`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSpecificProperty {
    pub name: String,
    pub value: String,
}

/// The `(name, setIdentifier)` pair used to match records across change types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordIdentity<'a> {
    pub dns_name: &'a str,
    pub set_identifier: &'a str,
}

impl Endpoint {
    /// Create a record with the given name, type and targets and no TTL.
    pub fn new(
        dns_name: impl Into<String>,
        record_type: impl Into<String>,
        targets: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            dns_name: dns_name.into(),
            record_type: record_type.into(),
            targets: targets.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Builder-style setter for the set identifier.
    #[must_use]
    pub fn with_set_identifier(mut self, set_identifier: impl Into<String>) -> Self {
        self.set_identifier = set_identifier.into();
        self
    }

    /// Builder-style setter for an explicitly configured TTL.
    #[must_use]
    pub fn with_ttl(mut self, ttl: u64) -> Self {
        self.record_ttl = Some(ttl);
        self
    }

    /// Identity used for reconciliation matching.
    #[must_use]
    pub fn identity(&self) -> RecordIdentity<'_> {
        RecordIdentity {
            dns_name: &self.dns_name,
            set_identifier: &self.set_identifier,
        }
    }

    /// Whether `other` refers to the same logical record.
    #[must_use]
    pub fn same_identity(&self, other: &Endpoint) -> bool {
        self.identity() == other.identity()
    }

    /// Whether the name marks a wildcard record. An empty name is never a wildcard.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.dns_name.starts_with(WILDCARD_PREFIX)
    }

    /// Whether a TTL was explicitly configured (zero included).
    #[must_use]
    pub fn has_configured_ttl(&self) -> bool {
        self.record_ttl.is_some()
    }

    /// The configured TTL, or the provider default when unconfigured.
    #[must_use]
    pub fn ttl_or_default(&self) -> u64 {
        self.record_ttl.unwrap_or(DEFAULT_RECORD_TTL_SECS)
    }
}

/// A batch of record changes computed by external-dns.
///
/// `update_old[i]` and `update_new[i]` describe one record moving from old to new
/// content. Only the identity of the old record is used for removal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    #[serde(rename = "Create", default, deserialize_with = "null_as_default")]
    pub create: Vec<Endpoint>,

    #[serde(rename = "UpdateOld", default, deserialize_with = "null_as_default")]
    pub update_old: Vec<Endpoint>,

    #[serde(rename = "UpdateNew", default, deserialize_with = "null_as_default")]
    pub update_new: Vec<Endpoint>,

    #[serde(rename = "Delete", default, deserialize_with = "null_as_default")]
    pub delete: Vec<Endpoint>,
}

impl Changes {
    /// True when the change-set contains no instructions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update_old.is_empty()
            && self.update_new.is_empty()
            && self.delete.is_empty()
    }
}

// external-dns serializes empty Go slices and maps as `null`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod endpoint_tests;
