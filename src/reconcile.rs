// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record reconciliation.
//!
//! [`reconcile`] applies an external-dns change-set to the stored record list.
//! The steps run in a fixed order so overlapping entries always resolve the same
//! way:
//!
//! 1. drop every record whose identity matches a `Delete` entry
//! 2. drop every record whose identity matches an `UpdateOld` entry
//! 3. append every `UpdateNew` entry
//! 4. append every `Create` entry
//!
//! Identity is `(dnsName, setIdentifier)`; targets and TTL do not take part in
//! matching. Conflicting input (two appended entries with the same identity) is
//! kept as-is rather than rejected.

use crate::endpoint::{Changes, Endpoint};

/// Apply `changes` to `current`, returning the new canonical record list.
#[must_use]
pub fn reconcile(mut current: Vec<Endpoint>, changes: Changes) -> Vec<Endpoint> {
    remove_matching(&mut current, &changes.delete);
    // The old half of an update is removed from the working list itself
    remove_matching(&mut current, &changes.update_old);

    current.extend(changes.update_new);
    current.extend(changes.create);
    current
}

fn remove_matching(records: &mut Vec<Endpoint>, targets: &[Endpoint]) {
    if targets.is_empty() {
        return;
    }
    records.retain(|record| !targets.iter().any(|t| t.same_identity(record)));
}

/// Filter candidate records before external-dns plans its changes.
///
/// The only adjustment is dropping wildcard records when they are not allowed.
#[must_use]
pub fn adjust_endpoints(candidates: Vec<Endpoint>, allow_wildcards: bool) -> Vec<Endpoint> {
    if allow_wildcards {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|ep| !ep.is_wildcard())
        .collect()
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod reconcile_tests;
