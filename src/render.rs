// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! CoreDNS configuration rendering.
//!
//! Turns the canonical record list into the text stored under the `config` key
//! of the `ConfigMap`. CoreDNS imports it into a server block, so the output must
//! stay byte-for-byte stable for a given record set:
//!
//! - Standard records become lines of a single `hosts` stanza. Only `A` records
//!   are supported there, and per-record TTLs are ignored in favour of 60s.
//! - Wildcard records (`*.zone`) each become an independent `template` stanza
//!   answering for every name under the zone suffix.
//!
//! Unsupported content never fails the render; it is logged and skipped.

use crate::constants::{DEFAULT_RECORD_TTL_SECS, SUPPORTED_RECORD_TYPE, WILDCARD_LABEL};
use crate::endpoint::Endpoint;
use crate::metrics::{record_render_skip, record_ttl_override};
use std::cmp::Ordering;
use std::fmt::Write;
use tracing::warn;

/// Skip reason for records of a type the `hosts` stanza cannot express
const SKIP_UNSUPPORTED_TYPE: &str = "unsupported_type";

/// Skip reason for records without any target
const SKIP_MISSING_TARGET: &str = "missing_target";

/// Skip reason for empty names and wildcards without a `*.` label
const SKIP_MALFORMED_NAME: &str = "malformed_name";

/// Total order used for rendering and for the persisted record list.
///
/// Records are ordered by name; the remaining fields only break ties so that the
/// output never depends on the input order.
#[must_use]
pub fn compare_records(a: &Endpoint, b: &Endpoint) -> Ordering {
    a.dns_name
        .cmp(&b.dns_name)
        .then_with(|| a.set_identifier.cmp(&b.set_identifier))
        .then_with(|| a.record_type.cmp(&b.record_type))
        .then_with(|| a.targets.cmp(&b.targets))
}

/// Sort records into canonical order in place.
pub fn sort_records(records: &mut [Endpoint]) {
    records.sort_by(compare_records);
}

/// Render the CoreDNS configuration for a record list.
///
/// The input may be in any order. An empty list renders only the separators
/// between the (absent) stanzas.
#[must_use]
pub fn render_config(records: &[Endpoint]) -> String {
    let mut sorted: Vec<&Endpoint> = records.iter().collect();
    sorted.sort_by(|a, b| compare_records(a, b));

    let (wildcard, standard): (Vec<&Endpoint>, Vec<&Endpoint>) =
        sorted.into_iter().partition(|ep| ep.is_wildcard());

    let standard: Vec<&Endpoint> = standard
        .into_iter()
        .filter(|ep| accept_standard(ep))
        .collect();

    let mut config = String::new();
    if !standard.is_empty() {
        config.push_str(&render_hosts_block(&standard));
    }
    config.push_str("\n\n");
    for ep in wildcard {
        if let Some(stanza) = render_wildcard_template(ep) {
            config.push_str(&stanza);
        }
    }
    config.push('\n');
    config
}

/// Apply the standard-record policy, logging anything dropped or degraded.
fn accept_standard(ep: &Endpoint) -> bool {
    if ep.dns_name.is_empty() {
        warn!(record_type = %ep.record_type, "Record has an empty name. Skipping.");
        record_render_skip(SKIP_MALFORMED_NAME);
        return false;
    }
    if ep.record_type != SUPPORTED_RECORD_TYPE {
        warn!(
            "Record \"{}\" uses unsupported record type \"{}\". Skipping.",
            ep.dns_name, ep.record_type
        );
        record_render_skip(SKIP_UNSUPPORTED_TYPE);
        return false;
    }
    if ep.targets.is_empty() {
        warn!("Record \"{}\" has no targets. Skipping.", ep.dns_name);
        record_render_skip(SKIP_MISSING_TARGET);
        return false;
    }
    if ep.has_configured_ttl() {
        warn!(
            "Record \"{}\" uses unsupported custom TTL \"{}\". Defaulting to {}s.",
            ep.dns_name,
            ep.ttl_or_default(),
            DEFAULT_RECORD_TTL_SECS
        );
        record_ttl_override(&ep.record_type);
    }
    true
}

/// Build the static `hosts` stanza. Only the first target of each record is used.
fn render_hosts_block(records: &[&Endpoint]) -> String {
    let mut block = String::from("hosts {");
    for ep in records {
        let _ = write!(block, "\n\t{} {}", ep.targets[0], ep.dns_name);
    }
    let _ = write!(
        block,
        "\n\n\tttl {DEFAULT_RECORD_TTL_SECS}\n\tno_reverse\n\tfallthrough\n}}"
    );
    block
}

/// Build the `template` stanza for one wildcard record.
///
/// Returns `None` when the record cannot be expressed as a template.
fn render_wildcard_template(ep: &Endpoint) -> Option<String> {
    let Some(zone) = ep.dns_name.strip_prefix(WILDCARD_LABEL) else {
        warn!(
            "Wildcard record \"{}\" has no \"{}\" label. Skipping.",
            ep.dns_name, WILDCARD_LABEL
        );
        record_render_skip(SKIP_MALFORMED_NAME);
        return None;
    };
    let Some((first, additional)) = ep.targets.split_first() else {
        warn!("Wildcard record \"{}\" has no targets. Skipping.", ep.dns_name);
        record_render_skip(SKIP_MISSING_TARGET);
        return None;
    };

    let ttl = ep.ttl_or_default();
    let record_type = &ep.record_type;

    // `{{ .Name }}` is expanded by the CoreDNS template plugin, not by us
    let mut stanza = format!(
        "template IN {record_type} {zone} {{\n\tanswer \"{{{{ .Name }}}} {ttl} IN {record_type} {first}\""
    );
    for target in additional {
        let _ = write!(
            stanza,
            "\n\tadditional \"{{{{ .Name }}}} {ttl} IN {record_type} {target}\""
        );
    }
    stanza.push_str("\n\n\tfallthrough\n}\n");
    Some(stanza)
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
