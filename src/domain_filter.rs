// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Static domain filter advertised to external-dns.
//!
//! The filter is assembled once from the command line and returned verbatim on
//! `GET /`. external-dns uses it to decide which zones it hands to this provider;
//! the provider itself never evaluates it.

use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Domain filter in either suffix-list or regex form.
#[derive(Clone, Debug, Default)]
pub struct DomainFilter {
    include: Vec<String>,
    exclude: Vec<String>,
    regex_include: Option<Regex>,
    regex_exclude: Option<Regex>,
}

impl DomainFilter {
    /// Build a suffix-list filter. Entries are normalized and sorted.
    #[must_use]
    pub fn with_exclusions<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        Self {
            include: prepare_filters(include),
            exclude: prepare_filters(exclude),
            ..Default::default()
        }
    }

    /// Build a regex filter. An empty exclusion pattern means no exclusion.
    ///
    /// # Errors
    ///
    /// Returns an error if either pattern fails to compile.
    pub fn with_regex(include: &str, exclude: Option<&str>) -> Result<Self, regex::Error> {
        let regex_exclude = match exclude {
            Some(pattern) if !pattern.is_empty() => Some(Regex::new(pattern)?),
            _ => None,
        };
        Ok(Self {
            regex_include: Some(Regex::new(include)?),
            regex_exclude,
            ..Default::default()
        })
    }

    /// Normalized include suffixes (empty in regex mode).
    #[must_use]
    pub fn include(&self) -> &[String] {
        &self.include
    }

    /// Normalized exclusion suffixes (empty in regex mode).
    #[must_use]
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    /// Whether the filter was built from a regular expression.
    #[must_use]
    pub fn is_regex(&self) -> bool {
        self.regex_include.is_some()
    }
}

fn prepare_filters<I>(filters: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut prepared: Vec<String> = filters
        .into_iter()
        .map(|f| {
            f.as_ref()
                .trim()
                .trim_end_matches('.')
                .to_lowercase()
        })
        .filter(|f| !f.is_empty())
        .collect();
    prepared.sort();
    prepared
}

impl Serialize for DomainFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(regex) = &self.regex_include {
            map.serialize_entry("regexInclude", regex.as_str())?;
            if let Some(exclude) = &self.regex_exclude {
                map.serialize_entry("regexExclude", exclude.as_str())?;
            }
        } else {
            if !self.include.is_empty() {
                map.serialize_entry("include", &self.include)?;
            }
            if !self.exclude.is_empty() {
                map.serialize_entry("exclude", &self.exclude)?;
            }
        }
        map.end()
    }
}
