// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command line interface.

use crate::constants::{DEFAULT_LISTEN_ADDRESS, DEFAULT_NAMESPACE, UNSPECIFIED_LISTEN_HOST};
use crate::domain_filter::DomainFilter;
use crate::provider::ProviderConfig;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// External DNS -> `ConfigMap` webhook
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Path to a kubeconfig file (in-cluster or default discovery when unset)
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Namespace for the managed `ConfigMap`
    #[arg(short, long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Desired `ConfigMap` name
    #[arg(short, long)]
    pub output: String,

    /// [address]:[port] to listen on
    #[arg(short, long, default_value = DEFAULT_LISTEN_ADDRESS)]
    pub listen: String,

    /// Limit possible target zones by a domain suffix; specify multiple times for multiple domains
    #[arg(long = "domain-filter")]
    pub domain_filter: Vec<String>,

    /// Exclude subdomains
    #[arg(long = "exclude-domains")]
    pub exclude_domains: Vec<String>,

    /// Limit possible domains and target zones by a regex filter; overrides --domain-filter
    #[arg(long)]
    pub regex_domain_filter: Option<String>,

    /// Regex filter that excludes domains and target zones matched by --regex-domain-filter
    #[arg(long)]
    pub regex_domain_exclusion: Option<String>,

    /// Allow wildcard entries (please ensure there is no overlap between entries)
    #[arg(long)]
    pub allow_wildcards: bool,
}

impl Cli {
    /// Log level implied by `-v` flags, starting from `info`.
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Socket address to bind. A bare `:port` listens on all interfaces.
    #[must_use]
    pub fn listen_address(&self) -> String {
        if self.listen.starts_with(':') {
            format!("{UNSPECIFIED_LISTEN_HOST}{}", self.listen)
        } else {
            self.listen.clone()
        }
    }

    /// Domain filter from the filter flags; a regex filter takes precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if a regex flag does not compile.
    pub fn domain_filter(&self) -> Result<DomainFilter, regex::Error> {
        match self.regex_domain_filter.as_deref() {
            Some(include) if !include.is_empty() => {
                DomainFilter::with_regex(include, self.regex_domain_exclusion.as_deref())
            }
            _ => Ok(DomainFilter::with_exclusions(
                &self.domain_filter,
                &self.exclude_domains,
            )),
        }
    }

    /// Provider configuration assembled from the flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain filter is invalid.
    pub fn provider_config(&self) -> Result<ProviderConfig, regex::Error> {
        Ok(ProviderConfig {
            domain_filter: self.domain_filter()?,
            allow_wildcards: self.allow_wildcards,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("configmap-dns-provider").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--output", "coredns-records"]);

        assert_eq!(cli.namespace, "default");
        assert_eq!(cli.listen_address(), "0.0.0.0:8080");
        assert_eq!(cli.log_level(), LevelFilter::INFO);
        assert!(!cli.allow_wildcards);
        assert!(cli.domain_filter().unwrap().include().is_empty());
    }

    #[test]
    fn test_output_is_required() {
        let result = Cli::try_parse_from(["configmap-dns-provider", "-n", "dns"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_raises_log_level() {
        assert_eq!(parse(&["-o", "x", "-v"]).log_level(), LevelFilter::DEBUG);
        assert_eq!(parse(&["-o", "x", "-vvv"]).log_level(), LevelFilter::TRACE);
    }

    #[test]
    fn test_explicit_listen_address_is_kept() {
        let cli = parse(&["-o", "x", "-l", "127.0.0.1:9000"]);
        assert_eq!(cli.listen_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_repeated_domain_filters() {
        let cli = parse(&[
            "-o",
            "x",
            "--domain-filter",
            "example.com",
            "--domain-filter",
            "example.org",
            "--exclude-domains",
            "dev.example.com",
            "--allow-wildcards",
        ]);

        let config = cli.provider_config().unwrap();
        assert_eq!(config.domain_filter.include(), ["example.com", "example.org"]);
        assert_eq!(config.domain_filter.exclude(), ["dev.example.com"]);
        assert!(config.allow_wildcards);
    }

    #[test]
    fn test_regex_filter_overrides_domain_filter() {
        let cli = parse(&[
            "-o",
            "x",
            "--domain-filter",
            "example.com",
            "--regex-domain-filter",
            r"\.example\.org$",
        ]);

        let filter = cli.domain_filter().unwrap();
        assert!(filter.is_regex());
        assert!(filter.include().is_empty());
    }

    #[test]
    fn test_invalid_regex_filter_is_error() {
        let cli = parse(&["-o", "x", "--regex-domain-filter", "(bad"]);
        assert!(cli.provider_config().is_err());
    }
}
