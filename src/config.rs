// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Per-issuer solver configuration.
//!
//! The `config` field of a challenge request carries the webhook section of the
//! issuer spec verbatim. It is parsed fresh for every call.
//!
//! ```yaml
//! solvers:
//!   - dns01:
//!       webhook:
//!         groupName: acme.example.com
//!         solverName: fornex
//!         config:
//!           apiKeySecretRef:
//!             name: fornex-credentials
//!             key: api-key
//!           # optional, defaults shown
//!           apiVersion: v1
//!           hostFormat: fullyQualified
//!           # optional, overrides FORNEX_API_URL for this issuer
//!           baseUrl: https://fornex.com/
//! ```
//!
//! `apiVersion` selects the JSON field naming of records (`v1`: `host`/`value`,
//! `v2`: `name`/`content`). `hostFormat` selects how the `host` of listed records is
//! compared: `fullyQualified` (`_acme-challenge.example.com`) or `relative`
//! (`_acme-challenge`). Confirm both against the live API before changing them.
//!
//! `baseUrl` replaces the scheme, host and port of every Fornex request; the API path
//! is fixed. It exists for mock servers in tests and for egress proxies, and should be
//! left unset against the real service.

use crate::credentials::SecretKeyRef;
use crate::dns_errors::ConfigError;
use crate::fornex::{HostFormat, RecordSchema};
use serde::{Deserialize, Serialize};
use url::Url;

/// Parsed solver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Where the Fornex API key is stored
    pub api_key_secret_ref: SecretKeyRef,
    /// Record JSON schema of the Fornex API
    #[serde(default)]
    pub api_version: RecordSchema,
    /// Representation of hosts in record listings
    #[serde(default)]
    pub host_format: HostFormat,
    /// Fornex API endpoint override, for mock servers and egress proxies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// Parse and validate the raw `config` blob of a challenge request.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingField`] if the blob is absent or the secret reference is incomplete
    /// - [`ConfigError::Malformed`] if the blob does not match the expected structure
    /// - [`ConfigError::InvalidBaseUrl`] if `baseUrl` is not an absolute HTTP(S) URL
    pub fn from_raw(raw: Option<&serde_json::Value>) -> Result<Self, ConfigError> {
        let raw = match raw {
            None | Some(serde_json::Value::Null) => {
                return Err(ConfigError::MissingField("apiKeySecretRef"))
            }
            Some(value) => value,
        };

        let config = Self::deserialize(raw).map_err(|e| ConfigError::Malformed(e.to_string()))?;

        if config.api_key_secret_ref.name.is_empty() {
            return Err(ConfigError::MissingField("apiKeySecretRef.name"));
        }
        if config.api_key_secret_ref.key.is_empty() {
            return Err(ConfigError::MissingField("apiKeySecretRef.key"));
        }
        if let Some(url) = &config.base_url {
            parse_base_url(url)?;
        }

        Ok(config)
    }

    /// Base URL to use for this issuer, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the override is not valid.
    pub fn endpoint(&self, default: &Url) -> Result<Url, ConfigError> {
        match &self.base_url {
            Some(url) => parse_base_url(url),
            None => Ok(default.clone()),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{scheme}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
