// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! API key resolution from a secret store.
//!
//! The issuer configuration never contains the Fornex API key itself, only a
//! [`SecretKeyRef`] pointing at a secret in the challenge's resource namespace.
//! [`resolve_api_key`] looks that secret up on every call; nothing is cached, so a
//! rotated key is picked up by the next Present or CleanUp.
//!
//! Secrets are read through the [`SecretStore`] trait. [`KubeSecretStore`] reads
//! Kubernetes `Secret` objects; [`StaticSecretStore`] serves a fixed set of secrets
//! and is used in tests.

use crate::dns_errors::CredentialError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Reference to one key of a secret in the challenge namespace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SecretKeyRef {
    /// Secret name
    #[serde(default)]
    pub name: String,
    /// Key within the secret's data
    #[serde(default)]
    pub key: String,
}

/// Read access to named secrets.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the data of secret `name` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::SecretLookup`] if the secret does not exist or the
    /// store cannot be reached.
    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, Vec<u8>>, CredentialError>;
}

/// [`SecretStore`] backed by Kubernetes `Secret` objects.
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    /// Create a store reading secrets through `client`.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, Vec<u8>>, CredentialError> {
        let secret_api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);

        let secret = secret_api
            .get(name)
            .await
            .map_err(|e| CredentialError::SecretLookup {
                namespace: namespace.to_string(),
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        // Convert ByteString to Vec<u8>
        Ok(secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (key, value.0))
            .collect())
    }
}

/// [`SecretStore`] serving a fixed set of secrets.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: BTreeMap<(String, String), BTreeMap<String, Vec<u8>>>,
}

impl StaticSecretStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret with the given data.
    #[must_use]
    pub fn with_secret<K, V>(
        mut self,
        namespace: &str,
        name: &str,
        data: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        self.secrets.insert(
            (namespace.to_string(), name.to_string()),
            data.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<BTreeMap<String, Vec<u8>>, CredentialError> {
        self.secrets
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| CredentialError::SecretLookup {
                namespace: namespace.to_string(),
                name: name.to_string(),
                reason: "secret not found".to_string(),
            })
    }
}

/// Resolve the API key referenced by `secret_ref` in `namespace`.
///
/// # Errors
///
/// - [`CredentialError::SecretLookup`] if the secret cannot be fetched
/// - [`CredentialError::SecretKeyMissing`] if the secret lacks `secret_ref.key`
/// - [`CredentialError::InvalidEncoding`] if the value is not UTF-8
pub async fn resolve_api_key(
    store: &dyn SecretStore,
    secret_ref: &SecretKeyRef,
    namespace: &str,
) -> Result<String, CredentialError> {
    debug!(
        namespace = %namespace,
        secret = %secret_ref.name,
        key = %secret_ref.key,
        "Resolving API key from secret"
    );

    let mut data = store.get_secret(namespace, &secret_ref.name).await?;

    let bytes = data
        .remove(&secret_ref.key)
        .ok_or_else(|| CredentialError::SecretKeyMissing {
            namespace: namespace.to_string(),
            name: secret_ref.name.clone(),
            key: secret_ref.key.clone(),
        })?;

    String::from_utf8(bytes).map_err(|_| CredentialError::InvalidEncoding {
        namespace: namespace.to_string(),
        name: secret_ref.name.clone(),
        key: secret_ref.key.clone(),
    })
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod credentials_tests;
