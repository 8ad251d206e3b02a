// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for config.rs

#[cfg(test)]
mod tests {
    use super::super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let raw = json!({"apiKeySecretRef": {"name": "fornex-credentials", "key": "api-key"}});

        let config = ProviderConfig::from_raw(Some(&raw)).unwrap();

        assert_eq!(config.api_key_secret_ref.name, "fornex-credentials");
        assert_eq!(config.api_key_secret_ref.key, "api-key");
        assert_eq!(config.api_version, RecordSchema::V1);
        assert_eq!(config.host_format, HostFormat::FullyQualified);
        assert_eq!(config.base_url, None);
    }

    #[test]
    fn test_full_config() {
        let raw = json!({
            "apiKeySecretRef": {"name": "fornex-credentials", "key": "api-key"},
            "apiVersion": "v2",
            "hostFormat": "relative",
            "baseUrl": "http://localhost:8080"
        });

        let config = ProviderConfig::from_raw(Some(&raw)).unwrap();

        assert_eq!(config.api_version, RecordSchema::V2);
        assert_eq!(config.host_format, HostFormat::Relative);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn test_missing_config_is_error() {
        assert_eq!(
            ProviderConfig::from_raw(None),
            Err(ConfigError::MissingField("apiKeySecretRef"))
        );
        assert_eq!(
            ProviderConfig::from_raw(Some(&serde_json::Value::Null)),
            Err(ConfigError::MissingField("apiKeySecretRef"))
        );
    }

    #[test]
    fn test_missing_secret_ref_is_malformed() {
        let err = ProviderConfig::from_raw(Some(&json!({}))).unwrap_err();

        assert!(matches!(err, ConfigError::Malformed(ref msg) if msg.contains("apiKeySecretRef")));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let err = ProviderConfig::from_raw(Some(&json!("fornex"))).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));

        let err = ProviderConfig::from_raw(Some(&json!({
            "apiKeySecretRef": {"name": "fornex-credentials", "key": "api-key"},
            "apiVersion": "v9"
        })))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn test_incomplete_secret_ref() {
        let err = ProviderConfig::from_raw(Some(&json!({"apiKeySecretRef": {"key": "api-key"}})))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingField("apiKeySecretRef.name"));

        let err = ProviderConfig::from_raw(Some(&json!({"apiKeySecretRef": {"name": "creds"}})))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingField("apiKeySecretRef.key"));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ProviderConfig::from_raw(Some(&json!({
            "apiKeySecretRef": {"name": "creds", "key": "api-key"},
            "baseUrl": "not a url"
        })))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));

        let err = ProviderConfig::from_raw(Some(&json!({
            "apiKeySecretRef": {"name": "creds", "key": "api-key"},
            "baseUrl": "ftp://fornex.com/"
        })))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { ref reason, .. } if reason.contains("ftp")));
    }

    #[test]
    fn test_endpoint_falls_back_to_default() {
        let default = Url::parse("https://fornex.com/").unwrap();

        let config = ProviderConfig::from_raw(Some(&json!({
            "apiKeySecretRef": {"name": "creds", "key": "api-key"}
        })))
        .unwrap();
        assert_eq!(config.endpoint(&default).unwrap(), default);

        let config = ProviderConfig::from_raw(Some(&json!({
            "apiKeySecretRef": {"name": "creds", "key": "api-key"},
            "baseUrl": "http://127.0.0.1:8080"
        })))
        .unwrap();
        assert_eq!(
            config.endpoint(&default).unwrap().as_str(),
            "http://127.0.0.1:8080/"
        );
    }
}
