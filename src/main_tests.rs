// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `main.rs` - signal handling and argument parsing

#[cfg(test)]
mod tests {
    use super::super::*;
    use clap::Parser;
    use std::time::Duration as StdDuration;
    use tokio::time::timeout;

    /// SIGTERM is what the kubelet sends when a pod is stopped
    #[tokio::test]
    #[cfg(unix)]
    async fn test_sigterm_handler_can_be_installed() {
        use tokio::signal::unix::{signal, SignalKind};

        assert!(signal(SignalKind::terminate()).is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_waits_without_signal() {
        let result = timeout(StdDuration::from_millis(100), shutdown_signal()).await;
        assert!(result.is_err(), "shutdown_signal should not resolve on its own");
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["fornex-webhook", "--group-name", "acme.example.com"])
            .unwrap();

        assert_eq!(args.group_name, "acme.example.com");
        assert_eq!(args.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert_eq!(args.fornex_api_url.as_str(), DEFAULT_FORNEX_API_URL);
    }
}
