// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `main.rs` - CLI parsing, metrics endpoint and shutdown handling

#[cfg(test)]
mod tests {
    use crate::{metrics_handler, shutdown_signal, Args};
    use clap::Parser;
    use std::path::PathBuf;
    use std::time::Duration as StdDuration;
    use tokio::time::timeout;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["desec-dns-operator"]).unwrap();

        assert_eq!(args.config_dir, PathBuf::from("./mnt"));
        assert_eq!(args.metrics_addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::try_parse_from([
            "desec-dns-operator",
            "--config-dir",
            "/etc/desec",
            "--metrics-addr",
            "127.0.0.1:9090",
        ])
        .unwrap();

        assert_eq!(args.config_dir, PathBuf::from("/etc/desec"));
        assert_eq!(args.metrics_addr.port(), 9090);
    }

    #[test]
    fn test_args_rejects_invalid_addr() {
        let result =
            Args::try_parse_from(["desec-dns-operator", "--metrics-addr", "not-an-address"]);

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_metrics_handler_serves_registry() {
        desec_dns_operator::metrics::record_requeue("Ingress", "pending");

        let (status, body) = metrics_handler().await;

        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains("desec_owly_dedyn_io_requeues_total"));
    }

    /// Without a signal the shutdown future stays pending
    #[tokio::test]
    async fn test_shutdown_signal_pending_without_signal() {
        let result = timeout(StdDuration::from_millis(100), shutdown_signal()).await;

        assert!(
            result.is_err(),
            "shutdown_signal() should time out when no signal is sent"
        );
    }
}
