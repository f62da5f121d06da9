// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

//! Prometheus exposition of the counters registered in the global registry.

use axum::{http::StatusCode, routing::get, Router};
use log::{error, info};
use prometheus::{Encoder, TextEncoder};
use tokio::net::TcpListener;

/// Renders every metric of the default registry in the text format.
pub fn encode() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).to_string())
}

async fn handler_metrics() -> (StatusCode, String) {
    match encode() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!("Failed to encode metrics: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {e}"),
            )
        }
    }
}

/// Serves `/metrics` on `port` until the process exits.
pub async fn run_server(port: u16) {
    let app = Router::new().route("/metrics", get(handler_metrics));

    let listener = match TcpListener::bind(&format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind the metrics server to port {port}: {e}");
            return;
        }
    };
    info!("Metrics server listening on port {port}");

    if let Err(e) = axum::serve(listener, app).await {
        error!("Metrics server error: {e}");
    }
}

#[cfg(test)]
mod tests {
    use lazy_static::lazy_static;
    use prometheus::{register_int_counter, IntCounter};

    use super::*;

    lazy_static! {
        static ref PROBE_COUNTER: IntCounter =
            register_int_counter!("metrics_probe_count", "Counter used by the encoder test.")
                .unwrap();
    }

    #[test]
    fn registered_counters_are_encoded() {
        PROBE_COUNTER.inc();
        let body = encode().unwrap();
        assert!(body.contains("metrics_probe_count"));
    }
}
