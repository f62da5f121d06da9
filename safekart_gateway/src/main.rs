// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

#![doc = include_str!("../README.md")]

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use safekart_core::{config::SessionTimings, context::memory::InMemoryContext};
use safekart_gateway::{metrics, server};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on for JSON-RPC requests.
    /// Defaults to 8080.
    #[arg(long, default_value_t = 8080, env = "SAFEKART_PORT")]
    port: u16,

    /// Maximum request body size in bytes. Bounds the size of uploaded images.
    /// Defaults to 10MB.
    #[arg(long, default_value_t = 10 * 1024 * 1024, env = "SAFEKART_MAX_REQUEST_BODY_SIZE")]
    max_request_body_size: u32,

    /// Maximum response body size in bytes.
    /// Defaults to 100kB.
    #[arg(long, default_value_t = 100 * 1024, env = "SAFEKART_MAX_RESPONSE_BODY_SIZE")]
    max_response_body_size: u32,

    /// Maximum number of concurrent connections.
    /// Defaults to 32.
    #[arg(long, default_value_t = 32, env = "SAFEKART_MAX_CONNECTIONS")]
    max_connections: u32,

    /// Metrics server port.
    /// Defaults to 5000.
    #[arg(long, default_value_t = 5000, env = "SAFEKART_METRICS_PORT")]
    metrics_port: u16,

    /// Time taken by an uploaded image decode, in milliseconds.
    #[arg(long, env = "SAFEKART_IMAGE_DECODE_MS")]
    image_decode_ms: Option<u64>,

    /// Time taken by the authenticity check, in milliseconds.
    #[arg(long, env = "SAFEKART_VERIFICATION_SETTLE_MS")]
    verification_settle_ms: Option<u64>,

    /// Time taken by code generation, in milliseconds.
    #[arg(long, env = "SAFEKART_ENCODE_DELAY_MS")]
    encode_delay_ms: Option<u64>,

    /// Time taken by an order lookup, in milliseconds.
    #[arg(long, env = "SAFEKART_ORDER_LOOKUP_MS")]
    order_lookup_ms: Option<u64>,

    /// Upper bound on the order store answering, in milliseconds.
    #[arg(long, env = "SAFEKART_ORDER_LOOKUP_TIMEOUT_MS")]
    order_lookup_timeout_ms: Option<u64>,

    /// Time taken by a catalog search, in milliseconds.
    #[arg(long, env = "SAFEKART_CATALOG_SEARCH_MS")]
    catalog_search_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger.
    // Set the log level by setting the RUST_LOG environment variable.
    // tracing_subscriber also picks up the `log` records of the session crates
    // and shows the jsonrpsee spans (client IP, etc).
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    debug!("Settings: {:?}", args);

    // Start the metrics server.
    // We just let it gracelessly get killed at the end of main()
    tokio::spawn(metrics::run_server(args.metrics_port));

    let timings = session_timings(&args);
    debug!("Session timings: {:?}", timings);

    // Start the JSON-RPC server.
    // This await is non-blocking
    let (handle, _) = server::run_server(
        args.port,
        InMemoryContext::demo(),
        timings,
        args.max_request_body_size,
        args.max_response_body_size,
        args.max_connections,
    )
    .await?;
    info!("Server started. Listening on port {}.", args.port);

    let _ = handle.await;

    // If we're here, we've received a signal to exit.
    info!("Shutting down...");
    Ok(())
}

/// Default timings, overridden by whichever flags were given.
fn session_timings(args: &Args) -> SessionTimings {
    let mut timings = SessionTimings::default();
    let overrides = [
        (args.image_decode_ms, &mut timings.image_decode),
        (args.verification_settle_ms, &mut timings.verification_settle),
        (args.encode_delay_ms, &mut timings.encode_delay),
        (args.order_lookup_ms, &mut timings.order_lookup),
        (args.order_lookup_timeout_ms, &mut timings.order_lookup_timeout),
        (args.catalog_search_ms, &mut timings.catalog_search),
    ];
    for (millis, timing) in overrides {
        if let Some(millis) = millis {
            *timing = Duration::from_millis(millis);
        }
    }
    timings
}
