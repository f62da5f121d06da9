// Copyright 2024-, SafeKart contributors.
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use axum::{
    error_handling::HandleError, http::StatusCode, routing::post_service, BoxError, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use jsonrpsee::{
    core::async_trait,
    proc_macros::rpc,
    server::{stop_channel, ServerBuilder, ServerConfig},
    types::ErrorObject,
};
use lazy_static::lazy_static;
use log::{info, warn};
use prometheus::{register_int_counter, IntCounter};
use safekart_core::{
    catalog::CatalogSearch,
    codegen::CodeGenerationSession,
    config::SessionTimings,
    context::memory::InMemoryContext,
    scan::ScanSession,
    timeline::{self, OrderLookup, OrderTimeline},
    verification::VerificationSession,
};
use safekart_model::{Product, VerificationOutcome, VerificationRequest};
use tokio::{net::TcpListener, signal, task::JoinHandle};

pub use crate::{
    api::{api_info, ApiInfo, GeneratedCode, OrderReply, RpcMethod, ScanReply},
    jsonrpsee_helpers::{JsonRpcError, JsonRpcResponse, JsonRpcResult},
};
use crate::{error_codes::JsonRpcErrorCode, jsonrpsee_helpers::session_error};

// Register the metrics into the global metrics registry.
lazy_static! {
    static ref VERIFICATION_VERIFIED_COUNTER: IntCounter = register_int_counter!(
        "verification_verified_count",
        "Number of product verifications that ended verified."
    )
    .unwrap();
    static ref VERIFICATION_REJECTED_COUNTER: IntCounter = register_int_counter!(
        "verification_rejected_count",
        "Number of product verifications that ended rejected (for any reason)."
    )
    .unwrap();
    static ref ORDER_FOUND_COUNTER: IntCounter = register_int_counter!(
        "order_lookup_found_count",
        "Number of order lookups that resolved to a known order."
    )
    .unwrap();
    static ref ORDER_NOT_FOUND_COUNTER: IntCounter = register_int_counter!(
        "order_lookup_not_found_count",
        "Number of order lookups for an unknown order."
    )
    .unwrap();
    static ref CODES_GENERATED_COUNTER: IntCounter = register_int_counter!(
        "codes_generated_count",
        "Number of codes generated."
    )
    .unwrap();
    static ref PRODUCT_SEARCH_COUNTER: IntCounter = register_int_counter!(
        "product_search_count",
        "Number of catalog searches served."
    )
    .unwrap();
    static ref IMAGE_SCAN_COUNTER: IntCounter = register_int_counter!(
        "image_scan_count",
        "Number of uploaded images decoded successfully."
    )
    .unwrap();
    static ref RPC_ERROR_COUNTER: IntCounter = register_int_counter!(
        "rpc_error_count",
        "Number of JSON-RPC calls answered with an error."
    )
    .unwrap();
}

/// Generates the `RpcServer` trait that is used to define the JSON-RPC API.
///
/// Every call runs a fresh session against the gateway's context, so the API
/// is stateless: pacing and timeouts apply, observation and cancellation do not.
/// The methods are listed in the gateway README; keep it in sync.
#[rpc(server)]
pub trait Rpc {
    /// Returns the gateway name, version and the methods it serves.
    #[method(name = "api_info")]
    fn api_info(&self) -> JsonRpcResult<ApiInfo>;

    /// Validates the request and waits for the authenticity check to settle.
    /// A rejection is a result, not an error.
    #[method(name = "verify_product")]
    async fn verify_product(
        &self,
        request: VerificationRequest,
    ) -> JsonRpcResult<VerificationOutcome>;

    /// Resolves an order id. A found order comes with its rendered timeline.
    #[method(name = "lookup_order")]
    async fn lookup_order(&self, order_id: String) -> JsonRpcResult<OrderReply>;

    /// Encodes the given text.
    #[method(name = "generate_code")]
    async fn generate_code(&self, text: String) -> JsonRpcResult<GeneratedCode>;

    /// Searches the trusted catalog.
    #[method(name = "search_products")]
    async fn search_products(&self, query: String) -> JsonRpcResult<Vec<Product>>;

    /// Decodes a base64 encoded image.
    #[method(name = "scan_image")]
    async fn scan_image(&self, image_base64: String) -> JsonRpcResult<ScanReply>;
}

#[derive(Clone)]
struct RpcImpl {
    context: InMemoryContext,
    timings: SessionTimings,
}

/// Counts the error before handing it to the client
fn rpc_error(err: JsonRpcError) -> JsonRpcError {
    RPC_ERROR_COUNTER.inc();
    warn!("JSON-RPC call failed: {}", err.message());
    err
}

#[async_trait]
impl RpcServer for RpcImpl {
    fn api_info(&self) -> JsonRpcResult<ApiInfo> {
        Ok(JsonRpcResponse::ok(api_info()))
    }

    async fn verify_product(
        &self,
        request: VerificationRequest,
    ) -> JsonRpcResult<VerificationOutcome> {
        let session = VerificationSession::new(self.context.clone(), self.timings);
        let outcome = session
            .submit(request)
            .await
            .map_err(|err| rpc_error(session_error(err)))?;
        match &outcome {
            VerificationOutcome::Verified => VERIFICATION_VERIFIED_COUNTER.inc(),
            VerificationOutcome::Rejected { .. } => VERIFICATION_REJECTED_COUNTER.inc(),
            VerificationOutcome::Pending => {}
        }
        Ok(JsonRpcResponse::ok(outcome))
    }

    async fn lookup_order(&self, order_id: String) -> JsonRpcResult<OrderReply> {
        let session = OrderTimeline::new(self.context.clone(), self.timings);
        let lookup = session
            .lookup(&order_id)
            .await
            .map_err(|err| rpc_error(session_error(err)))?;
        let timeline = match &lookup {
            OrderLookup::Found { record } => {
                ORDER_FOUND_COUNTER.inc();
                Some(timeline::view(record).map_err(|err| rpc_error(session_error(err)))?)
            }
            OrderLookup::NotFound { .. } => {
                ORDER_NOT_FOUND_COUNTER.inc();
                None
            }
        };
        Ok(JsonRpcResponse::ok(OrderReply { lookup, timeline }))
    }

    async fn generate_code(&self, text: String) -> JsonRpcResult<GeneratedCode> {
        let session = CodeGenerationSession::new(self.context.clone(), self.timings);
        let payload = session
            .generate(&text)
            .await
            .map_err(|err| rpc_error(session_error(err)))?;
        CODES_GENERATED_COUNTER.inc();
        Ok(JsonRpcResponse::ok(payload.into()))
    }

    async fn search_products(&self, query: String) -> JsonRpcResult<Vec<Product>> {
        let session = CatalogSearch::new(self.context.clone(), self.timings);
        let products = session
            .search(&query)
            .await
            .map_err(|err| rpc_error(session_error(err)))?;
        PRODUCT_SEARCH_COUNTER.inc();
        Ok(JsonRpcResponse::ok(products))
    }

    async fn scan_image(&self, image_base64: String) -> JsonRpcResult<ScanReply> {
        let image = STANDARD.decode(image_base64.as_bytes()).map_err(|e| {
            rpc_error(ErrorObject::owned(
                JsonRpcErrorCode::InvalidImage as i32,
                format!("Image is not valid base64: {e}"),
                None::<()>,
            ))
        })?;
        let session = ScanSession::new(self.context.clone(), self.timings);
        let result = session
            .submit_image(image)
            .await
            .map_err(|err| rpc_error(session_error(err)))?;
        IMAGE_SCAN_COUNTER.inc();
        Ok(JsonRpcResponse::ok(result.into()))
    }
}

pub async fn run_server(
    port: u16,
    context: InMemoryContext,
    timings: SessionTimings,
    max_request_body_size: u32,
    max_response_body_size: u32,
    max_concurrent_connections: u32,
) -> Result<(JoinHandle<()>, std::net::SocketAddr)> {
    // Setting up the JSON RPC server
    let rpc_impl = RpcImpl { context, timings };
    let config = ServerConfig::builder()
        .max_request_body_size(max_request_body_size)
        .max_response_body_size(max_response_body_size)
        .max_connections(max_concurrent_connections)
        .http_only()
        .build();
    let (stop_handle, server_handle) = stop_channel();
    let json_rpc_service = ServerBuilder::new()
        .set_config(config)
        .to_service_builder()
        .build(rpc_impl.into_rpc(), stop_handle);

    async fn handle_anyhow_error(err: BoxError) -> (StatusCode, String) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Something went wrong: {err}"),
        )
    }
    let router = Router::new().route_service(
        "/",
        HandleError::new(post_service(json_rpc_service), handle_anyhow_error),
    );

    // Create a `TcpListener` using tokio.
    let listener = TcpListener::bind(&format!("0.0.0.0:{port}"))
        .await
        .with_context(|| format!("Failed to bind to gateway port {port}"))?;

    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_handler())
            .await
        {
            log::error!("SafeKart gateway error: {e}");
        }
        // Keeps the JSON-RPC service running until axum is done with it.
        drop(server_handle);
    });

    Ok((handle, addr))
}

/// Graceful shutdown handler
async fn shutdown_handler() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install the SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Signal received, starting graceful shutdown");
}
