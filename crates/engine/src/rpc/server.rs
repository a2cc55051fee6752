// VDB - Verification Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! RPC server implementation
//!
//! Every piece of state behind the coordinator is `Send + Sync`, so Axum
//! handlers call the [`MethodHandler`] directly without a worker thread.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Json as JsonExtract, State},
    response::Json as JsonResponse,
    routing::{get, post},
    Router,
};
use eyre::Result;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use super::{
    methods::MethodHandler,
    types::{error_codes, RpcRequest, RpcResponse},
    utils::{resolve_rpc_port, to_rpc_error},
};
use crate::scheduler::{VerificationBackend, VerificationScheduler};

/// Handle to the running RPC server
#[derive(Debug)]
pub struct RpcServerHandle {
    /// Address the server is listening on
    pub addr: SocketAddr,
    /// Shutdown signal
    shutdown_tx: oneshot::Sender<()>,
}

impl RpcServerHandle {
    /// Get the server address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the port number
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Gracefully shutdown the RPC server
    pub fn shutdown(self) -> Result<()> {
        if self.shutdown_tx.send(()).is_err() {
            warn!("RPC server already shut down");
        }
        Ok(())
    }
}

/// Debug RPC server exposing the coordinator and the scheduler
#[derive(Debug)]
pub struct DebugRpcServer<B> {
    method_handler: Arc<MethodHandler<B>>,
}

impl<B: VerificationBackend> DebugRpcServer<B> {
    /// Create a new debug RPC server
    pub fn new(scheduler: Arc<VerificationScheduler<B>>) -> Self {
        Self { method_handler: Arc::new(MethodHandler::new(scheduler)) }
    }

    /// Build the Axum router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", post(handle_rpc_request::<B>))
            .route("/health", get(health_check))
            .layer(CorsLayer::permissive())
            .with_state(self.method_handler.clone())
    }

    /// Start the RPC server on the configured port, or the next free one
    pub async fn start(self) -> Result<RpcServerHandle> {
        let preferred = self.method_handler.scheduler().coordinator().config().rpc_port;
        let port = resolve_rpc_port(preferred)?;
        self.start_on_port(port).await
    }

    /// Start the RPC server on a specific port. Port 0 binds an ephemeral port.
    pub async fn start_on_port(self, port: u16) -> Result<RpcServerHandle> {
        let app = self.router();

        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let actual_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await;
            if let Err(e) = served {
                error!("RPC server failed: {e}");
            }
        });

        info!("Debug RPC server started on {}", actual_addr);

        Ok(RpcServerHandle { addr: actual_addr, shutdown_tx })
    }
}

/// Handle RPC requests by dispatching to the method handler
async fn handle_rpc_request<B: VerificationBackend>(
    State(handler): State<Arc<MethodHandler<B>>>,
    JsonExtract(request): JsonExtract<RpcRequest>,
) -> JsonResponse<RpcResponse> {
    // Validate JSON-RPC version
    if request.jsonrpc != "2.0" {
        return JsonResponse(RpcResponse::failure(
            request.id,
            to_rpc_error(
                error_codes::INVALID_REQUEST,
                "Invalid Request - JSON-RPC version must be 2.0",
                None,
            ),
        ));
    }

    let RpcRequest { method, params, id, .. } = request;
    let response = match handler.handle_method(&method, params).await {
        Ok(result) => RpcResponse::success(id, result),
        Err(error) => RpcResponse::failure(id, error),
    };
    JsonResponse(response)
}

/// Health check endpoint
async fn health_check() -> JsonResponse<serde_json::Value> {
    JsonResponse(serde_json::json!({
        "status": "healthy",
        "service": "vdb-debug-rpc-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
