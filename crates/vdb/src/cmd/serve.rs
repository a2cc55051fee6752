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

//! JSON-RPC server command - serves the editor extension

use std::sync::Arc;

use eyre::Result;
use tracing::{error, info};
use vdb_engine::{
    DebugConfig, DebugCoordinator, DebugRpcServer, ProofLogBackend, VerificationScheduler,
};

/// Run the debug RPC server until Ctrl+C
pub async fn run(config: DebugConfig) -> Result<()> {
    info!("Starting VDB with heap images in {:?}", config.heap_image_dir);

    let coordinator = Arc::new(DebugCoordinator::new(config));
    let scheduler =
        Arc::new(VerificationScheduler::new(Arc::new(ProofLogBackend), coordinator.clone()));
    let rpc_server_handle = DebugRpcServer::new(scheduler.clone()).start().await?;

    info!("RPC server is running on {}. Press Ctrl+C to exit.", rpc_server_handle.addr());

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
    }

    info!("Shutting down VDB...");

    if !scheduler.stop_all_running_verifications().await {
        error!("Some verifications did not stop in time");
    }
    coordinator.stop_debugging();

    // Gracefully shutdown the RPC server
    if let Err(e) = rpc_server_handle.shutdown() {
        error!("Failed to shutdown RPC server: {}", e);
    } else {
        info!("RPC server shut down successfully");
    }

    Ok(())
}
