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

//! Document and verification lifecycle RPC method implementations

use serde_json::{json, Value};
use tracing::info;

use crate::{
    rpc::{
        types::{RpcError, UriParams, VerifyParams},
        utils::{internal_error, parse_params},
    },
    scheduler::{VerificationBackend, VerificationScheduler},
    session::DebugCoordinator,
};

/// Register an opened document
pub fn file_opened(
    coordinator: &DebugCoordinator,
    params: Option<Value>,
) -> Result<Value, RpcError> {
    let uri = parse_params::<UriParams>(params)?.into_uri();
    Ok(json!(coordinator.file_opened(&uri)))
}

/// Forget a closed document
pub fn file_closed(
    coordinator: &DebugCoordinator,
    params: Option<Value>,
) -> Result<Value, RpcError> {
    let uri = parse_params::<UriParams>(params)?.into_uri();
    Ok(json!(coordinator.file_closed(&uri)))
}

/// Diagnostics reported by the last verification of a document
///
/// # Returns
/// An empty list if the document is not open
pub fn get_diagnostics(
    coordinator: &DebugCoordinator,
    params: Option<Value>,
) -> Result<Value, RpcError> {
    let uri = parse_params::<UriParams>(params)?.into_uri();
    serde_json::to_value(coordinator.diagnostics(&uri))
        .map_err(|e| internal_error(&format!("Failed to serialize diagnostics: {e}")))
}

/// Remove the diagnostics of a document
///
/// # Returns
/// `false` if the document is not open
pub fn remove_diagnostics(
    coordinator: &DebugCoordinator,
    params: Option<Value>,
) -> Result<Value, RpcError> {
    let uri = parse_params::<UriParams>(params)?.into_uri();
    Ok(json!(coordinator.reset_diagnostics(&uri)))
}

/// Leave debugging mode
pub fn stop_debugging(coordinator: &DebugCoordinator) -> Result<Value, RpcError> {
    coordinator.stop_debugging();
    Ok(Value::Null)
}

/// Start or restart the verification of a document
///
/// # Errors
/// Refused requests are reported with the VDB error codes: the backend is
/// not ready, a running verification could not be stopped, or the document
/// is not open.
pub async fn verify<B: VerificationBackend>(
    scheduler: &VerificationScheduler<B>,
    params: Option<Value>,
) -> Result<Value, RpcError> {
    let VerifyParams { uri, manually_triggered } = parse_params(params)?;
    match scheduler.request_verification(&uri, manually_triggered).await {
        Ok(()) => Ok(json!(true)),
        Err(e) => {
            info!(%uri, "The verification cannot be started: {e}");
            Err(e.into())
        }
    }
}

/// Stop the verification of a document
///
/// # Returns
/// `true` if nothing was running or the run stopped within the timeout
pub async fn stop_verification<B: VerificationBackend>(
    scheduler: &VerificationScheduler<B>,
    params: Option<Value>,
) -> Result<Value, RpcError> {
    let uri = parse_params::<UriParams>(params)?.into_uri();
    Ok(json!(scheduler.stop_verification(&uri).await))
}
