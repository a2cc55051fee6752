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

//! Execution trace RPC method implementation

use serde_json::Value;
use tracing::debug;

use crate::{
    rpc::{
        types::{RpcError, TraceParams},
        utils::{internal_error, parse_params},
    },
    session::DebugCoordinator,
};

/// Get the execution trace leading to a client state
///
/// # Parameters
/// - `uri`: the document
/// - `clientState`: the client-visible state index
///
/// # Returns
/// The list of `{state, color, showNumber}` entries; empty when the
/// document or state is unknown.
pub fn get_execution_trace(
    coordinator: &DebugCoordinator,
    params: Option<Value>,
) -> Result<Value, RpcError> {
    let TraceParams { uri, client_state } = parse_params(params)?;
    debug!("Generate execution trace for client state {}", client_state);

    coordinator
        .get_execution_trace(&uri, client_state)
        .to_json_value()
        .map_err(|e| internal_error(&format!("Failed to serialize execution trace: {e}")))
}
