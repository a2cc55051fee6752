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

//! Heap RPC method implementations

use serde_json::{json, Value};
use vdb_common::types::ShowHeapParams;

use crate::{
    rpc::{
        types::{RpcError, UriParams},
        utils::parse_params,
    },
    session::DebugCoordinator,
};

/// Compute the heap of a client state and make it the newest snapshot
///
/// # Returns
/// `true` if the snapshot was stored
pub fn show_heap(coordinator: &DebugCoordinator, params: Option<Value>) -> Result<Value, RpcError> {
    let ShowHeapParams { uri, client_index, is_heap_needed } = parse_params(params)?;
    Ok(json!(coordinator.show_heap(&uri, client_index, is_heap_needed)))
}

/// Render the heap comparison of a document
///
/// # Returns
/// `{content, revision}`: the rendered document and the revision it
/// corresponds to, `null` for documents that are not open
pub fn render_heap(
    coordinator: &DebugCoordinator,
    params: Option<Value>,
) -> Result<Value, RpcError> {
    let uri = parse_params::<UriParams>(params)?.into_uri();
    Ok(json!({
        "content": coordinator.render_heap_content(&uri),
        "revision": coordinator.heap_revision(&uri),
    }))
}

/// Drop the stored heap snapshots of every document
pub fn reset_state(coordinator: &DebugCoordinator) -> Result<Value, RpcError> {
    coordinator.reset_state();
    Ok(Value::Null)
}
