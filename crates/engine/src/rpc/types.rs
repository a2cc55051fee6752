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

//! JSON-RPC protocol types and data structures.
//!
//! This module defines the data structures used for JSON-RPC communication
//! between the editor extension and the VDB RPC server. All types follow the
//! JSON-RPC 2.0 specification.
//!
//! # Protocol Types
//!
//! - [`RpcRequest`] - Incoming JSON-RPC request with method and parameters
//! - [`RpcResponse`] - Outgoing JSON-RPC response with result or error
//! - [`RpcError`] - Structured error information following JSON-RPC error format
//! - [`RpcId`] - Request/response identifier (string or number)
//!
//! # Error Handling
//!
//! Standard JSON-RPC error codes and the VDB-specific ones live in the
//! [`error_codes`] module.

use serde::{Deserialize, Serialize};

use crate::error::DebugError;

/// JSON-RPC 2.0 request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Method name to invoke (e.g., "GetExecutionTrace", "ShowHeap")
    pub method: String,
    /// Optional method parameters as JSON value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
    /// Request identifier for matching with response
    pub id: RpcId,
}

/// JSON-RPC 2.0 response structure.
///
/// Contains either a successful result or an error, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Successful method result (omitted if error occurred)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error information (omitted if method succeeded)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    /// Request identifier matching the original request
    pub id: RpcId,
}

impl RpcResponse {
    /// Successful response
    pub fn success(id: RpcId, result: serde_json::Value) -> Self {
        Self { jsonrpc: "2.0".to_string(), result: Some(result), error: None, id }
    }

    /// Error response
    pub fn failure(id: RpcId, error: RpcError) -> Self {
        Self { jsonrpc: "2.0".to_string(), result: None, error: Some(error), id }
    }
}

/// JSON-RPC 2.0 error structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    /// Numeric error code indicating the error type
    pub code: i32,
    /// Human-readable error message
    pub message: String,
    /// Optional additional error data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl From<DebugError> for RpcError {
    fn from(err: DebugError) -> Self {
        let code = match err {
            DebugError::BackendUnavailable => error_codes::BACKEND_UNAVAILABLE,
            DebugError::ConcurrentVerificationConflict => error_codes::VERIFICATION_CONFLICT,
            DebugError::UnknownDocument(_) => error_codes::UNKNOWN_DOCUMENT,
            _ => error_codes::INTERNAL_ERROR,
        };
        Self { code, message: err.to_string(), data: None }
    }
}

/// JSON-RPC request/response identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    /// Numeric identifier
    Number(u64),
    /// String identifier
    String(String),
}

/// Parameters naming a document only.
///
/// The editor sends either the bare uri or an object carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UriParams {
    /// `"file:///a.vpr"`
    Bare(String),
    /// `{"uri": "file:///a.vpr"}`
    Object {
        /// Document uri
        uri: String,
    },
}

impl UriParams {
    /// The document uri
    pub fn into_uri(self) -> String {
        match self {
            Self::Bare(uri) | Self::Object { uri } => uri,
        }
    }
}

/// Parameters of `GetExecutionTrace`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceParams {
    /// Document the state belongs to
    pub uri: String,
    /// Client-visible state index
    pub client_state: usize,
}

/// Parameters of `Verify`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyParams {
    /// Document to verify
    pub uri: String,
    /// Whether the user asked for the verification explicitly
    #[serde(default)]
    pub manually_triggered: bool,
}

/// JSON-RPC error codes for consistent error reporting.
pub mod error_codes {
    // Standard JSON-RPC 2.0 error codes

    /// Parse error - Invalid JSON was received by the server
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid request - The JSON sent is not a valid request object
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found - The method does not exist or is not available
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params - Invalid method parameter(s)
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error - Internal JSON-RPC error
    pub const INTERNAL_ERROR: i32 = -32603;

    // VDB-specific error codes (starting from -33000)

    /// The verification backend is not ready
    pub const BACKEND_UNAVAILABLE: i32 = -33001;
    /// A running verification could not be stopped
    pub const VERIFICATION_CONFLICT: i32 = -33002;
    /// No verification task exists for the document
    pub const UNKNOWN_DOCUMENT: i32 = -33003;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_uri_params_forms() {
        let bare: UriParams = serde_json::from_value(json!("file:///a.vpr")).unwrap();
        let object: UriParams = serde_json::from_value(json!({ "uri": "file:///a.vpr" })).unwrap();
        assert_eq!(bare.into_uri(), "file:///a.vpr");
        assert_eq!(object.into_uri(), "file:///a.vpr");
    }

    #[test]
    fn test_response_omits_empty_fields() {
        let response = RpcResponse::success(RpcId::Number(1), json!(true));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({ "jsonrpc": "2.0", "result": true, "id": 1 }));
    }

    #[test]
    fn test_debug_error_codes() {
        let err: RpcError = DebugError::BackendUnavailable.into();
        assert_eq!(err.code, error_codes::BACKEND_UNAVAILABLE);
        let err: RpcError = DebugError::ConcurrentVerificationConflict.into();
        assert_eq!(err.code, error_codes::VERIFICATION_CONFLICT);
    }
}
