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

//! RPC server utilities
//!
//! Port discovery, parameter parsing and error helpers.

use eyre::{eyre, Result};
use serde::de::DeserializeOwned;
use std::net::TcpListener;
use tracing::{debug, info};

use super::types::{error_codes, RpcError};

/// Find an available port starting from a base port
pub fn find_available_port(start_port: u16) -> Result<u16> {
    for port in start_port..65535 {
        if is_port_available(port) {
            info!("Found available port: {}", port);
            return Ok(port);
        }
    }
    Err(eyre!("No available port found in range {}-65534", start_port))
}

/// Check if a port is available on localhost
pub fn is_port_available(port: u16) -> bool {
    match TcpListener::bind(("127.0.0.1", port)) {
        Ok(_) => {
            debug!("Port {} is available", port);
            true
        }
        Err(_) => {
            debug!("Port {} is not available", port);
            false
        }
    }
}

/// Use `preferred` if it is free, otherwise search upwards from it
pub fn resolve_rpc_port(preferred: u16) -> Result<u16> {
    if is_port_available(preferred) {
        Ok(preferred)
    } else {
        find_available_port(preferred.saturating_add(1))
    }
}

/// Deserialize method parameters.
///
/// Positional parameters holding a single value are unwrapped, so both
/// `[{"uri": ..}]` and `{"uri": ..}` are accepted.
pub fn parse_params<T: DeserializeOwned>(params: Option<serde_json::Value>) -> Result<T, RpcError> {
    let value = match params {
        Some(serde_json::Value::Array(mut values)) if values.len() == 1 => values.remove(0),
        Some(value) => value,
        None => serde_json::Value::Null,
    };
    serde_json::from_value(value).map_err(|e| invalid_params(&format!("Invalid params: {e}")))
}

/// Convert error to RPC error format
pub fn to_rpc_error(code: i32, message: &str, data: Option<serde_json::Value>) -> RpcError {
    RpcError { code, message: message.to_string(), data }
}

/// Helper to create internal error responses
pub fn internal_error(message: &str) -> RpcError {
    to_rpc_error(error_codes::INTERNAL_ERROR, message, None)
}

/// Helper to create method not found error
pub fn method_not_found(method: &str) -> RpcError {
    to_rpc_error(error_codes::METHOD_NOT_FOUND, &format!("Method '{method}' not found"), None)
}

/// Helper to create invalid params error
pub fn invalid_params(message: &str) -> RpcError {
    to_rpc_error(error_codes::INVALID_PARAMS, message, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::types::{TraceParams, UriParams};
    use serde_json::json;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_port_availability() {
        let port = find_available_port(50000).expect("Should find an available port");
        assert!(port >= 50000);
        assert!(is_port_available(port));
    }

    #[test]
    #[serial]
    fn test_resolve_occupied_port() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        let taken = listener.local_addr().unwrap().port();
        let port = resolve_rpc_port(taken).unwrap();
        assert_ne!(port, taken);
    }

    #[test]
    fn test_parse_params() {
        let params: TraceParams =
            parse_params(Some(json!([{ "uri": "file:///a.vpr", "clientState": 2 }]))).unwrap();
        assert_eq!(params.client_state, 2);

        let params: UriParams = parse_params(Some(json!("file:///a.vpr"))).unwrap();
        assert_eq!(params.into_uri(), "file:///a.vpr");

        let err = parse_params::<TraceParams>(None).unwrap_err();
        assert_eq!(err.code, error_codes::INVALID_PARAMS);
    }

    #[test]
    fn test_error_helpers() {
        let err = internal_error("test message");
        assert_eq!(err.code, -32603);
        assert_eq!(err.message, "test message");

        let err = method_not_found("test_method");
        assert_eq!(err.code, -32601);
        assert!(err.message.contains("test_method"));
    }
}
