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

//! RPC method handlers
//!
//! This module contains all the RPC method implementations for the debug server.

pub mod heap;
pub mod lifecycle;
pub mod trace;

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{types::RpcError, utils::method_not_found};
use crate::scheduler::{VerificationBackend, VerificationScheduler};

/// Method handler for dispatching RPC calls
#[derive(Debug)]
pub struct MethodHandler<B> {
    scheduler: Arc<VerificationScheduler<B>>,
}

impl<B: VerificationBackend> MethodHandler<B> {
    /// Create a handler serving the documents of `scheduler`'s coordinator
    pub fn new(scheduler: Arc<VerificationScheduler<B>>) -> Self {
        Self { scheduler }
    }

    /// The scheduler behind this handler
    pub fn scheduler(&self) -> &Arc<VerificationScheduler<B>> {
        &self.scheduler
    }

    /// Handle an RPC method call
    pub async fn handle_method(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<Value, RpcError> {
        debug!("Handling RPC method: {}", method);
        let coordinator = self.scheduler.coordinator();

        match method {
            // Debug queries - trace.rs and heap.rs
            "GetExecutionTrace" => trace::get_execution_trace(coordinator, params),
            "ShowHeap" => heap::show_heap(coordinator, params),
            "RenderHeap" => heap::render_heap(coordinator, params),
            "ResetState" => heap::reset_state(coordinator),

            // Document lifecycle - lifecycle.rs
            "FileOpened" => lifecycle::file_opened(coordinator, params),
            "FileClosed" => lifecycle::file_closed(coordinator, params),
            "GetDiagnostics" => lifecycle::get_diagnostics(coordinator, params),
            "RemoveDiagnostics" => lifecycle::remove_diagnostics(coordinator, params),
            "StopDebugging" => lifecycle::stop_debugging(coordinator),
            "Verify" => lifecycle::verify(&self.scheduler, params).await,
            "StopVerification" => lifecycle::stop_verification(&self.scheduler, params).await,

            _ => Err(method_not_found(method)),
        }
    }
}
