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

//! JSON-RPC server for VDB debug queries and verification control.
//!
//! The editor extension talks to the engine through this interface. Every
//! entry point of the [`DebugCoordinator`](crate::DebugCoordinator) and the
//! [`VerificationScheduler`](crate::VerificationScheduler) is exposed as a
//! JSON-RPC 2.0 method over HTTP POST.
//!
//! # Architecture
//!
//! - **Server** ([`server`]) - Axum server handling client connections
//! - **Methods** ([`methods`]) - RPC method implementations organized by functionality
//! - **Types** ([`types`]) - Request/response data structures and protocol types
//! - **Utils** ([`utils`]) - Port discovery, parameter parsing and error helpers
//!
//! # Methods
//!
//! | Method              | Parameters                            | Result                 |
//! |---------------------|---------------------------------------|------------------------|
//! | `GetExecutionTrace` | `{uri, clientState}`                  | trace entries          |
//! | `ShowHeap`          | `{uri, clientIndex, isHeapNeeded}`    | `bool`                 |
//! | `RenderHeap`        | `uri`                                 | `{content, revision}`  |
//! | `ResetState`        | none                                  | `null`                 |
//! | `FileOpened`        | `uri`                                 | `bool`                 |
//! | `FileClosed`        | `uri`                                 | `bool`                 |
//! | `GetDiagnostics`    | `uri`                                 | diagnostics            |
//! | `RemoveDiagnostics` | `uri`                                 | `bool`                 |
//! | `StopDebugging`     | none                                  | `null`                 |
//! | `Verify`            | `{uri, manuallyTriggered}`            | `true` or an error     |
//! | `StopVerification`  | `uri`                                 | `bool`                 |
//!
//! Debug queries never fail on unknown documents or states: they resolve
//! with an empty trace, `false` or the placeholder render.

pub mod methods;
pub mod server;
pub mod types;
pub mod utils;

pub use server::*;
pub use types::*;
