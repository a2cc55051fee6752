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

//! VDB Engine - state graphs, execution traces and heap comparison
//!
//! The engine turns the proof log of a completed verification into a
//! navigable [`StateGraph`], explains how the verifier reached a state with
//! [`reconstruct_trace`], and compares the heaps of two states through the
//! [`HeapStore`]. The [`DebugCoordinator`] ties these together per document
//! and is served over JSON-RPC by the [`rpc`] module.

pub mod backend;
pub use backend::*;

pub mod config;
pub use config::*;

pub mod error;
pub use error::*;

pub mod graph;
pub use graph::*;

pub mod heap;
pub use heap::*;

pub mod rpc;
pub use rpc::*;

pub mod scheduler;
pub use scheduler::*;

pub mod session;
pub use session::*;

pub mod task;
pub use task::*;

pub mod trace;
pub use trace::*;
