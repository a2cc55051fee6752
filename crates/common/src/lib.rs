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

//! VDB Common - Shared types and utilities for VDB components
//!
//! This crate provides the wire types exchanged between the verification
//! backend, the debugging engine and its clients, together with the logging
//! setup used by every VDB binary.

/// Common types used throughout the VDB ecosystem including proof-log steps, execution traces and heap snapshots
pub mod types;

/// Logging setup and utilities for consistent logging across VDB components
pub mod logging;

pub use logging::*;
