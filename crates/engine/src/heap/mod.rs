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

//! Heap snapshots and their side-by-side comparison
//!
//! - [`HeapStore`] keeps the two most recent [`HeapGraph`](vdb_common::types::HeapGraph)s
//! - [`HeapView`] is the structured comparison built from the store
//! - [`HtmlRenderer`] turns a view into the text blob shown by the editor
//! - [`HeapComputer`] is the collaborator producing snapshots for a state

mod computer;
mod html;
mod store;
mod view;

pub use computer::*;
pub use html::*;
pub use store::*;
pub use view::*;
