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

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Snapshot of the symbolic heap at one state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeapGraph {
    /// Source file of the verifiable
    pub file_name: String,
    /// Kind of the verifiable
    pub method_type: String,
    /// Name of the verifiable
    pub method_name: String,
    /// Absolute state id
    pub state: usize,
    /// Absolute id of the verifiable's first state
    pub method_offset: usize,
    /// Source position of the state
    pub position: Position,
    /// Path conditions in declaration order
    pub conditions: Vec<String>,
    /// Free-text description of the store and heap
    pub state_infos: String,
    /// SVG image of the heap chunks, absent when the heap was not requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heap: Option<String>,
}

impl HeapGraph {
    /// State number relative to the start of its verifiable
    pub fn relative_state(&self) -> usize {
        self.state.saturating_sub(self.method_offset)
    }
}

/// Parameters of a heap request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowHeapParams {
    /// Document the state belongs to
    pub uri: String,
    /// Client-visible state index
    pub client_index: usize,
    /// Whether the heap graph itself has to be computed
    pub is_heap_needed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_state() {
        let graph = HeapGraph { state: 12, method_offset: 10, ..Default::default() };
        assert_eq!(graph.relative_state(), 2);
    }

    #[test]
    fn test_show_heap_params_wire_format() {
        let params: ShowHeapParams = serde_json::from_value(serde_json::json!({
            "uri": "file:///a.vpr",
            "clientIndex": 4,
            "isHeapNeeded": false
        }))
        .unwrap();
        assert_eq!(params.client_index, 4);
        assert!(!params.is_heap_needed);
    }
}
