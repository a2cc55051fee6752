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

//! Debug sessions
//!
//! Every open document owns one [`DebugSession`] holding the interactive
//! heap state, next to its [`VerificationTask`](crate::task::VerificationTask).
//! The [`DebugCoordinator`] keeps the per-document registry and is the only
//! entry point used by the RPC layer and the CLI.

mod coordinator;

pub use coordinator::DebugCoordinator;

use tracing::debug;
use vdb_common::types::HeapGraph;

use crate::{
    error::DebugError,
    heap::{HeapStore, HeapView, HtmlRenderer, HEAP_SLOTS},
};

/// Interactive heap state of one document
#[derive(Debug, Clone, Default)]
pub struct DebugSession {
    heap_store: HeapStore,
    next_heap_index: usize,
    revision: u64,
    global_info: String,
}

impl DebugSession {
    /// Create a session with no snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot the next snapshot is written to
    pub fn next_heap_index(&self) -> usize {
        self.next_heap_index
    }

    /// Counter bumped whenever the rendered content changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Text shown below the heap panels
    pub fn global_info(&self) -> &str {
        &self.global_info
    }

    /// Replace the text shown below the heap panels
    pub fn set_global_info(&mut self, info: impl Into<String>) {
        self.global_info = info.into();
        self.revision += 1;
    }

    /// Stored snapshots
    pub fn heap_store(&self) -> &HeapStore {
        &self.heap_store
    }

    /// Store a snapshot at the current parity slot and flip the parity
    pub fn push_heap(&mut self, graph: HeapGraph) -> Result<usize, DebugError> {
        let slot = self.next_heap_index;
        self.heap_store.set_state(graph, slot)?;
        self.next_heap_index = (slot + 1) % HEAP_SLOTS;
        self.revision += 1;
        debug!(slot, revision = self.revision, "heap snapshot stored");
        Ok(slot)
    }

    /// Structured view of the stored snapshots
    pub fn heap_view(&self) -> HeapView {
        self.heap_store.render(self.next_heap_index)
    }

    /// Render the heap document of `source_uri`
    pub fn render(&self, renderer: &HtmlRenderer, source_uri: &str) -> String {
        renderer.render(&self.heap_view(), &self.global_info, source_uri)
    }

    /// Drop the stored snapshots, keeping the parity
    pub fn reset_heap(&mut self) {
        self.heap_store.reset_state();
        self.revision += 1;
    }

    /// Drop every piece of interactive state
    pub fn reset(&mut self) {
        self.heap_store.reset_state();
        self.next_heap_index = 0;
        self.global_info.clear();
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::PanelLabel;

    fn graph(state: usize) -> HeapGraph {
        HeapGraph { state, ..Default::default() }
    }

    #[test]
    fn test_parity_flips_on_every_snapshot() {
        let mut session = DebugSession::new();
        assert_eq!(session.push_heap(graph(1)).unwrap(), 0);
        assert_eq!(session.next_heap_index(), 1);
        assert_eq!(session.push_heap(graph(2)).unwrap(), 1);
        assert_eq!(session.push_heap(graph(3)).unwrap(), 0);
        assert_eq!(session.revision(), 3);

        // the snapshot stored last is shown as current
        let HeapView::Comparison { current, previous } = session.heap_view() else {
            panic!("expected two panels");
        };
        assert_eq!(current.state, 3);
        assert_eq!(current.label, PanelLabel::CurrentState);
        assert_eq!(previous.state, 2);
    }

    #[test]
    fn test_reset() {
        let mut session = DebugSession::new();
        session.push_heap(graph(1)).unwrap();
        session.set_global_info("info");
        session.reset();

        assert_eq!(session.next_heap_index(), 0);
        assert!(session.global_info().is_empty());
        assert!(session.heap_view().is_empty());
        let html = session.render(&HtmlRenderer::new("/tmp"), "file:///a.vpr");
        assert!(html.contains("No graph to show"));
    }
}
