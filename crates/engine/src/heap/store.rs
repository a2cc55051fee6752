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

use tracing::{debug, error};
use vdb_common::types::HeapGraph;

use crate::error::DebugError;

use super::{HeapView, PanelLabel, StatePanel};

/// Number of snapshots kept at a time
pub const HEAP_SLOTS: usize = 2;

/// The two most recent heap snapshots.
///
/// Which slot receives the next snapshot is decided by the caller through a
/// parity index; the store itself only remembers what was put where.
#[derive(Debug, Clone, Default)]
pub struct HeapStore {
    slots: [Option<HeapGraph>; HEAP_SLOTS],
}

impl HeapStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a snapshot into slot 0 or 1, replacing what was there
    pub fn set_state(&mut self, graph: HeapGraph, slot: usize) -> Result<(), DebugError> {
        let entry = self.slots.get_mut(slot).ok_or(DebugError::InvalidHeapSlot(slot))?;
        debug!(slot, state = graph.state, "storing heap snapshot");
        *entry = Some(graph);
        Ok(())
    }

    /// Drop both snapshots
    pub fn reset_state(&mut self) {
        self.slots = Default::default();
    }

    /// Snapshot stored in a slot
    pub fn get(&self, slot: usize) -> Option<&HeapGraph> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Number of populated slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check if no snapshot is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the comparison view.
    ///
    /// `next_heap_index` is the slot the *next* snapshot will be written to,
    /// so the newest snapshot lives in the other one.
    pub fn render(&self, next_heap_index: usize) -> HeapView {
        if next_heap_index >= HEAP_SLOTS {
            error!(next_heap_index, "invalid parity index for heap rendering");
        }
        let previous_slot = next_heap_index % HEAP_SLOTS;
        let current_slot = 1 - previous_slot;

        match (self.get(current_slot), self.get(previous_slot)) {
            (Some(current), Some(previous)) => HeapView::Comparison {
                current: StatePanel::new(
                    PanelLabel::CurrentState,
                    current_slot,
                    current,
                    Some(previous),
                ),
                previous: StatePanel::new(
                    PanelLabel::PreviousState,
                    previous_slot,
                    previous,
                    Some(current),
                ),
            },
            (Some(graph), None) => {
                HeapView::Single(StatePanel::new(PanelLabel::Current, current_slot, graph, None))
            }
            (None, Some(graph)) => {
                HeapView::Single(StatePanel::new(PanelLabel::Current, previous_slot, graph, None))
            }
            (None, None) => HeapView::Empty,
        }
    }
}
