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

use serde::Serialize;
use vdb_common::types::{HeapGraph, Position, StateColors};

/// Placeholder shown when no snapshot is stored
pub const NO_GRAPH_MESSAGE: &str = "No graph to show";

/// Heading of a state panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PanelLabel {
    /// The only stored snapshot
    Current,
    /// The newer of two snapshots
    CurrentState,
    /// The older of two snapshots
    PreviousState,
}

impl PanelLabel {
    /// Heading text
    pub fn title(&self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::CurrentState => "Current State",
            Self::PreviousState => "Previous State",
        }
    }

    /// Heading color
    pub fn color(&self) -> &'static str {
        match self {
            Self::Current | Self::CurrentState => StateColors::CURRENT_STATE,
            Self::PreviousState => StateColors::PREVIOUS_STATE,
        }
    }
}

/// One row of the path-condition table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionRow {
    /// Condition literal as reported by the verifier
    pub text: String,
    /// Whether the condition is absent from the snapshot compared against
    pub is_new: bool,
}

/// Rendering of one stored snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatePanel {
    /// Heading
    pub label: PanelLabel,
    /// Store slot the snapshot lives in, which also keys its heap image
    pub slot: usize,
    /// Source file of the verifiable
    pub file_name: String,
    /// Kind of the verifiable
    pub method_type: String,
    /// Name of the verifiable
    pub method_name: String,
    /// State number relative to the verifiable
    pub state: usize,
    /// Source position of the state
    pub position: Position,
    /// Path conditions in declaration order
    pub conditions: Vec<ConditionRow>,
    /// Free-text description of the state
    pub state_infos: String,
}

impl StatePanel {
    /// Build the panel of `graph`, emphasizing conditions missing from `other`.
    ///
    /// Conditions are compared by exact string match only: two conditions
    /// that are logically equal but printed differently count as different.
    pub fn new(
        label: PanelLabel,
        slot: usize,
        graph: &HeapGraph,
        other: Option<&HeapGraph>,
    ) -> Self {
        let conditions = graph
            .conditions
            .iter()
            .map(|condition| ConditionRow {
                text: condition.clone(),
                is_new: other.is_some_and(|other| !other.conditions.contains(condition)),
            })
            .collect();

        Self {
            label,
            slot,
            file_name: graph.file_name.clone(),
            method_type: graph.method_type.clone(),
            method_name: graph.method_name.clone(),
            state: graph.relative_state(),
            position: graph.position,
            conditions,
            state_infos: graph.state_infos.clone(),
        }
    }

    /// Conditions marked as new
    pub fn new_conditions(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().filter(|row| row.is_new).map(|row| row.text.as_str())
    }
}

/// Structured comparison of the stored snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HeapView {
    /// Nothing stored
    Empty,
    /// A single snapshot
    Single(StatePanel),
    /// The newest snapshot next to the one before it
    Comparison {
        /// Newest snapshot
        current: StatePanel,
        /// Snapshot before it
        previous: StatePanel,
    },
}

impl HeapView {
    /// Panels in display order
    pub fn panels(&self) -> Vec<&StatePanel> {
        match self {
            Self::Empty => Vec::new(),
            Self::Single(panel) => vec![panel],
            Self::Comparison { current, previous } => vec![current, previous],
        }
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(conditions: &[&str]) -> HeapGraph {
        HeapGraph {
            file_name: "a.vpr".into(),
            method_type: "method".into(),
            method_name: "m".into(),
            state: 15,
            method_offset: 10,
            conditions: conditions.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_conditions_by_exact_match() {
        let a = graph(&["x > 0", "y == 1", "z != null"]);
        let b = graph(&["x > 0", "y==1"]);

        let panel = StatePanel::new(PanelLabel::CurrentState, 0, &a, Some(&b));
        let rows: Vec<_> = panel.conditions.iter().map(|row| (row.text.as_str(), row.is_new)).collect();
        assert_eq!(rows, vec![("x > 0", false), ("y == 1", true), ("z != null", true)]);
        assert_eq!(panel.new_conditions().collect::<Vec<_>>(), vec!["y == 1", "z != null"]);
        assert_eq!(panel.state, 5);
    }

    #[test]
    fn test_nothing_is_new_without_comparison() {
        let a = graph(&["x > 0"]);
        let panel = StatePanel::new(PanelLabel::Current, 0, &a, None);
        assert_eq!(panel.new_conditions().count(), 0);
    }

    #[test]
    fn test_labels() {
        assert_eq!(PanelLabel::Current.title(), "Current");
        assert_eq!(PanelLabel::PreviousState.title(), "Previous State");
        assert_eq!(PanelLabel::CurrentState.color(), "red");
        assert_eq!(PanelLabel::PreviousState.color(), "green");
    }
}
