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

use vdb_common::types::HeapGraph;

use crate::{error::DebugError, graph::Step};

/// Produces the heap snapshot of a state.
///
/// Implementations may call out to an external renderer; the coordinator
/// only relies on the returned [`HeapGraph`].
pub trait HeapComputer: Send + Sync {
    /// Compute the snapshot of `step`. The graph description is only
    /// required when `is_heap_needed` is set.
    fn compute_heap(&self, step: &Step, is_heap_needed: bool) -> Result<HeapGraph, DebugError>;
}

/// Width of the rendered heap image in pixels
const IMAGE_WIDTH: usize = 480;
/// Height of one heap chunk row in pixels
const ROW_HEIGHT: usize = 28;

/// Builds snapshots from the data recorded in the proof log itself
#[derive(Debug, Clone, Copy, Default)]
pub struct StepHeapComputer;

impl HeapComputer for StepHeapComputer {
    fn compute_heap(&self, step: &Step, is_heap_needed: bool) -> Result<HeapGraph, DebugError> {
        let record = step.record();
        let heap = is_heap_needed.then(|| heap_to_svg(&record.heap));

        Ok(HeapGraph {
            file_name: record.file_name.clone(),
            method_type: record.method_type.clone(),
            method_name: record.method_name.clone(),
            state: step.index(),
            method_offset: record.method_offset,
            position: record.position,
            conditions: record.path_conditions.clone(),
            state_infos: state_infos(step),
            heap,
        })
    }
}

/// Free-text description of a state: its formula, the store and the heap
fn state_infos(step: &Step) -> String {
    let record = step.record();
    let mut infos = String::new();

    if let Some(formula) = &record.formula {
        infos.push_str(formula);
        infos.push('\n');
    }
    section(&mut infos, "Store", &record.store);
    section(&mut infos, "Heap", &record.heap);

    infos.truncate(infos.trim_end().len());
    infos
}

fn section(out: &mut String, title: &str, entries: &[String]) {
    if entries.is_empty() {
        return;
    }
    out.push_str(title);
    out.push_str(":\n");
    for entry in entries {
        out.push('\t');
        out.push_str(entry);
        out.push('\n');
    }
}

/// SVG image of the heap chunks, one framed row per chunk
fn heap_to_svg(chunks: &[String]) -> String {
    let height = chunks.len().max(1) * ROW_HEIGHT + 8;
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{IMAGE_WIDTH}\" height=\"{height}\" \
         font-family=\"monospace\" font-size=\"12\">\n"
    );
    if chunks.is_empty() {
        svg.push_str("  <text x=\"10\" y=\"20\">empty heap</text>\n");
    }
    for (i, chunk) in chunks.iter().enumerate() {
        let y = 4 + i * ROW_HEIGHT;
        svg.push_str(&format!(
            "  <g id=\"chunk{i}\">\n    <rect x=\"4\" y=\"{y}\" width=\"{}\" height=\"{}\" \
             fill=\"none\" stroke=\"black\"/>\n    <text x=\"10\" y=\"{}\">{}</text>\n  </g>\n",
            IMAGE_WIDTH - 8,
            ROW_HEIGHT - 4,
            y + 16,
            escape_xml(chunk),
        ));
    }
    svg.push_str("</svg>\n");
    svg
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::StateGraph;
    use vdb_common::types::StepRecord;

    fn graph() -> StateGraph {
        let mut record = StepRecord::new(0, None)
            .decorated()
            .in_method("a.vpr", "method", "m", 0)
            .at(3, 1)
            .with_conditions(["x > 0", "y != null"]);
        record.formula = Some("assert x > 0".into());
        record.store = vec!["x -> x@1".into()];
        record.heap = vec!["acc(y.\"f\")".into()];
        StateGraph::from_records(vec![record])
    }

    #[test]
    fn test_snapshot_from_step() {
        let graph = graph();
        let step = graph.step(0).unwrap();

        let heap = StepHeapComputer.compute_heap(step, false).unwrap();
        assert_eq!(heap.method_name, "m");
        assert_eq!(heap.state, 0);
        assert_eq!(heap.conditions, vec!["x > 0", "y != null"]);
        assert_eq!(heap.state_infos, "assert x > 0\nStore:\n\tx -> x@1\nHeap:\n\tacc(y.\"f\")");
        assert!(heap.heap.is_none());
    }

    #[test]
    fn test_heap_graph_only_when_needed() {
        let graph = graph();
        let step = graph.step(0).unwrap();

        let svg = StepHeapComputer.compute_heap(step, true).unwrap().heap.unwrap();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("<g id=\"chunk0\">"));
        assert!(svg.contains("<text x=\"10\" y=\"20\">acc(y.&quot;f&quot;)</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_empty_state_infos() {
        let graph = StateGraph::from_records(vec![StepRecord::new(0, None)]);
        let heap = StepHeapComputer.compute_heap(graph.step(0).unwrap(), false).unwrap();
        assert!(heap.state_infos.is_empty());
        assert!(heap.conditions.is_empty());
    }
}
