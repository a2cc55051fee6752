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

//! End-to-end debugging sessions driven by JSON proof logs

use serde_json::json;
use tracing::info;
use vdb_common::types::{ProofLog, StateColors};
use vdb_engine::{DebugConfig, DebugCoordinator, HeapView, PanelLabel};

const URI: &str = "file:///examples/list.vpr";

/// Two methods: `append` with a branch on `l.next == null`, and `length`
fn proof_log() -> ProofLog {
    ProofLog::from_json(
        &json!({
            "steps": [
                { "verifiable": 0, "methodType": "method", "methodName": "append", "fileName": "list.vpr",
                  "canBeShownAsDecoration": true, "position": { "line": 3, "character": 2 } },
                { "verifiable": 0, "parent": 0, "methodType": "method", "methodName": "append", "fileName": "list.vpr",
                  "canBeShownAsDecoration": true, "pathConditions": ["l != null"],
                  "position": { "line": 4, "character": 2 } },
                { "verifiable": 0, "parent": 1, "isBranch": true, "methodType": "method", "methodName": "append",
                  "fileName": "list.vpr", "pathConditions": ["l != null", "l.next == null"] },
                { "verifiable": 0, "parent": 2, "methodType": "method", "methodName": "append", "fileName": "list.vpr",
                  "canBeShownAsDecoration": true, "pathConditions": ["l != null", "l.next == null"],
                  "position": { "line": 6, "character": 4 } },
                { "verifiable": 0, "parent": 1, "isBranch": true, "methodType": "method", "methodName": "append",
                  "fileName": "list.vpr", "pathConditions": ["l != null", "l.next != null"] },
                { "verifiable": 0, "parent": 4, "methodType": "method", "methodName": "append", "fileName": "list.vpr",
                  "canBeShownAsDecoration": true, "pathConditions": ["l != null", "l.next != null"],
                  "position": { "line": 8, "character": 4 } },
                { "verifiable": 1, "methodType": "function", "methodName": "length", "fileName": "list.vpr",
                  "methodOffset": 6, "canBeShownAsDecoration": true,
                  "position": { "line": 12, "character": 0 } }
            ],
            "diagnostics": [
                { "position": { "line": 8, "character": 4 }, "message": "Assertion might fail" }
            ]
        })
        .to_string(),
    )
    .unwrap()
}

fn coordinator(config: DebugConfig) -> DebugCoordinator {
    let coordinator = DebugCoordinator::new(config);
    coordinator.file_opened(URI);
    coordinator.on_verification_complete(URI, proof_log());
    coordinator
}

#[test]
fn test_client_indices_follow_decoration_order() {
    vdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let coordinator = coordinator(DebugConfig::default());
    let run = coordinator.task(URI).unwrap().run().unwrap();

    assert_eq!(run.client_steps.as_slice(), &[0, 1, 3, 5, 6]);
    let decorated =
        run.graph.steps().iter().filter(|step| step.can_be_shown_as_decoration()).count();
    assert_eq!(run.client_steps.len(), decorated);
    assert_eq!(coordinator.diagnostics(URI).len(), 1);
}

#[test]
fn test_trace_through_second_branch() {
    vdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let coordinator = coordinator(DebugConfig::default());

    // client state 3 is the body of the `l.next != null` branch
    let trace = coordinator.get_execution_trace(URI, 3);
    assert_eq!(trace.states(), vec![3, 1, 0]);
    assert!(trace.iter().all(|entry| entry.color == StateColors::interesting_state(false)));

    let run = coordinator.task(URI).unwrap().run().unwrap();
    let depths: Vec<_> = trace
        .iter()
        .map(|entry| run.graph.depth_level(run.client_steps.get(entry.state).unwrap()).unwrap())
        .collect();
    assert!(depths.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test]
fn test_advanced_trace_includes_context() {
    vdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let config = DebugConfig { simple_mode: false, dark_graphs: true, ..Default::default() };
    let coordinator = coordinator(config);

    let trace = coordinator.get_execution_trace(URI, 1);
    let muted = StateColors::uninteresting_state(true);
    let context: Vec<_> =
        trace.iter().take_while(|entry| entry.color == muted).map(|entry| entry.state).collect();
    // expansion states of step 1 first, then the top-level states of `append`
    assert_eq!(context, vec![2, 3, 0]);
    let path: Vec<_> =
        trace.iter().skip(context.len()).map(|entry| entry.state).collect();
    assert_eq!(path, vec![1, 0]);
}

#[test]
fn test_single_state_function() {
    vdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let coordinator = coordinator(DebugConfig::default());

    let trace = coordinator.get_execution_trace(URI, 4);
    assert_eq!(trace.len(), 1);
    assert_eq!(trace[0].state, 4);
    assert!(trace[0].show_number);
}

#[test]
fn test_heap_comparison_between_branches() {
    vdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = tempfile::tempdir().unwrap();
    let config = DebugConfig { heap_image_dir: dir.path().to_path_buf(), ..Default::default() };
    let coordinator = coordinator(config);

    assert!(coordinator.show_heap(URI, 2, true));
    let HeapView::Single(panel) = coordinator.heap_view(URI) else {
        panic!("expected a single panel");
    };
    assert_eq!(panel.label, PanelLabel::Current);

    assert!(coordinator.show_heap(URI, 3, false));
    let HeapView::Comparison { current, previous } = coordinator.heap_view(URI) else {
        panic!("expected two panels");
    };
    assert_eq!(current.state, 5);
    assert_eq!(previous.state, 3);
    assert_eq!(current.new_conditions().collect::<Vec<_>>(), vec!["l.next != null"]);
    assert_eq!(previous.new_conditions().collect::<Vec<_>>(), vec!["l.next == null"]);

    let html = coordinator.render_heap_content(URI);
    let shared = html.find("<tr><td>l != null</td></tr>").unwrap();
    let new = html.find("<tr><td><b>l.next != null</b></td></tr>").unwrap();
    assert!(shared < new);
    assert!(html.contains(&format!("{}", dir.path().join("heap_1.svg").display())));
    assert!(html.contains("position: 9:5"));

    coordinator.reset_state();
    assert!(coordinator.render_heap_content(URI).contains("No graph to show"));
}

#[test]
fn test_state_relative_to_method_offset() {
    vdb_common::logging::ensure_test_logging(None);
    let coordinator = coordinator(DebugConfig::default());

    assert!(coordinator.show_heap(URI, 4, false));
    let HeapView::Single(panel) = coordinator.heap_view(URI) else {
        panic!("expected a single panel");
    };
    assert_eq!(panel.method_name, "length");
    assert_eq!(panel.state, 0);
}

#[test]
fn test_closed_document_is_forgotten() {
    vdb_common::logging::ensure_test_logging(None);
    let coordinator = coordinator(DebugConfig::default());

    assert!(coordinator.file_closed(URI));
    assert!(coordinator.get_execution_trace(URI, 0).is_empty());
    assert!(coordinator.diagnostics(URI).is_empty());
    assert!(!coordinator.show_heap(URI, 0, false));
}
