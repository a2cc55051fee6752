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

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, warn};
use vdb_common::types::{Diagnostic, ExecutionTrace, ProofLog};

use crate::{
    config::DebugConfig,
    error::DebugError,
    heap::{write_heap_image, HeapComputer, HeapView, HtmlRenderer, StepHeapComputer},
    task::VerificationTask,
};

use super::DebugSession;

#[derive(Debug)]
struct Document {
    task: Arc<VerificationTask>,
    session: Mutex<DebugSession>,
}

impl Document {
    fn new(uri: &str) -> Self {
        Self { task: Arc::new(VerificationTask::new(uri)), session: Mutex::new(DebugSession::new()) }
    }
}

/// Registry of open documents and the entry point of every debug query.
///
/// Public entry points never fail: lookup failures are logged and answered
/// with an empty trace, `false`, or the placeholder render.
pub struct DebugCoordinator {
    documents: DashMap<String, Arc<Document>>,
    heap_computer: Arc<dyn HeapComputer>,
    config: RwLock<DebugConfig>,
}

impl std::fmt::Debug for DebugCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebugCoordinator")
            .field("documents", &self.documents.len())
            .field("config", &*self.config.read())
            .finish()
    }
}

impl Default for DebugCoordinator {
    fn default() -> Self {
        Self::new(DebugConfig::default())
    }
}

impl DebugCoordinator {
    /// Create a coordinator computing heaps from the proof log data
    pub fn new(config: DebugConfig) -> Self {
        Self::with_heap_computer(config, Arc::new(StepHeapComputer))
    }

    /// Create a coordinator with a custom heap collaborator
    pub fn with_heap_computer(config: DebugConfig, heap_computer: Arc<dyn HeapComputer>) -> Self {
        Self { documents: DashMap::new(), heap_computer, config: RwLock::new(config) }
    }

    /// Current configuration
    pub fn config(&self) -> DebugConfig {
        self.config.read().clone()
    }

    /// Replace the configuration; takes effect on the next request
    pub fn update_config(&self, config: DebugConfig) {
        info!(simple_mode = config.simple_mode, dark = config.dark_graphs, "configuration changed");
        *self.config.write() = config;
    }

    fn document(&self, uri: &str) -> Result<Arc<Document>, DebugError> {
        self.documents
            .get(uri)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DebugError::UnknownDocument(uri.to_string()))
    }

    /// Task of a document, if it is open
    pub fn task(&self, uri: &str) -> Option<Arc<VerificationTask>> {
        self.document(uri).ok().map(|document| document.task.clone())
    }

    /// Uris of all open documents
    pub fn documents(&self) -> Vec<String> {
        self.documents.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Register a document. Returns `false` if it was already open.
    pub fn file_opened(&self, uri: &str) -> bool {
        let mut created = false;
        self.documents.entry(uri.to_string()).or_insert_with(|| {
            created = true;
            Arc::new(Document::new(uri))
        });
        debug!(uri, created, "file opened");
        created
    }

    /// Forget a document together with its diagnostics
    pub fn file_closed(&self, uri: &str) -> bool {
        match self.documents.remove(uri) {
            Some((_, document)) => {
                document.task.reset_diagnostics();
                debug!(uri, "file closed");
                true
            }
            None => false,
        }
    }

    /// A new verification of `uri` begins; results of the previous one are dropped
    pub fn verification_started(&self, uri: &str) -> Result<(), DebugError> {
        let document = self.document(uri)?;
        document.task.invalidate();
        document.session.lock().reset();
        Ok(())
    }

    /// Build the state graph of a finished verification and swap it in.
    ///
    /// Results for documents that are not open (e.g. closed while the
    /// verification ran) are discarded. Returns whether the run was stored.
    pub fn on_verification_complete(&self, uri: &str, log: ProofLog) -> bool {
        let document = match self.document(uri) {
            Ok(document) => document,
            Err(e) => {
                warn!("{e}, discarding verification results");
                return false;
            }
        };

        let run = document.task.complete(log);
        let info = format!(
            "{} states in {} verifiables, {} shown",
            run.graph.len(),
            run.graph.verifiables().len(),
            run.client_steps.len()
        );

        let mut session = document.session.lock();
        session.reset();
        session.set_global_info(info);
        info!(uri, steps = run.graph.len(), "verification completed");
        true
    }

    /// Execution trace leading to a client state, empty when it cannot be built
    pub fn get_execution_trace(&self, uri: &str, client_index: usize) -> ExecutionTrace {
        let settings = self.config.read().trace_settings();
        let result = self
            .document(uri)
            .and_then(|document| document.task.execution_trace(client_index, settings));

        match result {
            Ok(trace) => trace,
            Err(e) => {
                error!(uri, client_index, "Error handling execution trace request: {e}");
                ExecutionTrace::new()
            }
        }
    }

    /// Compute the heap of a client state and store it as the newest snapshot
    pub fn show_heap(&self, uri: &str, client_index: usize, is_heap_needed: bool) -> bool {
        match self.try_show_heap(uri, client_index, is_heap_needed) {
            Ok(slot) => {
                debug!(uri, client_index, slot, "heap shown");
                true
            }
            Err(e) => {
                error!(uri, client_index, "Error showing heap: {e}");
                false
            }
        }
    }

    fn try_show_heap(
        &self,
        uri: &str,
        client_index: usize,
        is_heap_needed: bool,
    ) -> Result<usize, DebugError> {
        let document = self.document(uri)?;
        let run = document.task.run().ok_or_else(|| DebugError::NoCompletedRun(uri.to_string()))?;
        let step = run.server_step(client_index)?;
        let graph = self.heap_computer.compute_heap(step, is_heap_needed)?;
        let image_dir = self.config.read().heap_image_dir.clone();

        let mut session = document.session.lock();
        if let Some(image) = &graph.heap {
            write_heap_image(&image_dir, session.next_heap_index(), image)?;
        }
        let slot = session.push_heap(graph)?;
        Ok(slot)
    }

    /// Structured heap comparison of a document
    pub fn heap_view(&self, uri: &str) -> HeapView {
        self.document(uri)
            .map(|document| document.session.lock().heap_view())
            .unwrap_or(HeapView::Empty)
    }

    /// Render revision of a document's heap view
    pub fn heap_revision(&self, uri: &str) -> Option<u64> {
        self.document(uri).ok().map(|document| document.session.lock().revision())
    }

    /// Render the heap comparison of a document
    pub fn render_heap_content(&self, uri: &str) -> String {
        let renderer = HtmlRenderer::new(self.config.read().heap_image_dir.clone());
        match self.document(uri) {
            Ok(document) => document.session.lock().render(&renderer, uri),
            Err(e) => {
                warn!("{e}, rendering placeholder");
                renderer.render(&HeapView::Empty, "", uri)
            }
        }
    }

    /// Diagnostics reported by the last verification of a document
    pub fn diagnostics(&self, uri: &str) -> Vec<Diagnostic> {
        self.task(uri).map(|task| task.diagnostics()).unwrap_or_default()
    }

    /// Remove the diagnostics of a document. Returns whether it is open.
    pub fn reset_diagnostics(&self, uri: &str) -> bool {
        match self.task(uri) {
            Some(task) => {
                task.reset_diagnostics();
                true
            }
            None => false,
        }
    }

    /// Drop the stored heap snapshots of every document
    pub fn reset_state(&self) {
        for entry in self.documents.iter() {
            entry.value().session.lock().reset_heap();
        }
    }

    /// Leave debugging mode: heap snapshots, parity and shown traces are
    /// dropped, completed runs are kept.
    pub fn stop_debugging(&self) {
        for entry in self.documents.iter() {
            let document = entry.value();
            document.session.lock().reset();
            document.task.clear_shown_execution_trace();
        }
        info!("debugging stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdb_common::types::{HeapGraph, StepRecord};

    use crate::graph::Step;

    const URI: &str = "file:///a.vpr";

    fn log() -> ProofLog {
        ProofLog {
            steps: vec![
                StepRecord::new(0, None)
                    .decorated()
                    .in_method("a.vpr", "method", "m", 0)
                    .with_conditions(["x > 0"]),
                StepRecord::new(0, Some(0))
                    .decorated()
                    .in_method("a.vpr", "method", "m", 0)
                    .with_conditions(["x > 0", "y > 0"]),
            ],
            diagnostics: Vec::new(),
        }
    }

    fn coordinator() -> DebugCoordinator {
        let coordinator = DebugCoordinator::default();
        coordinator.file_opened(URI);
        coordinator.on_verification_complete(URI, log());
        coordinator
    }

    #[test]
    fn test_file_lifecycle() {
        let coordinator = DebugCoordinator::default();
        assert!(coordinator.file_opened(URI));
        assert!(!coordinator.file_opened(URI));
        assert_eq!(coordinator.documents(), vec![URI.to_string()]);
        assert!(coordinator.file_closed(URI));
        assert!(!coordinator.file_closed(URI));
        assert!(!coordinator.reset_diagnostics(URI));
    }

    #[test]
    fn test_completion_after_close_is_discarded() {
        let coordinator = DebugCoordinator::default();
        coordinator.file_opened(URI);
        coordinator.file_closed(URI);

        assert!(!coordinator.on_verification_complete(URI, log()));
        assert!(coordinator.documents().is_empty());
        assert!(coordinator.task(URI).is_none());
        assert!(coordinator.get_execution_trace(URI, 0).is_empty());
    }

    #[test]
    fn test_requested_heap_image_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let config = DebugConfig { heap_image_dir: dir.path().join("heap"), ..Default::default() };
        let coordinator = DebugCoordinator::new(config);
        coordinator.file_opened(URI);
        coordinator.on_verification_complete(URI, log());

        assert!(coordinator.show_heap(URI, 0, true));
        let image = dir.path().join("heap").join("heap_0.svg");
        assert!(std::fs::read_to_string(&image).unwrap().starts_with("<svg"));
        let html = coordinator.render_heap_content(URI);
        assert!(html.contains(&format!("<img src=\"{}\">", image.display())));

        // without the heap the snapshot is stored but no image is produced
        assert!(coordinator.show_heap(URI, 1, false));
        assert!(!dir.path().join("heap").join("heap_1.svg").exists());
    }

    #[test]
    fn test_unwritable_image_dir_fails_the_request() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("file");
        std::fs::write(&blocked, "").unwrap();
        let coordinator =
            DebugCoordinator::new(DebugConfig { heap_image_dir: blocked, ..Default::default() });
        coordinator.file_opened(URI);
        coordinator.on_verification_complete(URI, log());

        assert!(!coordinator.show_heap(URI, 0, true));
        assert!(coordinator.heap_view(URI).is_empty());
    }

    #[test]
    fn test_trace_of_unknown_document_is_empty() {
        let coordinator = DebugCoordinator::default();
        assert!(coordinator.get_execution_trace(URI, 0).is_empty());
        assert!(!coordinator.show_heap(URI, 0, false));
        assert!(coordinator.render_heap_content(URI).contains("No graph to show"));
    }

    #[test]
    fn test_trace_respects_configuration() {
        let coordinator = coordinator();
        assert_eq!(coordinator.get_execution_trace(URI, 1).states(), vec![1, 0]);
        assert!(coordinator.get_execution_trace(URI, 7).is_empty());

        let mut config = coordinator.config();
        config.dark_graphs = true;
        coordinator.update_config(config);
        let trace = coordinator.get_execution_trace(URI, 1);
        assert!(trace.iter().all(|entry| entry.color.as_str() == "yellow"));
    }

    #[test]
    fn test_show_heap_alternates_slots() {
        let coordinator = coordinator();
        assert!(coordinator.heap_view(URI).is_empty());

        assert!(coordinator.show_heap(URI, 0, false));
        assert!(matches!(coordinator.heap_view(URI), HeapView::Single(_)));

        let before = coordinator.heap_revision(URI).unwrap();
        assert!(coordinator.show_heap(URI, 1, false));
        assert!(coordinator.heap_revision(URI).unwrap() > before);

        let HeapView::Comparison { current, previous } = coordinator.heap_view(URI) else {
            panic!("expected two panels");
        };
        assert_eq!(current.state, 1);
        assert_eq!(previous.state, 0);
        assert_eq!(current.new_conditions().collect::<Vec<_>>(), vec!["y > 0"]);

        let html = coordinator.render_heap_content(URI);
        assert!(html.contains("<b>y > 0</b>"));
        assert!(html.contains("2 states in 1 verifiables, 2 shown"));
    }

    #[test]
    fn test_stop_debugging_keeps_the_run() {
        let coordinator = coordinator();
        coordinator.get_execution_trace(URI, 1);
        coordinator.show_heap(URI, 0, false);
        coordinator.stop_debugging();

        assert!(coordinator.heap_view(URI).is_empty());
        assert!(coordinator.task(URI).unwrap().shown_execution_trace().is_none());
        assert_eq!(coordinator.get_execution_trace(URI, 1).states(), vec![1, 0]);
    }

    #[test]
    fn test_new_run_resets_heap_state() {
        let coordinator = coordinator();
        coordinator.show_heap(URI, 0, false);
        coordinator.show_heap(URI, 1, false);

        coordinator.verification_started(URI).unwrap();
        assert!(coordinator.heap_view(URI).is_empty());
        assert!(coordinator.get_execution_trace(URI, 0).is_empty());

        coordinator.on_verification_complete(URI, log());
        assert!(coordinator.show_heap(URI, 0, false));
        assert!(matches!(coordinator.heap_view(URI), HeapView::Single(_)));
    }

    struct FailingHeap;

    impl HeapComputer for FailingHeap {
        fn compute_heap(&self, _: &Step, _: bool) -> Result<HeapGraph, DebugError> {
            Err(DebugError::HeapComputation("renderer crashed".into()))
        }
    }

    #[test]
    fn test_heap_collaborator_failure() {
        let coordinator =
            DebugCoordinator::with_heap_computer(DebugConfig::default(), Arc::new(FailingHeap));
        coordinator.file_opened(URI);
        coordinator.on_verification_complete(URI, log());
        assert!(!coordinator.show_heap(URI, 0, false));
        assert!(coordinator.heap_view(URI).is_empty());
    }
}
