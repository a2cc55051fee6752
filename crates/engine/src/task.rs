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

//! Per-document verification task
//!
//! A [`VerificationTask`] holds the last completed run of one document. The
//! run is built completely before it is swapped in, so concurrent readers
//! observe either the previous run or the new one.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use vdb_common::types::{Diagnostic, ExecutionTrace, ProofLog};

use crate::{
    config::TraceSettings,
    error::DebugError,
    graph::{StateGraph, Step, StepId},
    trace::reconstruct_trace,
};

/// Mapping from client-visible state numbers to server steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientStepIndex {
    steps: Vec<StepId>,
}

impl ClientStepIndex {
    /// Number every decoration-eligible step in creation order
    pub fn build(graph: &StateGraph) -> Self {
        let steps = graph
            .steps()
            .iter()
            .filter(|step| step.can_be_shown_as_decoration())
            .map(Step::index)
            .collect();
        Self { steps }
    }

    /// Server step of a client state
    pub fn get(&self, client_index: usize) -> Option<StepId> {
        self.steps.get(client_index).copied()
    }

    /// Number of client-visible states
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if no state is client-visible
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Server steps indexed by client state
    pub fn as_slice(&self) -> &[StepId] {
        &self.steps
    }
}

/// Everything a completed verification run leaves behind
#[derive(Debug, Clone, Default)]
pub struct CompletedRun {
    /// State graph of the run
    pub graph: StateGraph,
    /// Client numbering of the graph's displayable states
    pub client_steps: ClientStepIndex,
}

impl CompletedRun {
    /// Build a run from a parsed proof log
    pub fn new(log: ProofLog) -> Self {
        let graph = StateGraph::from_records(log.steps);
        let client_steps = ClientStepIndex::build(&graph);
        Self { graph, client_steps }
    }

    /// Resolve a client state to its step
    pub fn server_step(&self, client_index: usize) -> Result<&Step, DebugError> {
        self.client_steps.get(client_index).and_then(|id| self.graph.step(id)).ok_or(
            DebugError::UnknownClientState { index: client_index, total: self.client_steps.len() },
        )
    }
}

/// Verification state of one open document
#[derive(Debug)]
pub struct VerificationTask {
    uri: String,
    run: RwLock<Option<Arc<CompletedRun>>>,
    shown_execution_trace: RwLock<Option<ExecutionTrace>>,
    diagnostics: RwLock<Vec<Diagnostic>>,
}

impl VerificationTask {
    /// Create a task for a newly opened document
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            run: RwLock::new(None),
            shown_execution_trace: RwLock::new(None),
            diagnostics: RwLock::new(Vec::new()),
        }
    }

    /// Document the task belongs to
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The last completed run, if any
    pub fn run(&self) -> Option<Arc<CompletedRun>> {
        self.run.read().clone()
    }

    /// Swap in a freshly completed run and drop everything derived from the old one
    pub fn complete(&self, log: ProofLog) -> Arc<CompletedRun> {
        let diagnostics = log.diagnostics.clone();
        let run = Arc::new(CompletedRun::new(log));
        debug!(
            uri = %self.uri,
            steps = run.graph.len(),
            client_states = run.client_steps.len(),
            "verification run completed"
        );

        *self.run.write() = Some(run.clone());
        *self.shown_execution_trace.write() = None;
        *self.diagnostics.write() = diagnostics;
        run
    }

    /// Forget the completed run, e.g. when the document is re-verified
    pub fn invalidate(&self) {
        *self.run.write() = None;
        *self.shown_execution_trace.write() = None;
    }

    /// Reconstruct the execution trace leading to a client state and cache it
    pub fn execution_trace(
        &self,
        client_index: usize,
        settings: TraceSettings,
    ) -> Result<ExecutionTrace, DebugError> {
        let run = self.run().ok_or_else(|| DebugError::NoCompletedRun(self.uri.clone()))?;
        let trace = reconstruct_trace(&run, client_index, settings)?;
        self.cache_trace(&run, trace.clone());
        Ok(trace)
    }

    /// Cache a trace unless `run` was replaced while it was being built
    fn cache_trace(&self, run: &Arc<CompletedRun>, trace: ExecutionTrace) {
        let mut shown = self.shown_execution_trace.write();
        let current = self.run.read();
        if current.as_ref().is_some_and(|current| Arc::ptr_eq(current, run)) {
            *shown = Some(trace);
        } else {
            debug!(uri = %self.uri, "run replaced while building the trace, not caching it");
        }
    }

    /// The last trace handed out to the client
    pub fn shown_execution_trace(&self) -> Option<ExecutionTrace> {
        self.shown_execution_trace.read().clone()
    }

    /// Drop the cached trace
    pub fn clear_shown_execution_trace(&self) {
        *self.shown_execution_trace.write() = None;
    }

    /// Diagnostics reported by the last run
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.read().clone()
    }

    /// Remove all diagnostics of the document
    pub fn reset_diagnostics(&self) {
        self.diagnostics.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdb_common::types::{Position, StepRecord};

    fn log() -> ProofLog {
        ProofLog {
            steps: vec![
                StepRecord::new(0, None).decorated(),
                StepRecord::new(0, Some(0)),
                StepRecord::new(0, Some(0)).decorated(),
                StepRecord::new(0, Some(2)),
                StepRecord::new(0, Some(2)).decorated(),
            ],
            diagnostics: vec![Diagnostic {
                position: Position::new(1, 0),
                message: "assertion might fail".into(),
            }],
        }
    }

    #[test]
    fn test_client_index_assignment() {
        let run = CompletedRun::new(log());
        assert_eq!(run.client_steps.as_slice(), &[0, 2, 4]);

        let decorated =
            run.graph.steps().iter().filter(|step| step.can_be_shown_as_decoration()).count();
        assert_eq!(run.client_steps.len(), decorated);

        // client numbering and decoration indices agree
        for (client, &step) in run.client_steps.as_slice().iter().enumerate() {
            assert_eq!(run.graph.step(step).unwrap().decoration_index(), Some(client));
        }
    }

    #[test]
    fn test_unknown_client_state() {
        let run = CompletedRun::new(log());
        let err = run.server_step(3).unwrap_err();
        assert!(matches!(err, DebugError::UnknownClientState { index: 3, total: 3 }));
    }

    #[test]
    fn test_complete_and_invalidate() {
        let task = VerificationTask::new("file:///a.vpr");
        assert!(task.run().is_none());
        assert!(matches!(
            task.execution_trace(0, TraceSettings::default()),
            Err(DebugError::NoCompletedRun(_))
        ));

        task.complete(log());
        assert_eq!(task.diagnostics().len(), 1);
        let trace = task.execution_trace(2, TraceSettings::default()).unwrap();
        assert_eq!(task.shown_execution_trace(), Some(trace));

        task.invalidate();
        assert!(task.run().is_none());
        assert!(task.shown_execution_trace().is_none());
        // diagnostics survive until explicitly reset
        assert_eq!(task.diagnostics().len(), 1);
        task.reset_diagnostics();
        assert!(task.diagnostics().is_empty());
    }

    #[test]
    fn test_trace_of_replaced_run_is_not_cached() {
        let task = VerificationTask::new("file:///a.vpr");
        task.complete(log());
        let old = task.run().unwrap();
        let trace = reconstruct_trace(&old, 2, TraceSettings::default()).unwrap();

        task.complete(log());
        task.cache_trace(&old, trace.clone());
        assert!(task.shown_execution_trace().is_none());

        task.cache_trace(&task.run().unwrap(), trace.clone());
        assert_eq!(task.shown_execution_trace(), Some(trace));
    }

    #[test]
    fn test_readers_keep_their_run() {
        let task = VerificationTask::new("file:///a.vpr");
        task.complete(log());
        let old = task.run().unwrap();

        task.complete(ProofLog::default());
        assert_eq!(old.graph.len(), 5);
        assert_eq!(task.run().unwrap().graph.len(), 0);
    }
}
