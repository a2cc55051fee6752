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

//! Execution trace reconstruction
//!
//! Given a client-visible state, the reconstructor walks the state graph
//! upwards and collects the states that explain how the verifier got there.
//!
//! The walk alternates between two relations: from a branch point it jumps
//! to the structural parent, skipping sibling branches entirely; from any
//! other state it steps to the creation-order predecessor so that the
//! intermediate statements of the same branch show up. Only states whose
//! depth does not exceed the shallowest depth emitted so far are reported.
//!
//! The walk assumes the states of one verifiable are contiguous in creation
//! order. When the proof log interleaves verifiables, the predecessor step
//! may cross into another method and intermediate states of a sibling branch
//! may be silently omitted. This is an accepted approximation.

use tracing::{debug, warn};
use vdb_common::types::{ExecutionTrace, StateColors, TraceEntry};

use crate::{
    config::{TraceMode, TraceSettings},
    error::DebugError,
    graph::Step,
    task::CompletedRun,
};

/// Build the trace explaining how the verifier reached `client_index`.
pub fn reconstruct_trace(
    run: &CompletedRun,
    client_index: usize,
    settings: TraceSettings,
) -> Result<ExecutionTrace, DebugError> {
    let graph = &run.graph;
    let target = run.server_step(client_index)?;
    let mut trace = ExecutionTrace::new();

    if settings.mode == TraceMode::Advanced {
        if let Some(verifiable) = graph.verifiable_of(target.index()) {
            let color = StateColors::uninteresting_state(settings.dark);
            let mut context = |step: &Step| {
                if let Some(state) = step.decoration_index() {
                    trace.push(TraceEntry { state, color: color.clone(), show_number: true });
                }
            };
            verifiable.for_all_expansion_states_with_decoration(target.index(), &mut context);
            for step in verifiable.top_level_states_with_decoration() {
                context(step);
            }
        }
    }

    let color = StateColors::interesting_state(settings.dark);
    let mut max_depth = target.depth();
    let mut current = target;
    loop {
        if current.can_be_shown_as_decoration() && current.depth() <= max_depth {
            max_depth = current.depth();
            if let Some(state) = current.decoration_index() {
                trace.push(TraceEntry { state, color: color.clone(), show_number: true });
            }
        }

        let next = if current.is_branch() {
            graph.parent(current.index())
        } else if current.parent().is_none() {
            break;
        } else {
            graph.predecessor_by_index(current.index())
        };

        match next {
            Some(next) if next.index() < current.index() => current = next,
            Some(next) => {
                let err = DebugError::MalformedGraph(format!(
                    "trace walk from step {} to {} does not move backwards",
                    current.index(),
                    next.index()
                ));
                warn!("{err}, stopping");
                break;
            }
            None => break,
        }
    }

    debug!(client_index, entries = trace.len(), "reconstructed execution trace");
    Ok(trace)
}
