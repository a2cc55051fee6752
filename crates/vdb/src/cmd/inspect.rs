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

//! Offline inspection of a recorded proof log
//!
//! The log is loaded into a fresh coordinator as if a verification of the
//! log file itself had just completed.

use std::path::Path;

use eyre::{bail, Context, Result};
use tracing::debug;
use vdb_common::types::ProofLog;
use vdb_engine::{DebugConfig, DebugCoordinator};

fn load(config: DebugConfig, log: &Path) -> Result<(DebugCoordinator, String)> {
    let content = std::fs::read_to_string(log)
        .with_context(|| format!("Failed to read proof log: {log:?}"))?;
    let proof_log = ProofLog::from_json(&content)
        .with_context(|| format!("Failed to parse proof log: {log:?}"))?;
    debug!("Loaded {} steps from {:?}", proof_log.len(), log);

    let absolute = std::path::absolute(log)?;
    let uri = format!("file://{}", absolute.display());
    let coordinator = DebugCoordinator::new(config);
    coordinator.file_opened(&uri);
    coordinator.on_verification_complete(&uri, proof_log);
    Ok((coordinator, uri))
}

fn check_state(coordinator: &DebugCoordinator, uri: &str, state: usize) -> Result<()> {
    let shown = coordinator
        .task(uri)
        .and_then(|task| task.run())
        .map(|run| run.client_steps.len())
        .unwrap_or_default();
    if state >= shown {
        bail!("State {state} out of range, the proof log has {shown} client-visible states");
    }
    Ok(())
}

/// Print the execution trace of `state` as JSON
pub fn print_trace(config: DebugConfig, log: &Path, state: usize) -> Result<()> {
    let (coordinator, uri) = load(config, log)?;
    check_state(&coordinator, &uri, state)?;

    let trace = coordinator.get_execution_trace(&uri, state);
    println!("{}", serde_json::to_string_pretty(&trace.to_json_value()?)?);
    Ok(())
}

/// Print the heap panel of `state`, optionally compared against `previous`
pub fn print_heap(
    config: DebugConfig,
    log: &Path,
    state: usize,
    previous: Option<usize>,
    with_heap: bool,
) -> Result<()> {
    let (coordinator, uri) = load(config, log)?;
    for index in previous.into_iter().chain(std::iter::once(state)) {
        check_state(&coordinator, &uri, index)?;
        if !coordinator.show_heap(&uri, index, with_heap) {
            bail!("Failed to compute the heap of state {index}");
        }
    }

    println!("{}", coordinator.render_heap_content(&uri));
    Ok(())
}
