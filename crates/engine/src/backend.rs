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

//! Backend replaying recorded proof logs
//!
//! For a document `file:///path/to/a.vpr` the proof log is read from
//! `/path/to/a.vpr.proof.json`.

use std::path::PathBuf;

use eyre::{bail, eyre, Context, Result};
use tracing::debug;
use vdb_common::types::ProofLog;

use crate::scheduler::{StopSignal, VerificationBackend};

/// Extension appended to a source file to locate its proof log
pub const PROOF_LOG_EXTENSION: &str = "proof.json";

/// Path of the proof log recorded for a document uri
pub fn proof_log_path(uri: &str) -> Result<PathBuf> {
    let path = uri.strip_prefix("file://").ok_or_else(|| eyre!("Not a file uri: {uri}"))?;
    if path.is_empty() {
        bail!("Empty file uri");
    }
    Ok(PathBuf::from(format!("{path}.{PROOF_LOG_EXTENSION}")))
}

/// Read and parse a proof log file
pub async fn read_proof_log(path: &std::path::Path) -> Result<ProofLog> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read proof log: {path:?}"))?;
    ProofLog::from_json(&content).with_context(|| format!("Failed to parse proof log: {path:?}"))
}

/// Verification backend serving proof logs recorded next to the sources
#[derive(Debug, Clone, Copy, Default)]
pub struct ProofLogBackend;

impl VerificationBackend for ProofLogBackend {
    fn is_ready(&self) -> bool {
        true
    }

    async fn verify(
        &self,
        uri: &str,
        _manually_triggered: bool,
        mut stop: StopSignal,
    ) -> Result<ProofLog> {
        let path = proof_log_path(uri)?;
        debug!(?path, "replaying proof log");
        tokio::select! {
            _ = stop.stopped() => bail!("verification of {uri} stopped"),
            log = read_proof_log(&path) => log,
        }
    }
}
