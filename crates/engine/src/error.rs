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

//! Errors raised while serving debug queries.
//!
//! None of these cross the public entry points of the
//! [`DebugCoordinator`](crate::DebugCoordinator): they are logged and turned
//! into an empty trace, `false`, or a placeholder render.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while answering trace, heap or verification requests.
#[derive(Debug, Error)]
pub enum DebugError {
    /// No verification task is registered for the document
    #[error("no verification task found for {0}")]
    UnknownDocument(String),

    /// The document has no completed verification to debug
    #[error("no completed verification for {0}")]
    NoCompletedRun(String),

    /// The client state index does not map to a server step
    #[error("client state {index} not found (run has {total} states)")]
    UnknownClientState {
        /// Requested client state index
        index: usize,
        /// Number of client-visible states of the run
        total: usize,
    },

    /// A heap slot other than 0 or 1 was addressed
    #[error("invalid heap slot {0}")]
    InvalidHeapSlot(usize),

    /// The proof log describes an inconsistent state graph
    #[error("malformed state graph: {0}")]
    MalformedGraph(String),

    /// The heap collaborator failed to produce a snapshot
    #[error("failed to compute heap: {0}")]
    HeapComputation(String),

    /// The rendered heap image could not be written
    #[error("failed to write heap image {path:?}: {source}")]
    HeapImage {
        /// Destination of the image
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Another verification could not be stopped before starting a new one
    #[error("could not stop the running verifications")]
    ConcurrentVerificationConflict,

    /// The verification backend is not ready yet
    #[error("the verification backend is not ready yet")]
    BackendUnavailable,
}

impl DebugError {
    /// Whether the error denotes a missing task, step or heap graph
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::UnknownDocument(_)
                | Self::NoCompletedRun(_)
                | Self::UnknownClientState { .. }
                | Self::InvalidHeapSlot(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_failures() {
        assert!(DebugError::UnknownDocument("a".into()).is_lookup_failure());
        assert!(DebugError::UnknownClientState { index: 3, total: 2 }.is_lookup_failure());
        assert!(!DebugError::BackendUnavailable.is_lookup_failure());
        assert!(!DebugError::ConcurrentVerificationConflict.is_lookup_failure());
    }

    #[test]
    fn test_messages() {
        let err = DebugError::UnknownClientState { index: 3, total: 2 };
        assert_eq!(err.to_string(), "client state 3 not found (run has 2 states)");
    }
}
