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

//! Proof-log records describing the symbolic-execution states of a verification run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Zero-based position inside a source file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: u32,
    /// Character offset within the line (0-indexed)
    pub character: u32,
}

impl Position {
    /// Create a new position
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for Position {
    /// Positions are displayed 1-based, the way editors show them
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// A single symbolic-execution state as parsed from the backend's proof log.
///
/// The position of a record inside its [`ProofLog`] is its creation index.
/// Structural relations are expressed through indices only: `parent` points
/// at the state this one was derived from, while the creation-order
/// predecessor is simply the record right before it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    /// Index of the structural parent, if any
    #[serde(default)]
    pub parent: Option<usize>,
    /// Whether execution forks into multiple proof paths at this state
    #[serde(default)]
    pub is_branch: bool,
    /// Whether the state may be shown to the user as a decoration
    #[serde(default)]
    pub can_be_shown_as_decoration: bool,
    /// Index of the method/function under proof that produced this state
    #[serde(default)]
    pub verifiable: usize,
    /// Source file of the verifiable
    #[serde(default)]
    pub file_name: String,
    /// Name of the verifiable
    #[serde(default)]
    pub method_name: String,
    /// Kind of the verifiable (method, function, predicate)
    #[serde(default)]
    pub method_type: String,
    /// Index of the verifiable's first state
    #[serde(default)]
    pub method_offset: usize,
    /// Source position of the statement
    #[serde(default)]
    pub position: Position,
    /// Pretty-printed statement or formula being executed
    #[serde(default)]
    pub formula: Option<String>,
    /// Path conditions accumulated up to this state
    #[serde(default)]
    pub path_conditions: Vec<String>,
    /// Pretty-printed symbolic store entries
    #[serde(default)]
    pub store: Vec<String>,
    /// Pretty-printed symbolic heap chunks
    #[serde(default)]
    pub heap: Vec<String>,
}

impl StepRecord {
    /// Create a record belonging to `verifiable` with the given structural parent
    pub fn new(verifiable: usize, parent: Option<usize>) -> Self {
        Self { verifiable, parent, ..Default::default() }
    }

    /// Mark the record as a branch point
    pub fn branch(mut self) -> Self {
        self.is_branch = true;
        self
    }

    /// Mark the record as displayable
    pub fn decorated(mut self) -> Self {
        self.can_be_shown_as_decoration = true;
        self
    }

    /// Set the method the record belongs to
    pub fn in_method(
        mut self,
        file_name: impl Into<String>,
        method_type: impl Into<String>,
        method_name: impl Into<String>,
        method_offset: usize,
    ) -> Self {
        self.file_name = file_name.into();
        self.method_type = method_type.into();
        self.method_name = method_name.into();
        self.method_offset = method_offset;
        self
    }

    /// Set the source position
    pub fn at(mut self, line: u32, character: u32) -> Self {
        self.position = Position::new(line, character);
        self
    }

    /// Set the path conditions
    pub fn with_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path_conditions = conditions.into_iter().map(Into::into).collect();
        self
    }
}

/// Problem reported by the verifier for a source position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Where the problem was reported
    pub position: Position,
    /// Human-readable description
    pub message: String,
}

/// Parsed proof log of one completed verification run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofLog {
    /// States in creation order
    pub steps: Vec<StepRecord>,
    /// Verification errors of the run
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ProofLog {
    /// Parse a proof log from its JSON representation.
    ///
    /// Both a bare array of records and an object with a `steps` field are accepted.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bare(Vec<StepRecord>),
            Wrapped(ProofLog),
        }

        Ok(match serde_json::from_str(content)? {
            Repr::Bare(steps) => Self { steps, diagnostics: Vec::new() },
            Repr::Wrapped(log) => log,
        })
    }

    /// Number of states in the log
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
