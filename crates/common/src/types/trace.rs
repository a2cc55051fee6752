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

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::{Deref, DerefMut},
};

/// Color understood by the editor's decoration renderer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorToken(String);

impl ColorToken {
    /// Create a color token from a CSS color name or hex literal
    pub fn new(color: impl Into<String>) -> Self {
        Self(color.into())
    }

    /// Get the underlying color literal
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Palette used for states shown in the source code and in the heap view.
///
/// Theme-dependent colors resolve to a light or dark variant depending on
/// the flag passed in by the caller.
pub struct StateColors;

impl StateColors {
    /// Heading color of the current heap panel
    pub const CURRENT_STATE: &'static str = "red";
    /// Heading color of the previous heap panel
    pub const PREVIOUS_STATE: &'static str = "green";

    /// Accent color for states on the explained execution path
    pub fn interesting_state(dark: bool) -> ColorToken {
        ColorToken::new(if dark { "yellow" } else { "orange" })
    }

    /// Muted color for context states
    pub fn uninteresting_state(dark: bool) -> ColorToken {
        ColorToken::new(if dark { "grey" } else { "darkgrey" })
    }
}

/// One state to highlight when explaining how the verifier reached a point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEntry {
    /// Client-visible state index
    pub state: usize,
    /// Decoration color
    pub color: ColorToken,
    /// Whether the client should print the state number next to the decoration
    pub show_number: bool,
}

/// Ordered list of states to highlight
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionTrace {
    inner: Vec<TraceEntry>,
}

impl Deref for ExecutionTrace {
    type Target = Vec<TraceEntry>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ExecutionTrace {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl ExecutionTrace {
    /// Create a new empty trace
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert trace to serde_json::Value for RPC serialization
    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Client states in emission order
    pub fn states(&self) -> Vec<usize> {
        self.inner.iter().map(|entry| entry.state).collect()
    }
}

impl From<Vec<TraceEntry>> for ExecutionTrace {
    fn from(inner: Vec<TraceEntry>) -> Self {
        Self { inner }
    }
}

impl IntoIterator for ExecutionTrace {
    type Item = TraceEntry;
    type IntoIter = std::vec::IntoIter<TraceEntry>;
    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExecutionTrace {
    type Item = &'a TraceEntry;
    type IntoIter = std::slice::Iter<'a, TraceEntry>;
    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
