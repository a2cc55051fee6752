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

//! Configuration for the debugging engine
//!
//! Settings are persisted as TOML (by default in `~/.vdb.toml`) and resolved
//! into explicit per-request parameters before they reach any algorithm.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Only show the explained execution path, hiding expansion and top-level states
    pub simple_mode: bool,
    /// Use the dark variant of the state colors
    pub dark_graphs: bool,
    /// Directory heap images are written into
    pub heap_image_dir: PathBuf,
    /// How long to wait for a running verification to stop, in milliseconds
    pub stop_timeout_ms: u64,
    /// Port of the JSON-RPC server
    pub rpc_port: u16,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            simple_mode: true,
            dark_graphs: false,
            heap_image_dir: std::env::temp_dir().join("vdb-heap"),
            stop_timeout_ms: 5_000,
            rpc_port: 3000,
        }
    }
}

impl DebugConfig {
    /// Get the default config file path (~/.vdb.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home =
            dirs::home_dir().ok_or_else(|| eyre::eyre!("Unable to determine home directory"))?;
        Ok(home.join(".vdb.toml"))
    }

    /// Load configuration from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!("Config file not found at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path:?}"))?;

        let config: Self =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config to TOML")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {path:?}"))?;

        debug!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Resolve the settings that drive trace reconstruction
    pub fn trace_settings(&self) -> TraceSettings {
        TraceSettings {
            mode: if self.simple_mode { TraceMode::Simple } else { TraceMode::Advanced },
            dark: self.dark_graphs,
        }
    }

    /// Stop timeout as a [`Duration`]
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

/// Which states a trace explains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceMode {
    /// Only the path leading to the requested state
    #[default]
    Simple,
    /// The path plus expansion and top-level states of the verifiable
    Advanced,
}

/// Settings of a single trace request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceSettings {
    /// Trace mode
    pub mode: TraceMode,
    /// Whether the dark color variants are used
    pub dark: bool,
}
