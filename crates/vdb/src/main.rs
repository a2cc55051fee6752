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

//! VDB - Verification Debugger
//!
//! Step through the symbolic execution recorded by a program verifier.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use vdb_engine::DebugConfig;

mod cmd;

/// Command-line interface
#[derive(Debug, Parser)]
#[command(name = "vdb")]
#[command(about = "Verification Debugger - Step through the symbolic execution of a verifier")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: ~/.vdb.toml)
    #[arg(long, global = true, env = "VDB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the debugging protocol over JSON-RPC
    Serve {
        /// Port for the JSON-RPC server (default: from the configuration)
        #[arg(long)]
        port: Option<u16>,

        /// Also write logs to the temporary log directory
        #[arg(long)]
        log_file: bool,
    },
    /// Print the execution trace leading to a state of a proof log
    Trace {
        /// Proof log recorded by the verifier
        #[arg(long)]
        log: PathBuf,

        /// Client-visible state index
        #[arg(long)]
        state: usize,

        /// Include expansion and top-level states
        #[arg(long)]
        advanced: bool,

        /// Use the dark color variants
        #[arg(long)]
        dark: bool,
    },
    /// Print the heap panel of a state of a proof log as HTML
    Heap {
        /// Proof log recorded by the verifier
        #[arg(long)]
        log: PathBuf,

        /// Client-visible state index
        #[arg(long)]
        state: usize,

        /// State to compare against
        #[arg(long)]
        previous: Option<usize>,

        /// Request the heap graph along with the path conditions
        #[arg(long)]
        with_heap: bool,
    },
}

impl Cli {
    /// Resolve the engine configuration
    pub fn load_config(&self) -> Result<DebugConfig> {
        match &self.config {
            Some(path) => DebugConfig::load_from(path),
            None => DebugConfig::load(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    match &cli.command {
        Commands::Serve { port, log_file } => {
            vdb_common::logging::init_logging("vdb", *log_file)?;
            let mut config = cli.load_config()?;
            if let Some(port) = port {
                config.rpc_port = *port;
            }
            cmd::serve::run(config).await
        }
        Commands::Trace { log, state, advanced, dark } => {
            vdb_common::logging::init_simple_logging(tracing::Level::WARN)?;
            let mut config = cli.load_config()?;
            config.simple_mode = !*advanced;
            config.dark_graphs |= *dark;
            cmd::inspect::print_trace(config, log, *state)
        }
        Commands::Heap { log, state, previous, with_heap } => {
            vdb_common::logging::init_simple_logging(tracing::Level::WARN)?;
            let config = cli.load_config()?;
            cmd::inspect::print_heap(config, log, *state, *previous, *with_heap)
        }
    }
}
