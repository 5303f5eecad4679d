//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use latian_app::Settings;

/// Activity logger driven by a turn-based dialog
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "latian")]
#[command(about = "Log exercise reps and timings over a terminal or WebSocket dialog")]
#[command(version)]
pub struct Args {
    /// Transport (std, ws)
    #[arg(short, long, default_value = "std")]
    pub io: String,

    /// Supervisor mode (simple, multi)
    #[arg(short, long, default_value = "simple")]
    pub runtime: String,

    /// Storage backend (file, memory)
    #[arg(short, long, default_value = "file")]
    pub storage: String,

    /// Directory holding per-user storage files
    #[arg(short = 'd', long, default_value = ".")]
    pub storage_dest: PathBuf,

    /// User of single-session mode
    #[arg(short, long, default_value = "default")]
    pub user: String,

    /// Address to bind the WebSocket endpoint to
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Port of the WebSocket endpoint
    #[arg(short, long, default_value_t = 5000)]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error), overridden by `RUST_LOG`
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Args {
    /// Settings handed to registry factories.
    pub fn settings(&self) -> Settings {
        Settings {
            io: self.io.clone(),
            runtime: self.runtime.clone(),
            storage: self.storage.clone(),
            storage_dest: self.storage_dest.clone(),
            user: self.user.clone(),
            bind: self.bind.clone(),
            port: self.port,
        }
    }
}
