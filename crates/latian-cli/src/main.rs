//! `latian` binary.
//!
//! # Usage
//!
//! ```bash
//! # One session on this terminal for user "ana"
//! latian -u ana
//!
//! # Browser sessions for many users at http://localhost:5000
//! latian --io ws --runtime multi --port 5000
//! ```

use std::{io::Write, process::ExitCode};

use clap::Parser;
use latian_cli::{Args, init_logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let result = match init_logging(&args.log_level) {
        Ok(()) => run(args).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "latian failed");
            let _ = writeln!(std::io::stderr(), "latian: {err}");
            ExitCode::FAILURE
        },
    }
}
