//! Worker process for process-mode batches
//!
//! Reads JSON-lines requests on stdin and answers on stdout. Logs go to
//! stderr, filtered by `RUST_LOG` (default `warn`).

use std::io::{self, BufWriter};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let stdin = io::stdin().lock();
    let stdout = BufWriter::new(io::stdout().lock());

    match slugline_engine::worker::serve(stdin, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("worker stopped: {e}");
            ExitCode::FAILURE
        }
    }
}
