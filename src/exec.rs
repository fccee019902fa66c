//! Bounded subprocess execution.
//!
//! Backend lookups shell out to `git` and `gh`. Both must never wedge the
//! polling flow, so every invocation gets a wall-clock bound. A command that
//! outruns its bound is reported as absent; the subprocess itself is
//! abandoned rather than killed.

use std::process::{Command, Output};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Bound for local git plumbing calls.
pub const BRANCH_TIMEOUT: Duration = Duration::from_secs(2);

/// Bound for network-backed gh calls.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Run a prepared command, waiting at most `timeout` for it to finish.
///
/// Returns `None` if the command could not be spawned, failed to produce
/// output, or did not finish within the bound.
pub fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Option<Output> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        // The receiver may be gone already if the caller timed out.
        let _ = tx.send(cmd.output());
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(output)) => Some(output),
        Ok(Err(_)) | Err(_) => None,
    }
}
