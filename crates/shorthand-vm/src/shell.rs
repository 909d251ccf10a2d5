//! Shell command capture.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{Result, ShellFailure, ShorthandError};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Run `command` through `shell -c` and return its standard output.
///
/// A non-zero exit status is an error carrying the captured stderr.
pub fn run_shell(shell: &str, command: &str, timeout: Option<Duration>) -> Result<String> {
    debug!(shell, command, ?timeout, "running shell command");
    let fail = |source| ShorthandError::ShellExec {
        command: command.to_string(),
        source,
    };

    let mut cmd = Command::new(shell);
    cmd.arg("-c").arg(command).stdin(Stdio::null());

    let (status, stdout, stderr) = match timeout {
        None => {
            let output = cmd.output().map_err(|e| fail(ShellFailure::Spawn(e)))?;
            (output.status, output.stdout, output.stderr)
        }
        Some(limit) => {
            let child = cmd
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(|e| fail(ShellFailure::Spawn(e)))?;
            wait_with_timeout(child, limit).map_err(fail)?
        }
    };

    if !status.success() {
        return Err(fail(ShellFailure::Status {
            code: status.code(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        }));
    }
    Ok(String::from_utf8_lossy(&stdout).into_owned())
}

fn wait_with_timeout(
    mut child: Child,
    limit: Duration,
) -> std::result::Result<(ExitStatus, Vec<u8>, Vec<u8>), ShellFailure> {
    // Drain both pipes while waiting so a chatty command cannot block on a full pipe.
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let deadline = Instant::now() + limit;
    let status = loop {
        match child.try_wait().map_err(ShellFailure::Wait)? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                // The child may exit between try_wait and kill; either way it is gone.
                let _ = child.kill();
                let _ = child.wait();
                // Background processes started by the command can keep the pipes
                // open. The readers are detached and finish when the last writer exits.
                drop(stdout);
                drop(stderr);
                debug!(?limit, "shell command timed out");
                return Err(ShellFailure::TimedOut(limit));
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    };

    Ok((status, collect(stdout)?, collect(stderr)?))
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(
    handle: Option<thread::JoinHandle<std::io::Result<Vec<u8>>>>,
) -> std::result::Result<Vec<u8>, ShellFailure> {
    match handle {
        None => Ok(Vec::new()),
        Some(handle) => handle
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("output reader panicked")))
            .map_err(ShellFailure::Wait),
    }
}
