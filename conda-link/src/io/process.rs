//! Helpers for running OS commands and capturing bounded output.

use std::io::Read;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use tracing::{debug, error, instrument, warn};

use crate::error::{Error, Result};

/// Captured child process output.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Best diagnostic text for a failed command.
    ///
    /// Prefers stderr; `cmd` builtins sometimes report on stdout instead, so
    /// stdout is used when stderr is empty. Falls back to the exit status.
    pub fn diagnostic(&self) -> String {
        let stderr = String::from_utf8_lossy(&self.stderr);
        let stdout = String::from_utf8_lossy(&self.stdout);
        let (text, truncated) = if !stderr.trim().is_empty() {
            (stderr.trim().to_string(), self.stderr_truncated)
        } else if !stdout.trim().is_empty() {
            (stdout.trim().to_string(), self.stdout_truncated)
        } else {
            return format!("command exited with {}", self.status);
        };
        if truncated > 0 {
            format!("{text}\n[output truncated {truncated} bytes]")
        } else {
            text
        }
    }
}

/// Run a command to completion and capture stdout/stderr without risking pipe deadlocks.
///
/// Blocks until the child exits; there is no timeout. Output is read
/// concurrently while the child runs. `output_limit_bytes` bounds the amount of
/// stdout/stderr stored in memory (bytes beyond this are discarded while still
/// draining the pipe).
#[instrument(skip_all, fields(program = ?cmd.get_program(), output_limit_bytes))]
pub fn run_command(mut cmd: Command, output_limit_bytes: usize) -> Result<CommandOutput> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(args = ?cmd.get_args().collect::<Vec<_>>(), "spawning child process");
    let program = cmd.get_program().to_string_lossy().into_owned();
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, "failed to spawn command");
            return Err(Error::io(format!("spawn {program}"), e));
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::operation("capture output", "stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| Error::operation("capture output", "stderr was not piped"))?;

    let stdout_handle = thread::spawn(move || read_stream_limited(stdout, output_limit_bytes));
    let stderr_handle = thread::spawn(move || read_stream_limited(stderr, output_limit_bytes));

    let status = child
        .wait()
        .map_err(|e| Error::io(format!("wait for {program}"), e))?;

    let (stdout, stdout_truncated) = join_output(stdout_handle, "stdout")?;
    let (stderr, stderr_truncated) = join_output(stderr_handle, "stderr")?;

    if stdout_truncated > 0 || stderr_truncated > 0 {
        warn!(stdout_truncated, stderr_truncated, "output truncated");
    }

    debug!(exit_code = ?status.code(), "command finished");
    Ok(CommandOutput {
        status,
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
    })
}

fn join_output(
    handle: thread::JoinHandle<std::io::Result<(Vec<u8>, usize)>>,
    stream: &str,
) -> Result<(Vec<u8>, usize)> {
    match handle.join() {
        Ok(result) => result.map_err(|e| Error::io(format!("read {stream}"), e)),
        Err(_) => Err(Error::operation(
            "capture output",
            format!("{stream} reader thread panicked"),
        )),
    }
}

fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> std::io::Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        let remaining = limit.saturating_sub(buf.len());
        if remaining > 0 {
            let keep = n.min(remaining);
            buf.extend_from_slice(&chunk[..keep]);
            truncated += n.saturating_sub(keep);
        } else {
            truncated += n;
        }
    }

    Ok((buf, truncated))
}
