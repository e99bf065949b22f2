use std::io::{ErrorKind, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{trace, warn};

use crate::error::{ChartError, ChartResult};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug)]
pub(crate) struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Stdout on success; otherwise the trimmed stderr as a render failure.
    pub fn into_stdout(self, operation: &str) -> ChartResult<String> {
        if !self.status.success() {
            let stderr = self.stderr.trim();
            let detail = if stderr.is_empty() {
                "unknown error occurred"
            } else {
                stderr
            };
            return Err(ChartError::RenderFailure(format!(
                "{operation} exited with {}: {detail}",
                self.status
            )));
        }
        let stdout = self.stdout.trim();
        if stdout.is_empty() {
            return Err(ChartError::RenderFailure(format!(
                "{operation} produced no output"
            )));
        }
        Ok(stdout.to_owned())
    }
}

/// Runs `command` to completion or until `timeout`, whichever comes first.
///
/// Stdout and stderr are drained on helper threads so a chatty child never
/// blocks on a full pipe; `stdin_payload` is written from its own thread for
/// the same reason. On timeout the child is killed and reaped. The deadline
/// also covers draining: a descendant that keeps the pipes open after the
/// child exits still ends the call with `RenderTimeout`.
pub(crate) fn run_with_timeout(
    mut command: Command,
    stdin_payload: Option<Vec<u8>>,
    timeout: Duration,
    operation: &str,
) -> ChartResult<ProcessOutput> {
    command
        .stdin(if stdin_payload.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let started = Instant::now();
    let deadline = started
        .checked_add(timeout)
        .ok_or_else(|| ChartError::validation(format!("{operation} timeout is out of range")))?;

    let mut child = command.spawn().map_err(|e| match e.kind() {
        ErrorKind::ArgumentListTooLong => ChartError::RenderFailure(format!(
            "{operation} payload exceeds the OS argument size limit: {e}"
        )),
        _ => ChartError::GatewayUnavailable(format!(
            "failed to spawn {operation} ({}): {e}",
            command.get_program().to_string_lossy()
        )),
    })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());
    if let (Some(payload), Some(mut stdin)) = (stdin_payload, child.stdin.take()) {
        let bytes = payload.len();
        thread::spawn(move || {
            if let Err(e) = stdin.write_all(&payload) {
                trace!(error = %e, bytes, "child closed stdin before payload was written");
            }
        });
    }

    let timed_out = || {
        warn!(operation, timeout_ms = timeout.as_millis(), "subprocess timed out");
        ChartError::RenderTimeout {
            operation: operation.to_owned(),
            timeout_ms: timeout.as_millis(),
        }
    };
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(e) => {
                return Err(ChartError::RenderFailure(format!(
                    "failed waiting for {operation}: {e}"
                )));
            }
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(timed_out());
        }
        thread::sleep(POLL_INTERVAL);
    };

    let output = ProcessOutput {
        status,
        stdout: collect(stdout, deadline).map_err(|_| timed_out())?,
        stderr: collect(stderr, deadline).map_err(|_| timed_out())?,
    };
    trace!(
        operation,
        status = %output.status,
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        elapsed_ms = started.elapsed().as_millis(),
        "subprocess finished"
    );
    Ok(output)
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Receiver<String>> {
    pipe.map(|mut pipe| {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = pipe.read_to_end(&mut buffer);
            let _ = sender.send(String::from_utf8_lossy(&buffer).into_owned());
        });
        receiver
    })
}

/// Waits for a drained pipe until `deadline`; the reader thread is left
/// behind when the pipe is still held open at that point.
fn collect(
    receiver: Option<Receiver<String>>,
    deadline: Instant,
) -> Result<String, RecvTimeoutError> {
    let Some(receiver) = receiver else {
        return Ok(String::new());
    };
    match receiver.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(text) => Ok(text),
        Err(RecvTimeoutError::Disconnected) => Ok(String::new()),
        Err(RecvTimeoutError::Timeout) => Err(RecvTimeoutError::Timeout),
    }
}
