//! Bounded execution of the repository tool

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

use super::LookupError;

/// Timeout for collecting output from child process pipes
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum captured output per stream (10MB)
const MAX_OUTPUT_SIZE: usize = 10 * 1024 * 1024;

/// Maximum stderr characters carried into a lookup error
const MAX_STDERR_EXCERPT: usize = 400;

/// Captured result of one tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub success: bool,
    pub timed_out: bool,
    pub duration: Duration,
}

impl ToolOutput {
    /// Stdout of a successful run, or the matching lookup error
    pub fn into_stdout(self, timeout: Duration) -> Result<String, LookupError> {
        if self.timed_out {
            return Err(LookupError::TimedOut {
                secs: timeout.as_secs(),
            });
        }
        if !self.success {
            return Err(LookupError::Failed {
                exit_code: self.exit_code,
                stderr: excerpt(&self.stderr),
            });
        }
        Ok(self.stdout)
    }
}

/// Run `program args...` directly (no shell), killing it after `timeout`.
///
/// Pipes are drained on reader threads while waiting, otherwise a child that
/// fills the pipe buffer would block forever on write().
pub fn run_tool(program: &str, args: &[&str], timeout: Duration) -> Result<ToolOutput, LookupError> {
    let start = Instant::now();
    let command_line = format!("{program} {}", args.join(" "));

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| LookupError::Spawn {
            command: command_line.clone(),
            source,
        })?;

    let (stdout_tx, stdout_rx) = mpsc::channel();
    let (stderr_tx, stderr_rx) = mpsc::channel();

    if let Some(stdout) = child.stdout.take() {
        thread::spawn(move || {
            let _ = stdout_tx.send(read_stream_to_string(stdout));
        });
    } else {
        let _ = stdout_tx.send(String::new());
    }

    if let Some(stderr) = child.stderr.take() {
        thread::spawn(move || {
            let _ = stderr_tx.send(read_stream_to_string(stderr));
        });
    } else {
        let _ = stderr_tx.send(String::new());
    }

    let wait_result = match child.wait_timeout(timeout) {
        Ok(result) => result,
        Err(source) => {
            kill_child_process(&mut child);
            return Err(LookupError::Wait {
                command: command_line,
                source,
            });
        }
    };

    let timed_out = wait_result.is_none();
    if timed_out {
        tracing::warn!(command = %command_line, secs = timeout.as_secs(), "lookup timed out, killing");
        kill_child_process(&mut child);
    }

    let stdout = stdout_rx
        .recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
        .unwrap_or_else(|_| "[output collection timed out]".to_string());
    let stderr = stderr_rx
        .recv_timeout(OUTPUT_COLLECTION_TIMEOUT)
        .unwrap_or_else(|_| "[output collection timed out]".to_string());

    let duration = start.elapsed();
    tracing::debug!(command = %command_line, ?duration, timed_out, "tool finished");

    Ok(ToolOutput {
        stdout,
        stderr,
        exit_code: wait_result.and_then(|status| status.code()),
        success: wait_result.is_some_and(|status| status.success()),
        timed_out,
        duration,
    })
}

/// Read a stream to string, capped at MAX_OUTPUT_SIZE.
///
/// Past the cap the stream is still drained so the child never sees a
/// broken pipe.
fn read_stream_to_string<R: Read>(mut stream: R) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                let remaining = MAX_OUTPUT_SIZE.saturating_sub(buf.len());
                let to_copy = n.min(remaining);
                buf.extend_from_slice(&chunk[..to_copy]);
                if to_copy < n {
                    let mut discard = [0u8; 8192];
                    while stream.read(&mut discard).unwrap_or(0) > 0 {}
                    buf.extend_from_slice(b"\n[output truncated at 10MB]");
                    break;
                }
            }
            Err(_) => {
                if buf.is_empty() {
                    return "[error reading output]".to_string();
                }
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

fn excerpt(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.chars().count() <= MAX_STDERR_EXCERPT {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(MAX_STDERR_EXCERPT).collect();
    format!("{head}...")
}

fn kill_child_process(child: &mut Child) {
    // The process may already have exited
    let _ = child.kill();
    let _ = child.wait();
}
