//! Utility functions for cnb-mcp
//! Child process execution with a hard timeout, used by the curl transport.

use std::ffi::OsStr;
use std::io::Read;
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Default timeout for a single MCP call (30 seconds)
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of running a command with timeout
#[derive(Debug)]
pub enum CommandResult {
    /// Command exited with status 0
    Success(Output),
    /// Command exited with a non-zero status
    Failed(Output),
    /// Command timed out and was killed
    TimedOut,
    /// Command could not be started
    SpawnError(String),
}

impl CommandResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Success(_))
    }

    /// Get the output if the command completed (success or failure)
    pub fn output(&self) -> Option<&Output> {
        match self {
            CommandResult::Success(o) | CommandResult::Failed(o) => Some(o),
            _ => None,
        }
    }

    pub fn stdout_string(&self) -> Option<String> {
        self.output()
            .map(|o| String::from_utf8_lossy(&o.stdout).to_string())
    }

    pub fn stderr_string(&self) -> Option<String> {
        self.output()
            .map(|o| String::from_utf8_lossy(&o.stderr).to_string())
    }
}

/// Drain a child pipe on its own thread so a full pipe never stalls the child
fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

/// Run a command with a timeout
///
/// Stdout and stderr are captured while the child runs. Stdin is closed so
/// the child can never block waiting for input. A child still running when
/// `timeout` expires is killed and reaped.
pub fn run_command_with_timeout<S, A>(cmd: S, args: &[A], timeout: Duration) -> CommandResult
where
    S: AsRef<OsStr>,
    A: AsRef<OsStr>,
{
    let cmd = cmd.as_ref();
    let mut child = match Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(c) => c,
        Err(e) => {
            return CommandResult::SpawnError(format!(
                "Failed to start '{}': {}",
                cmd.to_string_lossy(),
                e
            ))
        }
    };

    let stdout_reader = spawn_reader(child.stdout.take());
    let stderr_reader = spawn_reader(child.stderr.take());

    match child.wait_timeout(timeout) {
        Ok(Some(status)) => {
            let output = Output {
                status,
                stdout: stdout_reader.join().unwrap_or_default(),
                stderr: stderr_reader.join().unwrap_or_default(),
            };

            if status.success() {
                CommandResult::Success(output)
            } else {
                CommandResult::Failed(output)
            }
        }
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait(); // Reap the zombie process
            // Readers are not joined: a grandchild may still hold the pipes open
            CommandResult::TimedOut
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            CommandResult::SpawnError(format!(
                "Failed to wait for '{}': {}",
                cmd.to_string_lossy(),
                e
            ))
        }
    }
}
