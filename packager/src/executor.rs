//! External command execution for the archiving tool.
//!
//! Commands run through the [`CommandExecutor`] trait so the external
//! archiving backend can be exercised in tests without a real tool. The
//! system implementation captures stdout and stderr and enforces an optional
//! deadline, killing the child when it expires.

use crate::error::{PackagerError, Result};
use camino::Utf8Path;
use std::io::Read;
use std::process::{Child, Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

/// A single external command invocation.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Program to execute.
    pub program: &'a str,
    /// Arguments passed to the program.
    pub args: &'a [String],
    /// Working directory for the child process.
    pub working_dir: &'a Utf8Path,
    /// Deadline after which the child is killed; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Run the invocation to completion and return its captured output.
    ///
    /// A nonzero exit status is returned as a normal [`Output`]; callers
    /// decide how to treat it.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ArchiveTool`] if the program cannot be
    /// spawned, its output cannot be collected, or the deadline expires.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use camino::Utf8Path;
    /// use rtss_overlay_packager::executor::{CommandExecutor, Invocation, SystemCommandExecutor};
    ///
    /// let args = vec!["-v".to_owned()];
    /// let output = SystemCommandExecutor.run(&Invocation {
    ///     program: "zip",
    ///     args: &args,
    ///     working_dir: Utf8Path::new("."),
    ///     timeout: None,
    /// })?;
    /// assert!(output.status.success());
    /// # Ok::<(), rtss_overlay_packager::error::PackagerError>(())
    /// ```
    fn run(&self, invocation: &Invocation<'_>) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, invocation: &Invocation<'_>) -> Result<Output> {
        let tool_error = |message: String| PackagerError::ArchiveTool {
            tool: invocation.program.to_owned(),
            message,
        };

        let mut child = Command::new(invocation.program)
            .args(invocation.args)
            .current_dir(invocation.working_dir.as_std_path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| tool_error(format!("failed to start: {e}")))?;

        // Drain both pipes concurrently so a chatty tool cannot block on a
        // full pipe while we wait for it to exit.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match wait(&mut child, invocation.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                // A grandchild may still hold the pipes open, so joining the
                // readers could outlast the deadline. They are detached and
                // exit once the last writer closes.
                drop((stdout, stderr));
                let limit = invocation.timeout.unwrap_or_default();
                return Err(tool_error(format!("timed out after {limit:?}")));
            }
            Err(e) => return Err(tool_error(format!("failed to wait for exit: {e}"))),
        };

        Ok(Output {
            status,
            stdout: collect(stdout).map_err(|e| tool_error(format!("failed to read stdout: {e}")))?,
            stderr: collect(stderr).map_err(|e| tool_error(format!("failed to read stderr: {e}")))?,
        })
    }
}

fn wait(
    child: &mut Child,
    timeout: Option<Duration>,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    match timeout {
        Some(deadline) => child.wait_timeout(deadline),
        None => child.wait().map(Some),
    }
}

type Drain = Option<JoinHandle<std::io::Result<Vec<u8>>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Drain {
    pipe.map(|mut reader| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            reader.read_to_end(&mut buffer)?;
            Ok(buffer)
        })
    })
}

fn collect(handle: Drain) -> std::io::Result<Vec<u8>> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| std::io::Error::other("output reader thread panicked"))?,
        None => Ok(Vec::new()),
    }
}
