//! External archiving tool backend.
//!
//! The tool runs with the staging root as its working directory and receives
//! the archive path followed by the plugin directory name as its final two
//! positional arguments, so the archive's top-level entry is the plugin
//! directory. The archive path is made absolute first because the working
//! directory changes.

use super::{ArchiveReport, ArchiveRequest, Archiver, discard_partial};
use crate::config::ToolCommand;
use crate::error::{PackagerError, Result};
use crate::executor::{CommandExecutor, Invocation};
use camino::Utf8PathBuf;
use log::{debug, info};

/// Archives by running a command-line tool.
#[derive(Debug, Clone)]
pub struct ExternalArchiver<E> {
    command: ToolCommand,
    executor: E,
}

impl<E: CommandExecutor> ExternalArchiver<E> {
    /// Create an archiver that runs `command` through `executor`.
    #[must_use]
    pub fn new(command: ToolCommand, executor: E) -> Self {
        Self { command, executor }
    }

    /// Borrow the executor the tool runs through.
    #[must_use]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Return the full argument list for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::ArchiveTool`] if the archive path cannot be
    /// made absolute.
    pub fn arguments(&self, request: &ArchiveRequest) -> Result<Vec<String>> {
        let archive_path = absolute(&request.archive_path).map_err(|e| self.failure(e))?;
        let mut args = self.command.args.clone();
        args.push(archive_path.into_string());
        args.push(request.plugin_dir_name.clone());
        Ok(args)
    }

    fn failure(&self, message: impl Into<String>) -> PackagerError {
        PackagerError::ArchiveTool {
            tool: self.command.program.clone(),
            message: message.into(),
        }
    }

    fn run(&self, request: &ArchiveRequest) -> Result<ArchiveReport> {
        let args = self.arguments(request)?;
        debug!(
            "running {} {} in {}",
            self.command.program,
            args.join(" "),
            request.staging_root
        );

        let output = self.executor.run(&Invocation {
            program: &self.command.program,
            args: &args,
            working_dir: &request.staging_root,
            timeout: self.command.timeout,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let diagnostics = if stderr.trim().is_empty() {
                stdout.trim()
            } else {
                stderr.trim()
            };
            let mut message = format!("exited with {}", output.status);
            if !diagnostics.is_empty() {
                message.push_str(": ");
                message.push_str(diagnostics);
            }
            return Err(self.failure(message));
        }

        if !request.archive_path.is_file() {
            return Err(self.failure(format!(
                "exited successfully but did not produce {}",
                request.archive_path
            )));
        }

        info!("{} wrote {}", self.command.program, request.archive_path);
        Ok(ArchiveReport { stdout, stderr })
    }
}

impl<E: CommandExecutor> Archiver for ExternalArchiver<E> {
    fn label(&self) -> String {
        self.command.program.clone()
    }

    fn archive(&self, request: &ArchiveRequest) -> Result<ArchiveReport> {
        let result = self.run(request);
        if result.is_err() {
            discard_partial(&request.archive_path);
        }
        result
    }
}

fn absolute(path: &camino::Utf8Path) -> std::result::Result<Utf8PathBuf, String> {
    let absolute = std::path::absolute(path).map_err(|e| e.to_string())?;
    Utf8PathBuf::try_from(absolute).map_err(|e| e.to_string())
}
