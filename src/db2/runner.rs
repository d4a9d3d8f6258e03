// ABOUTME: Runs commands through the db2 command line processor
// ABOUTME: Either streams output to the terminal or captures it to a scratch file

use super::statements::redact;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Something that can execute command line processor statements
///
/// Success is the process exit status; an `Err` means the command could not
/// be run at all.
#[allow(async_fn_in_trait)]
pub trait DbClient {
    /// Run `command`, output goes to the terminal
    async fn run(&mut self, command: &str) -> Result<bool>;

    /// Run `command`, stdout replaces the contents of [`DbClient::scratch_path`]
    async fn run_captured(&mut self, command: &str) -> Result<bool>;

    /// File holding the output of the last captured command
    fn scratch_path(&self) -> &Path;
}

/// The real `db2` command line processor
///
/// Each statement is a separate invocation; the processor's back-end process
/// keeps the connection alive between them, so connect, work, and
/// `connect reset` must all be issued from this same process.
#[derive(Debug, Clone)]
pub struct Db2Cli {
    program: String,
    scratch: PathBuf,
}

impl Db2Cli {
    pub fn new(program: impl Into<String>, scratch: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            scratch: scratch.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, command: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(command).stdin(Stdio::null());
        cmd
    }

    fn spawn_context(&self) -> String {
        format!(
            "Failed to execute {}. Is the DB2 client installed and its profile sourced \
             (e.g. '. ~db2inst1/sqllib/db2profile')?",
            self.program
        )
    }
}

impl DbClient for Db2Cli {
    async fn run(&mut self, command: &str) -> Result<bool> {
        tracing::debug!("{} \"{}\"", self.program, redact(command));

        let status = self
            .command(command)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| self.spawn_context())?;

        tracing::debug!("{} exited with {}", self.program, status);
        Ok(status.success())
    }

    async fn run_captured(&mut self, command: &str) -> Result<bool> {
        tracing::debug!(
            "{} \"{}\" > {}",
            self.program,
            redact(command),
            self.scratch.display()
        );

        let scratch = std::fs::File::create(&self.scratch).with_context(|| {
            format!("Failed to create scratch file {}", self.scratch.display())
        })?;

        let status = self
            .command(command)
            .stdout(Stdio::from(scratch))
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| self.spawn_context())?;

        tracing::debug!("{} exited with {}", self.program, status);
        Ok(status.success())
    }

    fn scratch_path(&self) -> &Path {
        &self.scratch
    }
}
