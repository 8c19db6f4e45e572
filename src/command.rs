use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// An external command could not be run to completion.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn {program} {args:?}: {source}")]
    Spawn {
        program: String,
        args: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} {args:?} exited with {status}")]
    Failed {
        program: String,
        args: Vec<String>,
        status: std::process::ExitStatus,
    },
}

impl CommandError {
    fn spawn(program: &str, args: &[&str], source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            source,
        }
    }

    fn failed(program: &str, args: &[&str], status: std::process::ExitStatus) -> Self {
        Self::Failed {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            status,
        }
    }
}

/// Boundary to the external command-line tools this program drives.
///
/// Implementations run a program, capture its stdout as text, and surface
/// spawn failures and non-zero exits as [`CommandError`]. Tests substitute a
/// scripted fake so no real process is involved.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion and capture its stdout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<String, CommandError>;

    /// Run a command, feeding `input` to its stdin before capturing stdout.
    async fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> Result<String, CommandError>;
}

pub type SharedRunner = Arc<dyn CommandRunner>;

/// Real runner over `tokio::process`.
///
/// Children are spawned kill-on-drop, so a caller that bounds `run` with a
/// deadline and abandons the future also reaps the subprocess. That is what
/// keeps a `bluetoothctl scan on` invocation, which never exits on its own,
/// confined to its window.
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<String, CommandError> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| CommandError::spawn(program, args, e))?;

        if !output.status.success() {
            return Err(CommandError::failed(program, args, output.status));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> Result<String, CommandError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CommandError::spawn(program, args, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input.as_bytes())
                .await
                .map_err(|e| CommandError::spawn(program, args, e))?;
            // Dropping stdin closes the pipe so the child sees EOF.
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| CommandError::spawn(program, args, e))?;

        if !output.status.success() {
            return Err(CommandError::failed(program, args, output.status));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
