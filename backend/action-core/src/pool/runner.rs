use crate::error::exec::ExecError;
use crate::{LINK_ENV, SHELL, SHELL_COMMAND_FLAG};

use common::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;
use std::process::Stdio;

use futures_util::future::BoxFuture;
use log::{debug, trace};
use tokio::process::Command as TokioCommand;

/// How a script process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptExit {
    code: Option<i32>,
}

impl ScriptExit {
    /// `None` means the process was terminated by a signal.
    pub fn from_code(code: Option<i32>) -> Self {
        Self { code }
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl Display for ScriptExit {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        match self.code {
            Some(code) => write!(formatter, "exit code {code}"),
            None => write!(formatter, "no exit code (terminated by signal)"),
        }
    }
}

/// Runs one script body with the caller's data value.
pub trait ScriptRunner: Send + Sync + 'static {
    fn run<'a>(&'a self, script: &'a str, link: &'a str)
    -> BoxFuture<'a, Result<ScriptExit, ExecError>>;
}

/// Runs scripts through `sh -c` with `LINK` in the environment.
///
/// The child inherits the full host environment; stdin is closed and output
/// is captured into the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

pub(crate) fn build_script_command(script: &str, link: &str) -> TokioCommand {
    let mut cmd = TokioCommand::new(SHELL);
    cmd.arg(SHELL_COMMAND_FLAG)
        .arg(script)
        .env(LINK_ENV, link)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

impl ScriptRunner for ShellRunner {
    fn run<'a>(
        &'a self,
        script: &'a str,
        link: &'a str,
    ) -> BoxFuture<'a, Result<ScriptExit, ExecError>> {
        Box::pin(async move {
            let output = build_script_command(script, link)
                .output()
                .await
                .map_err(|e| ExecError::Spawn {
                    message: format!("Failed to spawn {SHELL}: {e}"),
                    location: ErrorLocation::from(Location::caller()),
                    source: e,
                })?;

            for line in String::from_utf8_lossy(&output.stdout).lines() {
                trace!("Script stdout: {line}");
            }
            for line in String::from_utf8_lossy(&output.stderr).lines() {
                debug!("Script stderr: {line}");
            }

            Ok(ScriptExit::from_code(output.status.code()))
        })
    }
}
