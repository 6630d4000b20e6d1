//! Run a command with resolved variables in its environment

use crate::keys::is_valid_key;
use buildenv_core::{OutputList, EXEC_START_FAILED, FALLBACK_SHELL, SHELL_VAR};
use std::process::{Command, ExitStatus, Stdio};

/// Runs `<shell> -c <command>` with the current environment plus every
/// output whose key is a valid shell identifier
#[derive(Debug, Clone)]
pub struct ExecSink {
    /// Shell program and leading arguments, e.g. `["/usr/bin/env", "bash"]`
    shell: Vec<String>,
}

impl ExecSink {
    /// `$SHELL` when set, otherwise `/usr/bin/env bash`
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(SHELL_VAR) {
            Ok(shell) if !shell.is_empty() => Self::with_shell(shell),
            _ => Self {
                shell: FALLBACK_SHELL.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    #[must_use]
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: vec![shell.into()],
        }
    }

    #[must_use]
    pub fn shell(&self) -> &[String] {
        &self.shell
    }

    /// Run `command` and return its exit code, or `-1` if it never started
    #[must_use]
    pub fn run(&self, command: &str, outputs: &OutputList) -> i32 {
        let Some((program, args)) = self.shell.split_first() else {
            return EXEC_START_FAILED;
        };

        let mut cmd = Command::new(program);
        cmd.args(args)
            .arg("-c")
            .arg(command)
            .envs(
                outputs
                    .variables()
                    .filter(|output| is_valid_key(&output.key))
                    .map(|output| (output.key.as_str(), output.value.as_str())),
            )
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        tracing::debug!(shell = %program, command, "Running command");

        match cmd.status() {
            Ok(status) => exit_code(status),
            Err(e) => {
                tracing::error!(shell = %program, error = %e, "Failed to start command");
                EXEC_START_FAILED
            }
        }
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(EXEC_START_FAILED)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(EXEC_START_FAILED)
}
