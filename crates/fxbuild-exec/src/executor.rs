use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::error::ExecError;

/// Abstraction over child-process execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait CommandExecutor: Send + Sync {
    /// Run `program` and capture stdout.
    async fn exec(
        &self,
        program: &Path,
        args: &[String],
        envs: &[(String, String)],
    ) -> Result<String, ExecError>;

    /// Run `program`, streaming its output to the terminal.
    async fn exec_streaming(
        &self,
        program: &Path,
        args: &[String],
        envs: &[(String, String)],
    ) -> Result<(), ExecError>;
}

/// Spawns real processes in a fixed working directory.
///
/// `envs` are added on top of the inherited environment.
pub struct RealExecutor {
    working_dir: PathBuf,
}

impl RealExecutor {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }
}

impl CommandExecutor for RealExecutor {
    async fn exec(
        &self,
        program: &Path,
        args: &[String],
        envs: &[(String, String)],
    ) -> Result<String, ExecError> {
        let output = tokio::process::Command::new(program)
            .args(args)
            .envs(envs.iter().map(|(k, v)| (k, v)))
            .current_dir(&self.working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ExecError::NotFound {
                program: program.to_path_buf(),
                source: e,
            })?;

        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| ExecError::InvalidUtf8 {
                program: program.to_path_buf(),
                source: e,
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            Err(ExecError::CommandFailed {
                program: program.to_path_buf(),
                args: args.to_vec(),
                stderr,
            })
        }
    }

    async fn exec_streaming(
        &self,
        program: &Path,
        args: &[String],
        envs: &[(String, String)],
    ) -> Result<(), ExecError> {
        let status = tokio::process::Command::new(program)
            .args(args)
            .envs(envs.iter().map(|(k, v)| (k, v)))
            .current_dir(&self.working_dir)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ExecError::NotFound {
                program: program.to_path_buf(),
                source: e,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ExecError::CommandFailed {
                program: program.to_path_buf(),
                args: args.to_vec(),
                stderr: format!("exit code: {status}"),
            })
        }
    }
}
