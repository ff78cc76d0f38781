//! Invocation of the external snapshot service
//!
//! The service CLI is run once per generated config with the config path as
//! its last argument. The snapshot branch and the branch to compare against
//! are passed through the environment; everything else (service token,
//! proxies) is inherited from the parent process.

use crate::error::{Result, SnapshotError};
use crate::plan::strip_whitespace;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

pub const BRANCH_ENV: &str = "PERCY_BRANCH";
pub const TARGET_BRANCH_ENV: &str = "PERCY_TARGET_BRANCH";

/// A fully resolved command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        command
    }
}

/// Runs the snapshot service CLI
#[derive(Debug, Clone)]
pub struct SnapshotRunner {
    program: String,
    leading_args: Vec<String>,
}

impl SnapshotRunner {
    /// Build a runner from a command line such as `npx percy snapshot`
    ///
    /// The command line is split on whitespace, unless it names an existing
    /// file as a whole, in which case that file is run without extra
    /// arguments. Quoting is not supported.
    pub fn new(command_line: &str) -> Result<Self> {
        let whole = command_line.trim();
        if whole.contains(char::is_whitespace) && Path::new(whole).is_file() {
            return Ok(Self {
                program: whole.to_string(),
                leading_args: Vec::new(),
            });
        }

        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or_else(|| {
            SnapshotError::Config("snapshot command must not be empty".to_string())
        })?;

        Ok(Self {
            program,
            leading_args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// The command line and environment for one config
    pub fn invocation(&self, config_path: &Path, branch: &str, target_branch: &str) -> Invocation {
        let mut args = self.leading_args.clone();
        args.push(config_path.to_string_lossy().into_owned());

        Invocation {
            program: self.program.clone(),
            args,
            env: vec![
                (BRANCH_ENV.to_string(), strip_whitespace(branch)),
                (TARGET_BRANCH_ENV.to_string(), strip_whitespace(target_branch)),
            ],
        }
    }

    /// Run the service for one config and wait for it to exit
    pub async fn run(
        &self,
        doc: &str,
        config_path: &Path,
        branch: &str,
        target_branch: &str,
    ) -> Result<()> {
        let invocation = self.invocation(config_path, branch, target_branch);
        debug!(
            "Running {} {} ({}={:?}, {}={:?})",
            invocation.program,
            invocation.args.join(" "),
            BRANCH_ENV,
            invocation.env[0].1,
            TARGET_BRANCH_ENV,
            invocation.env[1].1
        );

        let status = invocation
            .command()
            .status()
            .await
            .map_err(|e| SnapshotError::SnapshotService {
                doc: doc.to_string(),
                message: format!("failed to run {}: {e}", invocation.program),
            })?;

        if !status.success() {
            return Err(SnapshotError::SnapshotService {
                doc: doc.to_string(),
                message: format!("{} exited with {status}", invocation.program),
            });
        }

        Ok(())
    }
}
