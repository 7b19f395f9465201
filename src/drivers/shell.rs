//! Platform shell driver: pipes the block's script to the interpreter's
//! stdin so multi-line scripts and embedded quoting work unmodified.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::execution::{ExecOptions, ExecutionResult};
use crate::process::ProcessSpec;

use super::{effective_timeout, effective_workdir, run_contract, Driver, Flavor, DEFAULT_TIMEOUT};

pub struct ShellDriver {
    workdir: Option<PathBuf>,
    timeout: Duration,
}

impl ShellDriver {
    pub fn new() -> Self {
        Self {
            workdir: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_defaults(workdir: Option<PathBuf>, timeout: Duration) -> Self {
        Self { workdir, timeout }
    }
}

impl Default for ShellDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Driver for ShellDriver {
    fn name(&self) -> &str {
        "shell"
    }

    async fn execute(
        &self,
        cancel: &CancellationToken,
        code: &str,
        opts: &ExecOptions,
    ) -> ExecutionResult {
        let (program, args) = shell_program();
        let spec = ProcessSpec::new(program, effective_timeout(opts, self.timeout))
            .args(args)
            .workdir(effective_workdir(opts, &self.workdir));
        let (result, _) = run_contract(&spec, code, cancel, Flavor::Command).await;
        result
    }
}

/// Resolve the platform command interpreter.
///
/// On Windows: PowerShell when PSModulePath suggests it (reading the
/// script from stdin via `-Command -`), otherwise cmd.exe. On unix-like
/// systems: `$SHELL`, falling back to /bin/sh.
fn shell_program() -> (String, Vec<String>) {
    if cfg!(windows) {
        let prefer_ps = !std::env::var("PSModulePath").unwrap_or_default().is_empty();
        if prefer_ps {
            (
                "powershell.exe".to_string(),
                vec![
                    "-NoLogo".to_string(),
                    "-NoProfile".to_string(),
                    "-Command".to_string(),
                    "-".to_string(),
                ],
            )
        } else {
            ("cmd.exe".to_string(), Vec::new())
        }
    } else {
        let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".into());
        (shell, Vec::new())
    }
}
