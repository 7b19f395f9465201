//! The `Driver` contract and the execution rules shared by every
//! process-based driver.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::execution::{ExecOptions, ExecutionResult};
use crate::process::{self, ProcessEnd, ProcessOutcome, ProcessSpec};

pub mod custom;
pub mod mysql;
pub mod postgres;
pub mod shell;
pub mod sqlite;

pub use custom::{register_custom_drivers, CustomDriver};
pub use mysql::MySqlDriver;
pub use postgres::PostgresDriver;
pub use shell::ShellDriver;
pub use sqlite::SqliteDriver;

/// Default deadline applied when neither the driver nor the call
/// configures one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Driver names that user configuration may never shadow.
pub const RESERVED_NAMES: &[&str] = &["shell", "sqlite", "mysql", "postgres"];

/// A named strategy for executing a code block.
///
/// Ordinary failures (non-zero exit, timeout, cancellation, missing
/// binary) are reported through the result, never as panics or errors.
/// Instances hold no mutable state, so one driver may serve overlapping
/// calls concurrently.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Stable registry key; also the `driver:` value written in code-block
    /// metadata.
    fn name(&self) -> &str;

    async fn execute(
        &self,
        cancel: &CancellationToken,
        code: &str,
        opts: &ExecOptions,
    ) -> ExecutionResult;
}

/// Error wording differs between plain command execution and database
/// queries so callers can word diagnostics naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flavor {
    Command,
    Query,
}

impl Flavor {
    fn timed_out(self) -> &'static str {
        match self {
            Flavor::Command => "execution timed out",
            Flavor::Query => "query execution timed out",
        }
    }

    fn canceled(self) -> &'static str {
        match self {
            Flavor::Command => "execution canceled",
            Flavor::Query => "query execution canceled",
        }
    }
}

/// Effective timeout: per-call override when valid, else the driver
/// default.
pub(crate) fn effective_timeout(opts: &ExecOptions, default: Duration) -> Duration {
    opts.timeout().unwrap_or(default)
}

/// Effective working directory: per-call override, else the driver's
/// configured default, else the inherited current directory.
pub(crate) fn effective_workdir(opts: &ExecOptions, default: &Option<PathBuf>) -> Option<PathBuf> {
    opts.workdir()
        .map(PathBuf::from)
        .or_else(|| default.clone())
}

/// Run the spec with `code` on stdin and map the outcome through the
/// uniform execution contract.
pub(crate) async fn run_contract(
    spec: &ProcessSpec,
    code: &str,
    cancel: &CancellationToken,
    flavor: Flavor,
) -> (ExecutionResult, Option<ProcessOutcome>) {
    match process::run(spec, code, cancel).await {
        Ok(outcome) => {
            let result = complete(&outcome, flavor);
            (result, Some(outcome))
        }
        Err(err) => (ExecutionResult::failure(format!("{err:#}")), None),
    }
}

fn complete(outcome: &ProcessOutcome, flavor: Flavor) -> ExecutionResult {
    let stdout = trim_trailing_newline(&outcome.stdout);
    match &outcome.end {
        ProcessEnd::Exited(status) if status.success() => {
            let mut output = stdout.to_string();
            // Non-fatal diagnostics (deprecation notices and the like)
            // stay visible.
            if !outcome.stderr.trim().is_empty() {
                if !output.is_empty() {
                    output.push('\n');
                }
                output.push_str(trim_trailing_newline(&outcome.stderr));
            }
            ExecutionResult::ok(output)
        }
        ProcessEnd::Exited(status) => {
            let stderr = outcome.stderr.trim();
            let error = if stderr.is_empty() {
                format!("process exited with code {}", status.code().unwrap_or(-1))
            } else {
                stderr.to_string()
            };
            ExecutionResult {
                success: false,
                output: stdout.to_string(),
                error,
                data: None,
            }
        }
        ProcessEnd::TimedOut => ExecutionResult {
            success: false,
            output: stdout.to_string(),
            error: flavor.timed_out().to_string(),
            data: None,
        },
        ProcessEnd::Canceled => ExecutionResult {
            success: false,
            output: stdout.to_string(),
            error: flavor.canceled().to_string(),
            data: None,
        },
    }
}

fn trim_trailing_newline(text: &str) -> &str {
    text.strip_suffix('\n')
        .map(|t| t.strip_suffix('\r').unwrap_or(t))
        .unwrap_or(text)
}
