//! SQLite driver: shells out to sqlite3 in header + column mode.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::execution::{ExecOptions, ExecutionResult};
use crate::process::ProcessSpec;
use crate::table;

use super::{effective_timeout, effective_workdir, run_contract, Driver, Flavor, DEFAULT_TIMEOUT};

/// `database` selects the file to open; without one an in-memory
/// instance is used, which is what slide demos usually want.
pub struct SqliteDriver {
    workdir: Option<PathBuf>,
    timeout: Duration,
}

impl SqliteDriver {
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

impl Default for SqliteDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Driver for SqliteDriver {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn execute(
        &self,
        cancel: &CancellationToken,
        code: &str,
        opts: &ExecOptions,
    ) -> ExecutionResult {
        let database = opts.database().unwrap_or(":memory:");
        let spec = ProcessSpec::new("sqlite3", effective_timeout(opts, self.timeout))
            .arg("-header")
            .arg("-column")
            .arg(database)
            .workdir(effective_workdir(opts, &self.workdir));

        // sqlite3 errors carry no credentials, so no masking here.
        let (mut result, outcome) = run_contract(&spec, code, cancel, Flavor::Query).await;
        if result.success {
            if let Some(outcome) = outcome {
                result.data = table::parse_column(&outcome.stdout);
            }
        }
        result
    }
}
