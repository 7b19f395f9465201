//! PostgreSQL driver: shells out to psql with bordered table output.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::execution::{ExecOptions, ExecutionResult};
use crate::mask;
use crate::process::ProcessSpec;
use crate::table::{self, NullStyle};

use super::{effective_timeout, effective_workdir, run_contract, Driver, Flavor, DEFAULT_TIMEOUT};

pub struct PostgresDriver {
    workdir: Option<PathBuf>,
    timeout: Duration,
}

impl PostgresDriver {
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

impl Default for PostgresDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Driver for PostgresDriver {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn execute(
        &self,
        cancel: &CancellationToken,
        code: &str,
        opts: &ExecOptions,
    ) -> ExecutionResult {
        // border=2 makes psql draw the same +---+ rules the mysql client
        // uses, so one bordered parser covers both.
        let mut spec = ProcessSpec::new("psql", effective_timeout(opts, self.timeout))
            .arg("--host")
            .arg(opts.host().unwrap_or("localhost"))
            .arg("--port")
            .arg(opts.port().unwrap_or("5432"))
            .arg("--no-psqlrc")
            .arg("--pset=border=2")
            .workdir(effective_workdir(opts, &self.workdir));
        if let Some(user) = opts.user() {
            spec = spec.arg("--username").arg(user);
        }
        if let Some(database) = opts.database() {
            spec = spec.arg("--dbname").arg(database);
        }
        if let Some(password) = opts.password() {
            spec = spec.env("PGPASSWORD", password);
        }

        let (mut result, outcome) = run_contract(&spec, code, cancel, Flavor::Query).await;
        if result.success {
            if let Some(outcome) = outcome {
                result.data = table::parse_bordered(&outcome.stdout, NullStyle::Postgres);
            }
        } else {
            result.error = mask::mask_credentials(&result.error, opts);
        }
        result
    }
}
