//! MySQL driver: shells out to the mysql client in table mode.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::execution::{ExecOptions, ExecutionResult};
use crate::mask;
use crate::process::ProcessSpec;
use crate::table::{self, NullStyle};

use super::{effective_timeout, effective_workdir, run_contract, Driver, Flavor, DEFAULT_TIMEOUT};

pub struct MySqlDriver {
    workdir: Option<PathBuf>,
    timeout: Duration,
}

impl MySqlDriver {
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

impl Default for MySqlDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Driver for MySqlDriver {
    fn name(&self) -> &str {
        "mysql"
    }

    async fn execute(
        &self,
        cancel: &CancellationToken,
        code: &str,
        opts: &ExecOptions,
    ) -> ExecutionResult {
        let mut spec = ProcessSpec::new("mysql", effective_timeout(opts, self.timeout))
            .arg("--host")
            .arg(opts.host().unwrap_or("localhost"))
            .arg("--port")
            .arg(opts.port().unwrap_or("3306"))
            .arg("--table")
            .workdir(effective_workdir(opts, &self.workdir));
        if let Some(user) = opts.user() {
            spec = spec.arg("--user").arg(user);
        }
        if let Some(database) = opts.database() {
            spec = spec.arg("--database").arg(database);
        }
        // Never on the command line: it would show up in process
        // listings. The variable is scoped to the child only.
        if let Some(password) = opts.password() {
            spec = spec.env("MYSQL_PWD", password);
        }

        let (mut result, outcome) = run_contract(&spec, code, cancel, Flavor::Query).await;
        if result.success {
            if let Some(outcome) = outcome {
                result.data = table::parse_bordered(&outcome.stdout, NullStyle::MySql);
            }
        } else {
            result.error = mask::mask_credentials(&result.error, opts);
        }
        result
    }
}
