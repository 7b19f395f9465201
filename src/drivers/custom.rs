//! User-defined drivers: any external command that reads a program from
//! stdin can be registered under a presenter-chosen name.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::CustomDriverDef;
use crate::execution::{ExecOptions, ExecutionResult};
use crate::process::ProcessSpec;
use crate::registry::Registry;

use super::{
    effective_timeout, effective_workdir, run_contract, Driver, Flavor, DEFAULT_TIMEOUT,
    RESERVED_NAMES,
};

pub struct CustomDriver {
    name: String,
    command: String,
    args: Vec<String>,
    workdir: Option<PathBuf>,
    timeout: Duration,
}

impl CustomDriver {
    pub fn new(
        name: impl Into<String>,
        command: impl Into<String>,
        args: Vec<String>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            args,
            workdir: None,
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }
}

#[async_trait]
impl Driver for CustomDriver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(
        &self,
        cancel: &CancellationToken,
        code: &str,
        opts: &ExecOptions,
    ) -> ExecutionResult {
        let spec = ProcessSpec::new(&self.command, effective_timeout(opts, self.timeout))
            .args(self.args.iter().cloned())
            .workdir(effective_workdir(opts, &self.workdir));
        let (result, _) = run_contract(&spec, code, cancel, Flavor::Command).await;
        result
    }
}

/// Register one custom driver per definition, silently skipping entries
/// that would shadow a built-in or have no command. Callers can diff
/// `Registry::list` before and after to see what actually landed.
pub fn register_custom_drivers<'a, I>(registry: &Registry, defs: I)
where
    I: IntoIterator<Item = (&'a String, &'a CustomDriverDef)>,
{
    for (name, def) in defs {
        if RESERVED_NAMES.contains(&name.as_str()) {
            warn!(driver = %name, "skipping custom driver: name is reserved for a built-in");
            continue;
        }
        if def.command.is_empty() {
            warn!(driver = %name, "skipping custom driver: empty command");
            continue;
        }
        debug!(driver = %name, command = %def.command, "registering custom driver");
        registry.register(CustomDriver::new(
            name.clone(),
            def.command.clone(),
            def.args.clone(),
            def.timeout.map(Duration::from_secs),
        ));
    }
}
