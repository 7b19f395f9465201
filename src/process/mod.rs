//! Child process execution with stdin piping, full output capture, and a
//! deadline/cancellation race.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What to launch and under which limits.
#[derive(Debug, Clone)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Environment variables scoped to the child only (e.g. `MYSQL_PWD`).
    pub envs: Vec<(String, String)>,
    pub workdir: Option<PathBuf>,
    pub timeout: Duration,
}

impl ProcessSpec {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            workdir: None,
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    pub fn workdir(mut self, dir: Option<impl Into<PathBuf>>) -> Self {
        self.workdir = dir.map(Into::into);
        self
    }
}

/// How the child ended.
#[derive(Debug)]
pub enum ProcessEnd {
    Exited(ExitStatus),
    TimedOut,
    Canceled,
}

/// Captured streams plus the way the child ended. stdout/stderr hold
/// whatever was written before exit or termination.
#[derive(Debug)]
pub struct ProcessOutcome {
    pub end: ProcessEnd,
    pub stdout: String,
    pub stderr: String,
}

/// Run `spec.program`, feed `input` to its stdin, and wait for exit,
/// deadline, or cancellation, whichever comes first. Timeout and
/// cancellation kill the child. `Err` only when the process cannot be
/// launched at all.
pub async fn run(spec: &ProcessSpec, input: &str, cancel: &CancellationToken) -> Result<ProcessOutcome> {
    debug!(program = %spec.program, timeout = ?spec.timeout, "launching child process");

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = &spec.workdir {
        cmd.current_dir(dir);
    }
    for (key, value) in &spec.envs {
        cmd.env(key, value);
    }

    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to launch {}", spec.program))?;

    let stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("child stdout not captured"))?;
    let stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("child stderr not captured"))?;
    let stdout_task = tokio::spawn(read_to_string(stdout_pipe));
    let stderr_task = tokio::spawn(read_to_string(stderr_pipe));

    // The stdin write runs on its own task: inputs larger than the pipe
    // buffer block until the child drains them, and a child that fills
    // its output pipes first never will. The readers above and the race
    // below must already be in play by then. The child may also exit
    // without reading everything; a broken pipe here is not an
    // execution failure.
    if let Some(mut stdin) = child.stdin.take() {
        let payload = input.as_bytes().to_vec();
        tokio::spawn(async move {
            stdin.write_all(&payload).await.ok();
            stdin.shutdown().await.ok();
        });
    }

    let end = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            child.kill().await.ok();
            ProcessEnd::Canceled
        }
        waited = time::timeout(spec.timeout, child.wait()) => match waited {
            Ok(status) => ProcessEnd::Exited(status.context("failed to wait for child")?),
            Err(_) => {
                child.kill().await.ok();
                ProcessEnd::TimedOut
            }
        },
    };

    // Killing closes the pipes, so both readers terminate.
    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();
    debug!(end = ?end, stdout_len = stdout.len(), stderr_len = stderr.len(), "child process finished");

    Ok(ProcessOutcome { end, stdout, stderr })
}

async fn read_to_string(mut pipe: impl AsyncRead + Unpin) -> String {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf).await.ok();
    String::from_utf8_lossy(&buf).into_owned()
}
