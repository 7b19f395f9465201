//! Execution results and per-block options shared by every driver.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};

/// One structured row reconstructed from a database CLI's table output.
/// Column order is preserved by the map.
pub type Row = Map<String, Value>;

/// The uniform value every driver returns.
///
/// `data` is present only when a database driver managed to parse its
/// output into rows; `None` means "render `output` as plain text", not
/// "something went wrong".
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub output: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Row>>,
}

impl ExecutionResult {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            ..Default::default()
        }
    }
}

/// String-keyed per-call configuration built from the code block's
/// metadata and the resolved connection settings.
///
/// All keys are optional; typed accessors apply the parsing rules drivers
/// rely on (positive integer timeouts, non-empty working directories).
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    inner: HashMap<String, String>,
}

impl ExecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    /// Per-call timeout override. Ignored unless it parses as a positive
    /// integer number of seconds.
    pub fn timeout(&self) -> Option<Duration> {
        self.get("timeout")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    /// Per-call working directory override; empty values are ignored.
    pub fn workdir(&self) -> Option<&str> {
        self.get("workdir").filter(|v| !v.is_empty())
    }

    pub fn host(&self) -> Option<&str> {
        self.get("host").filter(|v| !v.is_empty())
    }

    pub fn port(&self) -> Option<&str> {
        self.get("port").filter(|v| !v.is_empty())
    }

    pub fn user(&self) -> Option<&str> {
        self.get("user").filter(|v| !v.is_empty())
    }

    pub fn password(&self) -> Option<&str> {
        self.get("password").filter(|v| !v.is_empty())
    }

    pub fn database(&self) -> Option<&str> {
        self.get("database").filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_requires_positive_integer_seconds() {
        let mut opts = ExecOptions::new();
        assert_eq!(opts.timeout(), None);

        opts.set("timeout", "5");
        assert_eq!(opts.timeout(), Some(Duration::from_secs(5)));

        opts.set("timeout", "0");
        assert_eq!(opts.timeout(), None);

        opts.set("timeout", "soon");
        assert_eq!(opts.timeout(), None);

        opts.set("timeout", "-3");
        assert_eq!(opts.timeout(), None);
    }

    #[test]
    fn empty_workdir_is_ignored() {
        let mut opts = ExecOptions::new();
        opts.set("workdir", "");
        assert_eq!(opts.workdir(), None);

        opts.set("workdir", "/tmp");
        assert_eq!(opts.workdir(), Some("/tmp"));
    }
}
