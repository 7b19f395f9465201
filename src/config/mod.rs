//! Presentation-level execution configuration: custom driver definitions
//! and named connections, loaded from a JSON file.
//!
//! Connection values support `${VAR}` environment substitution so
//! secrets stay out of the file itself.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

use crate::execution::ExecOptions;

/// A user-supplied driver: any command that reads a program from stdin.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomDriverDef {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Seconds; falls back to the shared default when absent.
    #[serde(default)]
    pub timeout: Option<u64>,
}

/// Connection settings a code block references by label.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionProfile {
    pub driver: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub workdir: Option<String>,
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl ConnectionProfile {
    /// Flatten into the per-call option map handed to a driver, expanding
    /// `${VAR}` references against the process environment.
    pub fn to_options(&self) -> ExecOptions {
        let mut opts = ExecOptions::new();
        let fields = [
            ("host", &self.host),
            ("port", &self.port),
            ("user", &self.user),
            ("password", &self.password),
            ("database", &self.database),
            ("workdir", &self.workdir),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                opts.set(key, expand_env(value));
            }
        }
        if let Some(timeout) = self.timeout {
            opts.set("timeout", timeout.to_string());
        }
        opts
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub drivers: HashMap<String, CustomDriverDef>,
    #[serde(default)]
    pub connections: HashMap<String, ConnectionProfile>,
}

impl Config {
    /// Load from `path`, or from the default location when `path` is
    /// `None`. A missing file is an empty configuration, not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path(),
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn connection(&self, label: &str) -> Option<&ConnectionProfile> {
        self.connections.get(label)
    }
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("deckrun").join("config.json")
}

/// Replace `${VAR}` references with the variable's value; unset
/// variables expand to the empty string.
fn expand_env(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find('}') {
            Some(end) => {
                let var = &rest[start + 2..start + 2 + end];
                out.push_str(&env::var(var).unwrap_or_default());
                rest = &rest[start + 2 + end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
