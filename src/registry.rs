//! The concurrency-safe driver directory.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::drivers::{Driver, MySqlDriver, PostgresDriver, ShellDriver, SqliteDriver};
use crate::execution::{ExecOptions, ExecutionResult};

/// Maps driver names to driver instances. Registration may race with
/// in-flight lookups while custom drivers are being added at startup, so
/// the map sits behind a reader-writer lock. Entries are never removed;
/// re-registering a name replaces the previous driver.
#[derive(Default)]
pub struct Registry {
    drivers: RwLock<HashMap<String, Arc<dyn Driver>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in drivers.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register(ShellDriver::new());
        registry.register(SqliteDriver::new());
        registry.register(MySqlDriver::new());
        registry.register(PostgresDriver::new());
        registry
    }

    /// Last registration wins on a name collision.
    pub fn register<D: Driver + 'static>(&self, driver: D) {
        self.register_arc(Arc::new(driver));
    }

    pub fn register_arc(&self, driver: Arc<dyn Driver>) {
        let name = driver.name().to_string();
        debug!(driver = %name, "registering driver");
        self.drivers.write().insert(name, driver);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Driver>> {
        self.drivers.read().get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.drivers.read().contains_key(name)
    }

    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.drivers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve `name` and dispatch. An unregistered name is an ordinary
    /// failed result, never a panic or error.
    pub async fn execute(
        &self,
        cancel: &CancellationToken,
        name: &str,
        code: &str,
        opts: &ExecOptions,
    ) -> ExecutionResult {
        // Clone the Arc out so the lock is not held across the await.
        match self.get(name) {
            Some(driver) => driver.execute(cancel, code, opts).await,
            None => ExecutionResult::failure(format!("driver not found: {name}")),
        }
    }
}
