//! Registry behavior: lookup, collision policy, custom-driver
//! registration, and concurrent access.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use deckrun::config::CustomDriverDef;
use deckrun::drivers::{register_custom_drivers, CustomDriver, Driver};
use deckrun::{ExecOptions, ExecutionResult, Registry};

struct NamedDriver {
    name: String,
    reply: String,
}

#[async_trait]
impl Driver for NamedDriver {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(
        &self,
        _cancel: &CancellationToken,
        _code: &str,
        _opts: &ExecOptions,
    ) -> ExecutionResult {
        ExecutionResult::ok(self.reply.clone())
    }
}

fn def(command: &str) -> CustomDriverDef {
    CustomDriverDef {
        command: command.to_string(),
        args: Vec::new(),
        timeout: None,
    }
}

#[test]
fn builtins_are_present() {
    let registry = Registry::with_builtins();
    for name in ["shell", "sqlite", "mysql", "postgres"] {
        assert!(registry.has(name), "missing builtin {name}");
    }
    assert_eq!(registry.list(), vec!["mysql", "postgres", "shell", "sqlite"]);
}

#[tokio::test]
async fn unknown_driver_is_an_ordinary_failure() {
    let registry = Registry::with_builtins();
    let result = registry
        .execute(&CancellationToken::new(), "fortran", "print *, 'hi'", &ExecOptions::new())
        .await;
    assert!(!result.success);
    assert_eq!(result.error, "driver not found: fortran");
}

#[tokio::test]
async fn last_registration_wins() {
    let registry = Registry::new();
    registry.register(NamedDriver {
        name: "echo".into(),
        reply: "first".into(),
    });
    registry.register(NamedDriver {
        name: "echo".into(),
        reply: "second".into(),
    });
    let result = registry
        .execute(&CancellationToken::new(), "echo", "", &ExecOptions::new())
        .await;
    assert_eq!(result.output, "second");
}

#[test]
fn reserved_names_and_empty_commands_are_skipped() {
    let registry = Registry::with_builtins();
    let before = registry.list();

    let mut defs = HashMap::new();
    defs.insert("shell".to_string(), def("evil-shell"));
    defs.insert("mysql".to_string(), def("evil-mysql"));
    defs.insert("empty".to_string(), def(""));
    defs.insert("python".to_string(), def("python3"));
    register_custom_drivers(&registry, &defs);

    let after = registry.list();
    assert!(after.contains(&"python".to_string()));
    assert!(!after.contains(&"empty".to_string()));
    // Built-ins survive: only "python" was added.
    assert_eq!(after.len(), before.len() + 1);
}

#[tokio::test]
async fn builtin_shell_is_not_shadowed_by_custom_registration() {
    let registry = Registry::with_builtins();
    let mut defs = HashMap::new();
    // Would replace every execution with a stream edit if it landed.
    defs.insert(
        "shell".to_string(),
        CustomDriverDef {
            command: "sed".to_string(),
            args: vec!["s/hello/goodbye/".to_string()],
            timeout: None,
        },
    );
    register_custom_drivers(&registry, &defs);

    #[cfg(unix)]
    {
        let result = registry
            .execute(&CancellationToken::new(), "shell", "echo hello", &ExecOptions::new())
            .await;
        assert!(result.success, "error: {}", result.error);
        assert_eq!(result.output, "hello");
    }
}

#[test]
fn concurrent_register_and_lookup_do_not_corrupt() {
    let registry = Arc::new(Registry::with_builtins());
    let mut handles = Vec::new();

    for i in 0..8 {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            for j in 0..25 {
                let name = format!("driver-{i}-{j}");
                registry.register(CustomDriver::new(
                    name.clone(),
                    "true",
                    Vec::new(),
                    None,
                ));
                assert!(registry.has(&name));
                assert!(registry.get("shell").is_some());
                let names = registry.list();
                assert!(names.len() >= 4);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("registry thread panicked");
    }
    // 8 threads x 25 unique names + 4 builtins.
    assert_eq!(registry.list().len(), 204);
}
