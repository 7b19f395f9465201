//! Pluggable live code execution for presentation decks.
//!
//! A slide embeds a code block tagged with a driver name; the driver runs
//! it through an external program (the platform shell, a database CLI, or
//! any user-configured command) and returns a uniform result: success
//! flag, captured output, a credential-masked error, and, for database
//! drivers, structured rows parsed from the tool's table output.

pub mod config;
pub mod drivers;
pub mod execution;
pub mod mask;
pub mod process;
pub mod registry;
pub mod table;

pub use drivers::{Driver, RESERVED_NAMES};
pub use execution::{ExecOptions, ExecutionResult, Row};
pub use registry::Registry;
