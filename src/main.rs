mod cli;

use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{bail, Result};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use deckrun::config::Config;
use deckrun::drivers::register_custom_drivers;
use deckrun::{ExecOptions, Registry};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = cli::Cli::parse();
    let config = Config::load(args.config.as_deref())?;

    let registry = Registry::with_builtins();
    register_custom_drivers(&registry, &config.drivers);

    if args.list_drivers {
        for name in registry.list() {
            println!("{name}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    // Positional code wins; otherwise read the block from piped stdin.
    let code = match args.code {
        Some(code) => code,
        None => {
            if io::stdin().is_terminal() {
                bail!("no code given: pass CODE or pipe it on stdin");
            }
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    // A connection label implies its configured driver.
    let (driver, mut opts) = match args.connection.as_deref() {
        Some(label) => {
            let Some(profile) = config.connection(label) else {
                bail!("connection not found: {label}");
            };
            (profile.driver.clone(), profile.to_options())
        }
        None => (args.driver.clone(), ExecOptions::new()),
    };
    if let Some(timeout) = args.timeout {
        opts.set("timeout", timeout.to_string());
    }
    if let Some(workdir) = &args.workdir {
        opts.set("workdir", workdir.clone());
    }

    // Ctrl-C cancels the in-flight execution; the driver reports it as a
    // canceled result rather than tearing the process down mid-write.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let result = registry.execute(&cancel, &driver, &code, &opts).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if !result.output.is_empty() {
            println!("{}", result.output);
        }
        if !result.error.is_empty() {
            eprintln!("{}", result.error.red());
        }
    }

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
