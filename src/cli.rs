use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "deckrun", about = "Run presentation code blocks through pluggable drivers", version)]
pub struct Cli {
    /// Code to execute; read from stdin when omitted.
    #[arg(value_name = "CODE")]
    pub code: Option<String>,

    /// Driver to execute with (built-in or from the config file).
    /// A `--connection` label implies its configured driver instead.
    #[arg(short, long, default_value = "shell")]
    pub driver: String,

    /// Named connection from the config file.
    #[arg(short, long)]
    pub connection: Option<String>,

    /// Config file path (default: ~/.config/deckrun/config.json).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Per-call timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Working directory for the executed process.
    #[arg(long)]
    pub workdir: Option<String>,

    /// Print available drivers and exit.
    #[arg(long)]
    pub list_drivers: bool,

    /// Emit the full result as JSON instead of plain text.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
