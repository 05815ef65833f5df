use crate::commands::Commands;

use ident_config::LogLevel;

use clap::Parser;

#[derive(Parser)]
#[command(name = "ident")]
#[command(about = "Administer identity user records")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Override the configured log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,
}
