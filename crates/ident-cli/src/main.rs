//! ident - identity user record administration
//!
//! # Examples
//!
//! ```bash
//! # Create a user
//! ident user create alice --email alice@example.com --pretty
//!
//! # Grant a claim
//! ident claim add <id> role admin
//!
//! # Find by external login
//! ident user find --login-provider github --provider-key 12345
//! ```

use ident_cli::{Cli, Result as CliErrorResult, execute, logger, render};
use ident_config::{Config, StoreBackend};
use ident_db::{MemoryDocumentClient, SqliteDocumentClient, UserStore};

use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_concurrency_conflict() {
                eprintln!("The user was modified concurrently; re-run the command to retry.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliErrorResult<String> {
    let config = Config::load()?;
    config.validate()?;

    let level: LevelFilter = cli.log_level.unwrap_or(config.logging.level).into();
    logger::initialize(level, config.log_file_path()?, config.logging.colored)?;
    config.log_summary();

    let value = match config.store.backend {
        StoreBackend::Memory => {
            let store = UserStore::new(MemoryDocumentClient::new());
            execute(&store, cli.command).await?
        }
        StoreBackend::Sqlite => {
            let client = SqliteDocumentClient::connect(
                config.database_path()?,
                config.database.max_connections,
            )
            .await?;
            execute(&UserStore::new(client), cli.command).await?
        }
    };

    render(&value, cli.pretty)
}
