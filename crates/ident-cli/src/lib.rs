//! ident-cli library
//!
//! Argument definitions and command execution for the `ident` binary, exported
//! so commands can be driven against an in-memory store in tests.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod runner;

mod claim_commands;
mod login_commands;
mod user_commands;


pub use claim_commands::ClaimCommands;
pub use cli::Cli;
pub use commands::Commands;
pub use error::{CliError, Result};
pub use login_commands::LoginCommands;
pub use runner::{execute, render};
pub use user_commands::UserCommands;
