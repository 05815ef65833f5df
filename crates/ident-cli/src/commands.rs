use crate::{
    claim_commands::ClaimCommands, login_commands::LoginCommands, user_commands::UserCommands,
};

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// User record operations
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Claim operations on a user
    Claim {
        #[command(subcommand)]
        action: ClaimCommands,
    },

    /// External login operations on a user
    Login {
        #[command(subcommand)]
        action: LoginCommands,
    },
}
