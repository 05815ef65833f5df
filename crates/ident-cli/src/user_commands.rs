use clap::Subcommand;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user
    Create {
        user_name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
    },
    /// Get a live user by ID
    Get {
        /// User ID (UUID)
        id: String,
    },
    /// Find a live user by user name, email, or external login
    Find {
        #[arg(long, conflicts_with_all = ["email", "login_provider"])]
        name: Option<String>,
        #[arg(long, conflicts_with = "login_provider")]
        email: Option<String>,
        #[arg(long, requires = "provider_key")]
        login_provider: Option<String>,
        #[arg(long, requires = "login_provider")]
        provider_key: Option<String>,
    },
    /// Soft-delete a user
    Delete { id: String },
    /// Lock a user out for a duration such as "15m" or "2h 30m"
    Lock {
        id: String,
        #[arg(long = "for", value_parser = humantime::parse_duration)]
        duration: std::time::Duration,
    },
    /// End a lockout and reset the failed-access count
    Unlock { id: String },
    /// Replace a user's email; the new address starts unconfirmed
    SetEmail { id: String, email: String },
    /// Mark a user's email as confirmed now
    ConfirmEmail { id: String },
}
