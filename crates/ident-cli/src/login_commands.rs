use clap::Subcommand;

#[derive(Subcommand)]
pub enum LoginCommands {
    /// Bind an external login to a user
    Add {
        id: String,
        provider: String,
        key: String,
        #[arg(long)]
        display_name: Option<String>,
    },
    /// Remove the first login from `provider`
    Remove { id: String, provider: String },
    /// List a user's external logins
    List { id: String },
}
