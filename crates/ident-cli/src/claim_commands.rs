use clap::Subcommand;

#[derive(Subcommand)]
pub enum ClaimCommands {
    /// Add a claim to a user
    Add {
        id: String,
        claim_type: String,
        value: String,
    },
    /// Remove one copy of a claim from a user
    Remove {
        id: String,
        claim_type: String,
        value: String,
    },
    /// List a user's claims
    List { id: String },
    /// List live users holding a claim
    Users { claim_type: String, value: String },
}
