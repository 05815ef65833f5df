//! Executes a parsed command against a [`UserStore`] and shapes the JSON reply.
//!
//! User results are printed as the stored `UserDocument`, the same flat shape
//! that is persisted, so the output shows exactly what the store holds.

use crate::error::{CliError, Result as CliErrorResult};
use crate::{ClaimCommands, Commands, LoginCommands, UserCommands};

use ident_core::{Claim, UserDocument, UserLoginInfo, UserRecord};
use ident_db::{DocumentClient, UserStore};

use chrono::Utc;
use log::info;
use serde_json::Value;
use uuid::Uuid;

pub async fn execute<C: DocumentClient>(
    store: &UserStore<C>,
    command: Commands,
) -> CliErrorResult<Value> {
    match command {
        Commands::User { action } => execute_user(store, action).await,
        Commands::Claim { action } => execute_claim(store, action).await,
        Commands::Login { action } => execute_login(store, action).await,
    }
}

/// Serialize a command result for stdout.
pub fn render(value: &Value, pretty: bool) -> CliErrorResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

async fn execute_user<C: DocumentClient>(
    store: &UserStore<C>,
    action: UserCommands,
) -> CliErrorResult<Value> {
    match action {
        UserCommands::Create {
            user_name,
            email,
            phone_number,
        } => {
            let mut user = match email {
                Some(email) => UserRecord::with_email(&user_name, &email)?,
                None => UserRecord::new(&user_name)?,
            };
            if let Some(phone_number) = phone_number {
                user.set_phone_number(&phone_number);
            }

            let created = store.create(user).await?;
            info!("Created user {} ({})", created.user_name(), created.id());
            user_json(&created)
        }
        UserCommands::Get { id } => user_json(&load(store, &id).await?),
        UserCommands::Find {
            name,
            email,
            login_provider,
            provider_key,
        } => {
            let (found, key) = match (name, email, login_provider, provider_key) {
                (Some(name), _, _, _) => (store.find_by_user_name(&name).await?, name),
                (None, Some(email), _, _) => (store.find_by_email(&email).await?, email),
                (None, None, Some(provider), Some(key)) => {
                    let found = store.find_by_login(&provider, &key).await?;
                    (found, format!("{provider}/{key}"))
                }
                _ => {
                    return Err(CliError::invalid_input(
                        "specify --name, --email, or --login-provider with --provider-key",
                    ));
                }
            };
            user_json(&found.ok_or_else(|| CliError::not_found(key))?)
        }
        UserCommands::Delete { id } => {
            let deleted = store.delete(load(store, &id).await?).await?;
            info!("Deleted user {}", deleted.id());
            user_json(&deleted)
        }
        UserCommands::Lock { id, duration } => {
            let duration = chrono::Duration::from_std(duration)
                .map_err(|e| CliError::invalid_input(format!("lockout duration: {e}")))?;
            let until = Utc::now().checked_add_signed(duration).ok_or_else(|| {
                CliError::invalid_input("lockout duration runs past the last representable date")
            })?;
            let mut user = load(store, &id).await?;
            user.enable_lockout();
            user.lock_until(until);
            user_json(&store.update(user).await?)
        }
        UserCommands::Unlock { id } => {
            let mut user = load(store, &id).await?;
            user.lock_until(Utc::now());
            user.reset_access_failed_count();
            user_json(&store.update(user).await?)
        }
        UserCommands::SetEmail { id, email } => {
            let mut user = load(store, &id).await?;
            user.set_email(&email)?;
            user_json(&store.update(user).await?)
        }
        UserCommands::ConfirmEmail { id } => {
            let mut user = load(store, &id).await?;
            user.confirm_email(Utc::now())?;
            user_json(&store.update(user).await?)
        }
    }
}

async fn execute_claim<C: DocumentClient>(
    store: &UserStore<C>,
    action: ClaimCommands,
) -> CliErrorResult<Value> {
    match action {
        ClaimCommands::Add {
            id,
            claim_type,
            value,
        } => {
            let mut user = load(store, &id).await?;
            user.add_claim(&Claim::new(claim_type, value))?;
            user_json(&store.update(user).await?)
        }
        ClaimCommands::Remove {
            id,
            claim_type,
            value,
        } => {
            let mut user = load(store, &id).await?;
            user.remove_claim(&Claim::new(claim_type, value))?;
            user_json(&store.update(user).await?)
        }
        ClaimCommands::List { id } => Ok(serde_json::to_value(load(store, &id).await?.claims())?),
        ClaimCommands::Users { claim_type, value } => {
            let users = store
                .users_for_claim(&Claim::new(claim_type, value))
                .await?;
            let documents = users
                .iter()
                .map(UserDocument::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(serde_json::to_value(documents)?)
        }
    }
}

async fn execute_login<C: DocumentClient>(
    store: &UserStore<C>,
    action: LoginCommands,
) -> CliErrorResult<Value> {
    match action {
        LoginCommands::Add {
            id,
            provider,
            key,
            display_name,
        } => {
            let mut user = load(store, &id).await?;
            user.add_login(&UserLoginInfo::new(provider, key, display_name))?;
            user_json(&store.update(user).await?)
        }
        LoginCommands::Remove { id, provider } => {
            let mut user = load(store, &id).await?;
            // Removal matches on provider alone, so no key is needed
            user.remove_login(&UserLoginInfo::new(provider, "", None))?;
            user_json(&store.update(user).await?)
        }
        LoginCommands::List { id } => Ok(serde_json::to_value(load(store, &id).await?.logins())?),
    }
}

async fn load<C: DocumentClient>(store: &UserStore<C>, id: &str) -> CliErrorResult<UserRecord> {
    let uuid = Uuid::parse_str(id)
        .map_err(|e| CliError::invalid_input(format!("'{id}' is not a user ID: {e}")))?;

    store
        .find_by_id(uuid)
        .await?
        .ok_or_else(|| CliError::not_found(id))
}

fn user_json(user: &UserRecord) -> CliErrorResult<Value> {
    Ok(serde_json::to_value(UserDocument::try_from(user)?)?)
}
