//! User record entity - identity attributes, lookup keys, claims and logins.
//!
//! Fields are private. Every change goes through a method, and every method
//! validates its arguments before it touches any field. Persistence is the
//! caller's job once a mutation returns.

use crate::error::require;
use crate::{
    Claim, ClaimSet, ContactRecord, CoreError, LoginSet, Result as CoreErrorResult,
    UserLoginInfo, Version, fold,
};

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

/// Timestamps are kept at the millisecond precision the document stores.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub(crate) id: Uuid,
    pub(crate) user_name: String,
    pub(crate) normalized_user_name: String,
    pub(crate) email: Option<ContactRecord>,
    pub(crate) normalized_email: Option<String>,
    pub(crate) phone_number: Option<ContactRecord>,
    pub(crate) password_hash: Option<String>,
    pub(crate) security_stamp: Option<String>,
    pub(crate) is_two_factor_enabled: bool,
    pub(crate) is_lockout_enabled: bool,
    pub(crate) access_failed_count: u32,
    pub(crate) lockout_end_date: Option<DateTime<Utc>>,
    pub(crate) created_on: DateTime<Utc>,
    /// `None` until soft-deleted; stored as the zero sentinel.
    pub(crate) deleted_on: Option<DateTime<Utc>>,
    pub(crate) version: Option<Version>,
    pub(crate) claims: ClaimSet,
    pub(crate) logins: LoginSet,
}

impl UserRecord {
    /// Create a record with a fresh id and `created_on = now`.
    pub fn new(user_name: &str) -> CoreErrorResult<Self> {
        require(user_name, "user_name")?;

        Ok(Self {
            id: Uuid::new_v4(),
            user_name: user_name.to_string(),
            normalized_user_name: fold(user_name),
            email: None,
            normalized_email: None,
            phone_number: None,
            password_hash: None,
            security_stamp: None,
            is_two_factor_enabled: false,
            is_lockout_enabled: false,
            access_failed_count: 0,
            lockout_end_date: None,
            created_on: now(),
            deleted_on: None,
            version: None,
            claims: ClaimSet::new(),
            logins: LoginSet::new(),
        })
    }

    pub fn with_email(user_name: &str, email: &str) -> CoreErrorResult<Self> {
        require(email, "email")?;
        let mut user = Self::new(user_name)?;
        user.set_email(email)?;
        Ok(user)
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn normalized_user_name(&self) -> &str {
        &self.normalized_user_name
    }

    pub fn email(&self) -> Option<&ContactRecord> {
        self.email.as_ref()
    }

    pub fn normalized_email(&self) -> Option<&str> {
        self.normalized_email.as_deref()
    }

    pub fn phone_number(&self) -> Option<&ContactRecord> {
        self.phone_number.as_ref()
    }

    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }

    pub fn security_stamp(&self) -> Option<&str> {
        self.security_stamp.as_deref()
    }

    pub fn is_two_factor_enabled(&self) -> bool {
        self.is_two_factor_enabled
    }

    pub fn is_lockout_enabled(&self) -> bool {
        self.is_lockout_enabled
    }

    pub fn access_failed_count(&self) -> u32 {
        self.access_failed_count
    }

    pub fn lockout_end_date(&self) -> Option<DateTime<Utc>> {
        self.lockout_end_date
    }

    pub fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }

    pub fn deleted_on(&self) -> Option<DateTime<Utc>> {
        self.deleted_on
    }

    /// Set by the persistence layer after the first successful write.
    pub fn version(&self) -> Option<Version> {
        self.version
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_on.is_some()
    }

    pub fn is_email_confirmed(&self) -> bool {
        self.email.as_ref().is_some_and(ContactRecord::is_confirmed)
    }

    pub fn is_phone_number_confirmed(&self) -> bool {
        self.phone_number
            .as_ref()
            .is_some_and(ContactRecord::is_confirmed)
    }

    /// Locked out when lockout is enabled and the lockout end lies after `now`.
    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.is_lockout_enabled && self.lockout_end_date.is_some_and(|end| end > now)
    }

    // ---------------------------------------------------------------------
    // Identity & status
    // ---------------------------------------------------------------------

    /// Replace the email and recompute its lookup key. The new address starts
    /// unconfirmed.
    pub fn set_email(&mut self, email: &str) -> CoreErrorResult<()> {
        require(email, "email")?;
        self.normalized_email = Some(fold(email));
        self.email = Some(ContactRecord::new(email));
        Ok(())
    }

    pub fn confirm_email(&mut self, at: DateTime<Utc>) -> CoreErrorResult<()> {
        let id = self.id;
        let email = self
            .email
            .as_mut()
            .ok_or_else(|| CoreError::invalid_operation(format!("User '{id}' has no email")))?;
        email.confirm(at.trunc_subsecs(3));
        Ok(())
    }

    /// Overwrite the lookup key as given; the caller supplies the folded form.
    pub fn set_normalized_user_name(&mut self, normalized_user_name: &str) -> CoreErrorResult<()> {
        require(normalized_user_name, "normalized_user_name")?;
        self.normalized_user_name = normalized_user_name.to_string();
        Ok(())
    }

    pub fn set_phone_number(&mut self, phone_number: &str) {
        self.phone_number = Some(ContactRecord::new(phone_number));
    }

    pub fn confirm_phone_number(&mut self, at: DateTime<Utc>) -> CoreErrorResult<()> {
        let id = self.id;
        let phone_number = self.phone_number.as_mut().ok_or_else(|| {
            CoreError::invalid_operation(format!("User '{id}' has no phone number"))
        })?;
        phone_number.confirm(at.trunc_subsecs(3));
        Ok(())
    }

    /// `None` removes the password.
    pub fn set_password_hash(&mut self, password_hash: Option<&str>) {
        self.password_hash = password_hash.map(str::to_string);
    }

    pub fn set_security_stamp(&mut self, security_stamp: &str) {
        self.security_stamp = Some(security_stamp.to_string());
    }

    pub fn set_access_failed_count(&mut self, access_failed_count: u32) {
        self.access_failed_count = access_failed_count;
    }

    pub fn increment_access_failed_count(&mut self) -> u32 {
        self.access_failed_count = self.access_failed_count.saturating_add(1);
        self.access_failed_count
    }

    pub fn reset_access_failed_count(&mut self) {
        self.access_failed_count = 0;
    }

    pub fn lock_until(&mut self, lockout_end_date: DateTime<Utc>) {
        self.lockout_end_date = Some(lockout_end_date.trunc_subsecs(3));
    }

    pub fn enable_two_factor_authentication(&mut self) {
        self.is_two_factor_enabled = true;
    }

    pub fn disable_two_factor_authentication(&mut self) {
        self.is_two_factor_enabled = false;
    }

    pub fn enable_lockout(&mut self) {
        self.is_lockout_enabled = true;
    }

    pub fn disable_lockout(&mut self) {
        self.is_lockout_enabled = false;
    }

    /// Soft delete. The only removal path; a record is deleted at most once.
    pub fn delete(&mut self) -> CoreErrorResult<()> {
        if self.deleted_on.is_some() {
            return Err(CoreError::invalid_operation(format!(
                "User '{}' has already been deleted.",
                self.id
            )));
        }

        self.deleted_on = Some(now());
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Claims
    // ---------------------------------------------------------------------

    pub fn has_claim(&self, claim: &Claim) -> bool {
        self.claims.contains(claim)
    }

    pub fn claims(&self) -> Vec<Claim> {
        self.claims.claims()
    }

    pub fn claim_types(&self) -> impl Iterator<Item = &str> {
        self.claims.claim_types()
    }

    pub fn add_claim(&mut self, claim: &Claim) -> CoreErrorResult<()> {
        require(&claim.claim_type, "claim.claim_type")?;
        self.claims.add(claim);
        Ok(())
    }

    /// Removing a claim the user does not hold is a no-op.
    pub fn remove_claim(&mut self, claim: &Claim) -> CoreErrorResult<()> {
        require(&claim.claim_type, "claim.claim_type")?;
        self.claims.remove(claim);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Logins
    // ---------------------------------------------------------------------

    pub fn logins(&self) -> &[UserLoginInfo] {
        self.logins.logins()
    }

    pub fn has_login(&self, login_provider: &str, provider_key: &str) -> bool {
        self.logins.contains(login_provider, provider_key)
    }

    pub fn add_login(&mut self, login: &UserLoginInfo) -> CoreErrorResult<()> {
        require(&login.login_provider, "login.login_provider")?;
        require(&login.provider_key, "login.provider_key")?;
        self.logins.add(login);
        Ok(())
    }

    /// Removes by provider match only; see
    /// [`crate::LOGIN_REMOVAL_MATCHES_PROVIDER_ONLY`].
    pub fn remove_login(&mut self, login: &UserLoginInfo) -> CoreErrorResult<()> {
        require(&login.login_provider, "login.login_provider")?;
        self.logins.remove(login);
        Ok(())
    }
}
