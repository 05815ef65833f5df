//! Flat document layout persisted to the key-value store.
//!
//! This is the only layout contract with the store: scalar fields plus the
//! parallel sequences produced by the claims and logins codecs. Timestamps are
//! epoch milliseconds; `DeletedOn` uses [`DELETED_ON_SENTINEL`] for live users
//! so that it can serve as the range key of both lookup indexes.

use crate::{
    ClaimSet, ContactRecord, CoreError, EncodedClaims, EncodedLogins, LoginSet,
    Result as CoreErrorResult, UserRecord, Version,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `DeletedOn` value of a record that has not been soft-deleted.
pub const DELETED_ON_SENTINEL: i64 = 0;

/// Secondary index keyed on (`NormalizedUserName`, `DeletedOn`).
pub const USER_NAME_INDEX: &str = "NormalizedUserName-DeletedOn-index";

/// Secondary index keyed on (`NormalizedEmail`, `DeletedOn`).
pub const EMAIL_INDEX: &str = "NormalizedEmail-DeletedOn-index";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContactDocument {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmed_on: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserDocument {
    pub id: String,
    pub user_name: String,
    pub normalized_user_name: String,
    #[serde(default)]
    pub email: Option<ContactDocument>,
    #[serde(default)]
    pub normalized_email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<ContactDocument>,
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub security_stamp: Option<String>,
    #[serde(default)]
    pub is_two_factor_enabled: bool,
    #[serde(default)]
    pub claim_types: Vec<String>,
    #[serde(default)]
    pub claim_values: Vec<String>,
    #[serde(default)]
    pub login_providers: Vec<String>,
    #[serde(default)]
    pub login_provider_keys: Vec<String>,
    #[serde(default)]
    pub login_provider_display_names: Vec<String>,
    #[serde(default)]
    pub access_failed_count: u32,
    #[serde(default)]
    pub is_lockout_enabled: bool,
    #[serde(default)]
    pub lockout_end_date: Option<i64>,
    pub created_on: i64,
    #[serde(default)]
    pub deleted_on: i64,
    #[serde(default)]
    pub version_number: Option<i64>,
}

impl UserDocument {
    pub fn is_deleted(&self) -> bool {
        self.deleted_on != DELETED_ON_SENTINEL
    }
}

fn to_millis(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

#[track_caller]
fn from_millis(field: &str, millis: i64) -> CoreErrorResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        CoreError::corrupt_document(format!("{field} is out of range: {millis}"))
    })
}

fn contact_to_document(contact: &ContactRecord) -> ContactDocument {
    ContactDocument {
        value: contact.value().to_string(),
        confirmed_on: contact.confirmed_on().map(to_millis),
    }
}

fn contact_from_document(field: &str, doc: ContactDocument) -> CoreErrorResult<ContactRecord> {
    let confirmed_on = doc
        .confirmed_on
        .map(|ms| from_millis(field, ms))
        .transpose()?;
    Ok(ContactRecord::restore(doc.value, confirmed_on))
}

impl TryFrom<&UserRecord> for UserDocument {
    type Error = CoreError;

    fn try_from(user: &UserRecord) -> CoreErrorResult<Self> {
        let EncodedClaims {
            claim_types,
            claim_values,
        } = user.claims.encode()?;
        let EncodedLogins {
            login_providers,
            login_provider_keys,
            login_provider_display_names,
        } = user.logins.encode();

        Ok(Self {
            id: user.id.to_string(),
            user_name: user.user_name.clone(),
            normalized_user_name: user.normalized_user_name.clone(),
            email: user.email.as_ref().map(contact_to_document),
            normalized_email: user.normalized_email.clone(),
            phone_number: user.phone_number.as_ref().map(contact_to_document),
            password_hash: user.password_hash.clone(),
            security_stamp: user.security_stamp.clone(),
            is_two_factor_enabled: user.is_two_factor_enabled,
            claim_types,
            claim_values,
            login_providers,
            login_provider_keys,
            login_provider_display_names,
            access_failed_count: user.access_failed_count,
            is_lockout_enabled: user.is_lockout_enabled,
            lockout_end_date: user.lockout_end_date.map(to_millis),
            created_on: to_millis(user.created_on),
            deleted_on: user.deleted_on.map_or(DELETED_ON_SENTINEL, to_millis),
            version_number: user.version.map(|v| v.value()),
        })
    }
}

impl TryFrom<UserDocument> for UserRecord {
    type Error = CoreError;

    fn try_from(doc: UserDocument) -> CoreErrorResult<Self> {
        let claims = ClaimSet::decode(EncodedClaims {
            claim_types: doc.claim_types,
            claim_values: doc.claim_values,
        })?;
        let logins = LoginSet::decode(EncodedLogins {
            login_providers: doc.login_providers,
            login_provider_keys: doc.login_provider_keys,
            login_provider_display_names: doc.login_provider_display_names,
        })?;

        let deleted_on = if doc.deleted_on == DELETED_ON_SENTINEL {
            None
        } else {
            Some(from_millis("DeletedOn", doc.deleted_on)?)
        };

        Ok(Self {
            id: Uuid::parse_str(&doc.id)?,
            user_name: doc.user_name,
            normalized_user_name: doc.normalized_user_name,
            email: doc
                .email
                .map(|e| contact_from_document("Email.ConfirmedOn", e))
                .transpose()?,
            normalized_email: doc.normalized_email,
            phone_number: doc
                .phone_number
                .map(|p| contact_from_document("PhoneNumber.ConfirmedOn", p))
                .transpose()?,
            password_hash: doc.password_hash,
            security_stamp: doc.security_stamp,
            is_two_factor_enabled: doc.is_two_factor_enabled,
            is_lockout_enabled: doc.is_lockout_enabled,
            access_failed_count: doc.access_failed_count,
            lockout_end_date: doc
                .lockout_end_date
                .map(|ms| from_millis("LockoutEndDate", ms))
                .transpose()?,
            created_on: from_millis("CreatedOn", doc.created_on)?,
            deleted_on,
            version: doc.version_number.map(Version::from_raw),
            claims,
            logins,
        })
    }
}
