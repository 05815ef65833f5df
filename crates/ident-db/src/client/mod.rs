//! Persistence client boundary.
//!
//! A [`DocumentClient`] is the thin surface of a key-value document store:
//! point reads by primary key, conditional writes guarded by the document
//! version, and queries against the two (normalized field, `DeletedOn`)
//! secondary indexes. The store service above it never builds raw queries.

pub mod memory_document_client;
pub mod sqlite_document_client;

use crate::{DbError, Result as DbErrorResult};

use ident_core::{EMAIL_INDEX, ErrorLocation, USER_NAME_INDEX, UserDocument};

use std::panic::Location;

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupIndex {
    NormalizedUserName,
    NormalizedEmail,
}

impl LookupIndex {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NormalizedUserName => USER_NAME_INDEX,
            Self::NormalizedEmail => EMAIL_INDEX,
        }
    }

    /// The document's hash key for this index; documents without one are not indexed.
    pub fn partition_key<'a>(&self, document: &'a UserDocument) -> Option<&'a str> {
        match self {
            Self::NormalizedUserName => Some(document.normalized_user_name.as_str()),
            Self::NormalizedEmail => document.normalized_email.as_deref(),
        }
    }
}

impl std::fmt::Display for LookupIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[async_trait]
pub trait DocumentClient: Send + Sync {
    async fn get(&self, id: &str) -> DbErrorResult<Option<UserDocument>>;

    /// Write `document` only if the stored version equals `expected_version`
    /// (`None`: no document with this id may exist yet). A mismatch is
    /// [`DbError::ConcurrencyConflict`].
    async fn put(&self, document: &UserDocument, expected_version: Option<i64>)
    -> DbErrorResult<()>;

    /// Documents whose index hash key equals `partition_key` and whose
    /// `DeletedOn` equals `range_key`.
    async fn query(
        &self,
        index: LookupIndex,
        partition_key: &str,
        range_key: i64,
    ) -> DbErrorResult<Vec<UserDocument>>;

    /// Every stored document, deleted ones included.
    async fn scan(&self) -> DbErrorResult<Vec<UserDocument>>;
}

/// The version a document must carry to be written.
#[track_caller]
pub(crate) fn required_version(document: &UserDocument) -> DbErrorResult<i64> {
    document
        .version_number
        .ok_or_else(|| DbError::InvalidDocument {
            message: format!("document {} has no VersionNumber", document.id),
            location: ErrorLocation::from(Location::caller()),
        })
}
