//! User store service - loads and persists user records through a
//! [`DocumentClient`] with optimistic concurrency.
//!
//! ## Write protocol
//!
//! Every write is conditional on the version the record carried when it was
//! read. The store stamps the next version on the outgoing document and the
//! client rejects the write if someone else got there first:
//!
//! 1. `find_*` returns a record at version N
//! 2. the caller mutates it in memory
//! 3. `update` writes version N+1 only if the stored version is still N
//! 4. otherwise `DbError::ConcurrencyConflict`; the caller re-reads and retries
//!
//! The store never retries on its own.
//!
//! ## Soft delete
//!
//! `delete` sets `DeletedOn` and writes through the same conditional path. The
//! document stays in the table but no longer matches the live sentinel that
//! every index lookup pins, so it disappears from name and email lookups.

use crate::client::{DocumentClient, LookupIndex};
use crate::{DbError, Result as DbErrorResult};

use ident_core::{
    Claim, DELETED_ON_SENTINEL, ErrorLocation, UserDocument, UserRecord, fold,
};

use std::panic::Location;

use log::{debug, warn};
use uuid::Uuid;

/// Version stamped on a document by its first write.
pub const FIRST_VERSION: i64 = 1;

pub struct UserStore<C: DocumentClient> {
    client: C,
}

impl<C: DocumentClient> UserStore<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Persist a record built in memory. Returns it carrying its first version.
    pub async fn create(&self, user: UserRecord) -> DbErrorResult<UserRecord> {
        if user.version().is_some() {
            return Err(DbError::AlreadyPersisted {
                id: user.id().to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.write(user, None).await
    }

    /// Persist a mutated record, guarded by the version it was read at.
    pub async fn update(&self, user: UserRecord) -> DbErrorResult<UserRecord> {
        let expected = user.version().ok_or_else(|| DbError::NotPersisted {
            id: user.id().to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        self.write(user, Some(expected.value())).await
    }

    /// Soft-delete and persist. Deleting twice fails with the entity's
    /// `InvalidOperation` before anything is written.
    pub async fn delete(&self, mut user: UserRecord) -> DbErrorResult<UserRecord> {
        user.delete()?;
        self.update(user).await
    }

    async fn write(&self, user: UserRecord, expected: Option<i64>) -> DbErrorResult<UserRecord> {
        let next = match expected {
            None => FIRST_VERSION,
            Some(v) => v.checked_add(1).ok_or_else(|| DbError::InvalidDocument {
                message: format!("user {} has exhausted its VersionNumber", user.id()),
                location: ErrorLocation::from(Location::caller()),
            })?,
        };

        let mut document = UserDocument::try_from(&user)?;
        document.version_number = Some(next);

        if let Err(e) = self.client.put(&document, expected).await {
            if e.is_concurrency_conflict() {
                warn!(
                    "Write to user {} lost a version race (expected {:?})",
                    document.id, expected
                );
            }
            return Err(e);
        }

        debug!(
            "Wrote user {} at version {:?}",
            document.id, document.version_number
        );

        Ok(UserRecord::try_from(document)?)
    }

    /// Live record by id; soft-deleted records are hidden.
    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<UserRecord>> {
        let document = self.client.get(&id.to_string()).await?;

        match document {
            Some(doc) if !doc.is_deleted() => Ok(Some(UserRecord::try_from(doc)?)),
            _ => Ok(None),
        }
    }

    pub async fn find_by_normalized_user_name(
        &self,
        normalized_user_name: &str,
    ) -> DbErrorResult<Option<UserRecord>> {
        self.find_live(LookupIndex::NormalizedUserName, normalized_user_name)
            .await
    }

    pub async fn find_by_normalized_email(
        &self,
        normalized_email: &str,
    ) -> DbErrorResult<Option<UserRecord>> {
        self.find_live(LookupIndex::NormalizedEmail, normalized_email)
            .await
    }

    /// Fold `user_name` the same way the record does, then look it up.
    pub async fn find_by_user_name(&self, user_name: &str) -> DbErrorResult<Option<UserRecord>> {
        self.find_by_normalized_user_name(&fold(user_name)).await
    }

    pub async fn find_by_email(&self, email: &str) -> DbErrorResult<Option<UserRecord>> {
        self.find_by_normalized_email(&fold(email)).await
    }

    async fn find_live(
        &self,
        index: LookupIndex,
        partition_key: &str,
    ) -> DbErrorResult<Option<UserRecord>> {
        let documents = self
            .client
            .query(index, partition_key, DELETED_ON_SENTINEL)
            .await?;

        if documents.len() > 1 {
            warn!(
                "{} live users share {} key '{}'; returning the first",
                documents.len(),
                index,
                partition_key
            );
        }

        documents
            .into_iter()
            .next()
            .map(UserRecord::try_from)
            .transpose()
            .map_err(DbError::from)
    }

    /// Live user bound to the given external login, if any.
    pub async fn find_by_login(
        &self,
        login_provider: &str,
        provider_key: &str,
    ) -> DbErrorResult<Option<UserRecord>> {
        for user in self.live_users().await? {
            if user.has_login(login_provider, provider_key) {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    /// Live users holding `claim`.
    pub async fn users_for_claim(&self, claim: &Claim) -> DbErrorResult<Vec<UserRecord>> {
        Ok(self
            .live_users()
            .await?
            .into_iter()
            .filter(|u| u.has_claim(claim))
            .collect())
    }

    async fn live_users(&self) -> DbErrorResult<Vec<UserRecord>> {
        self.client
            .scan()
            .await?
            .into_iter()
            .filter(|d| !d.is_deleted())
            .map(|d| UserRecord::try_from(d).map_err(DbError::from))
            .collect()
    }
}
