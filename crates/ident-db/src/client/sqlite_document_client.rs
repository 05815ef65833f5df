//! SQLite-backed document store.
//!
//! Each document is kept whole as a JSON body. The primary key, the two index
//! hash keys, `DeletedOn` and the version are copied into their own columns so
//! that the composite indexes and the conditional write can use them.

use crate::client::{DocumentClient, LookupIndex, required_version};
use crate::{DbError, Result as DbErrorResult};

use ident_core::{ErrorLocation, UserDocument};

use std::panic::Location;
use std::path::Path;

use async_trait::async_trait;
use log::debug;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};

#[derive(Debug, Clone)]
pub struct SqliteDocumentClient {
    pool: SqlitePool,
}

impl SqliteDocumentClient {
    /// Open (creating if needed) the database file and run migrations.
    pub async fn connect(path: impl AsRef<Path>, max_connections: u32) -> DbErrorResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DbError::Initialization {
                    message: format!("Failed to create database directory: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Self::run_migrations(&pool).await?;
        debug!("Opened user document database at {}", path.display());

        Ok(Self { pool })
    }

    /// A private in-memory database; single connection so every query sees it.
    pub async fn in_memory() -> DbErrorResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::run_migrations(&pool).await?;

        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> DbErrorResult<()> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| DbError::Migration {
                message: format!("Migration failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    fn decode_row(row: &SqliteRow) -> DbErrorResult<UserDocument> {
        let body: String = row.try_get("body")?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl DocumentClient for SqliteDocumentClient {
    async fn get(&self, id: &str) -> DbErrorResult<Option<UserDocument>> {
        let row = sqlx::query("SELECT body FROM user_documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::decode_row).transpose()
    }

    async fn put(
        &self,
        document: &UserDocument,
        expected_version: Option<i64>,
    ) -> DbErrorResult<()> {
        let version = required_version(document)?;
        let body = serde_json::to_string(document)?;

        match expected_version {
            None => {
                let result = sqlx::query(
                    r#"
                        INSERT INTO user_documents (
                            id, normalized_user_name, normalized_email,
                            deleted_on, version_number, body
                        ) VALUES (?, ?, ?, ?, ?, ?)
                        ON CONFLICT(id) DO NOTHING
                    "#,
                )
                .bind(&document.id)
                .bind(&document.normalized_user_name)
                .bind(document.normalized_email.as_deref())
                .bind(document.deleted_on)
                .bind(version)
                .bind(&body)
                .execute(&self.pool)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(DbError::concurrency_conflict(
                        document.id.clone(),
                        expected_version,
                    ));
                }

                Ok(())
            }
            Some(expected) => {
                let result = sqlx::query(
                    r#"
                        UPDATE user_documents
                        SET normalized_user_name = ?, normalized_email = ?,
                            deleted_on = ?, version_number = ?, body = ?
                        WHERE id = ? AND version_number = ?
                    "#,
                )
                .bind(&document.normalized_user_name)
                .bind(document.normalized_email.as_deref())
                .bind(document.deleted_on)
                .bind(version)
                .bind(&body)
                .bind(&document.id)
                .bind(expected)
                .execute(&self.pool)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(DbError::concurrency_conflict(
                        document.id.clone(),
                        expected_version,
                    ));
                }

                Ok(())
            }
        }
    }

    async fn query(
        &self,
        index: LookupIndex,
        partition_key: &str,
        range_key: i64,
    ) -> DbErrorResult<Vec<UserDocument>> {
        let sql = match index {
            LookupIndex::NormalizedUserName => {
                "SELECT body FROM user_documents \
                 WHERE normalized_user_name = ? AND deleted_on = ? ORDER BY rowid"
            }
            LookupIndex::NormalizedEmail => {
                "SELECT body FROM user_documents \
                 WHERE normalized_email = ? AND deleted_on = ? ORDER BY rowid"
            }
        };

        let rows = sqlx::query(sql)
            .bind(partition_key)
            .bind(range_key)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::decode_row).collect()
    }

    async fn scan(&self) -> DbErrorResult<Vec<UserDocument>> {
        let rows = sqlx::query("SELECT body FROM user_documents ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::decode_row).collect()
    }
}
