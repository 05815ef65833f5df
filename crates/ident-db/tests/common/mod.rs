#![allow(dead_code)]

use ident_core::{Claim, UserLoginInfo, UserRecord};
use ident_db::{MemoryDocumentClient, SqliteDocumentClient, UserStore};

use tempfile::TempDir;

pub fn memory_store() -> UserStore<MemoryDocumentClient> {
    UserStore::new(MemoryDocumentClient::new())
}

/// File-backed store; keep the `TempDir` alive for the duration of the test.
pub async fn sqlite_store() -> (TempDir, UserStore<SqliteDocumentClient>) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let client = SqliteDocumentClient::connect(temp.path().join("db/identity.db"), 5)
        .await
        .expect("Failed to open test database");
    (temp, UserStore::new(client))
}

/// Creates a test user with a claim and an external login
pub fn create_test_user(user_name: &str) -> UserRecord {
    let mut user = UserRecord::with_email(user_name, &format!("{user_name}@example.com"))
        .expect("valid user");
    user.set_password_hash(Some("hash"));
    user.set_security_stamp("stamp");
    user.add_claim(&Claim::new("role", "member")).expect("valid claim");
    user.add_login(&UserLoginInfo::new("github", format!("gh-{user_name}"), None))
        .expect("valid login");
    user
}
