pub mod client;
pub mod error;
pub mod store;


pub use client::memory_document_client::MemoryDocumentClient;
pub use client::sqlite_document_client::SqliteDocumentClient;
pub use client::{DocumentClient, LookupIndex};
pub use error::{DbError, Result};
pub use store::user_store::{FIRST_VERSION, UserStore};
