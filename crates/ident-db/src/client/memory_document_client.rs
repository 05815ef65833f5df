use crate::client::{DocumentClient, LookupIndex, required_version};
use crate::{DbError, Result as DbErrorResult};

use ident_core::UserDocument;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Process-local document store. Index queries scan the map, so results are
/// always consistent with the latest write.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentClient {
    documents: Arc<RwLock<HashMap<String, UserDocument>>>,
}

impl MemoryDocumentClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn sorted(mut documents: Vec<UserDocument>) -> Vec<UserDocument> {
    documents.sort_by(|a, b| a.created_on.cmp(&b.created_on).then_with(|| a.id.cmp(&b.id)));
    documents
}

#[async_trait]
impl DocumentClient for MemoryDocumentClient {
    async fn get(&self, id: &str) -> DbErrorResult<Option<UserDocument>> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn put(
        &self,
        document: &UserDocument,
        expected_version: Option<i64>,
    ) -> DbErrorResult<()> {
        required_version(document)?;

        let mut documents = self.documents.write().await;

        let matches = match documents.get(&document.id) {
            None => expected_version.is_none(),
            Some(stored) => {
                expected_version.is_some() && stored.version_number == expected_version
            }
        };

        if !matches {
            return Err(DbError::concurrency_conflict(
                document.id.clone(),
                expected_version,
            ));
        }

        documents.insert(document.id.clone(), document.clone());
        Ok(())
    }

    async fn query(
        &self,
        index: LookupIndex,
        partition_key: &str,
        range_key: i64,
    ) -> DbErrorResult<Vec<UserDocument>> {
        let documents = self.documents.read().await;
        let hits = documents
            .values()
            .filter(|d| index.partition_key(d) == Some(partition_key) && d.deleted_on == range_key)
            .cloned()
            .collect();
        Ok(sorted(hits))
    }

    async fn scan(&self) -> DbErrorResult<Vec<UserDocument>> {
        let documents = self.documents.read().await;
        Ok(sorted(documents.values().cloned().collect()))
    }
}
