//! In-process store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{table, Record, Repository};
use crate::error::StoreError;

/// Keeps one collection in memory.
#[derive(Debug)]
pub struct MemoryStore<R> {
    rows: RwLock<Vec<R>>,
}

impl<R: Record> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl<R: Record> Repository<R> for MemoryStore<R> {
    async fn create(&self, record: R) -> Result<R, StoreError> {
        let created = table::create(&mut *self.rows.write().await, record);
        debug!("Created {} record {:?}", R::COLLECTION, created.id());
        Ok(created)
    }

    async fn list(&self, owner: &str) -> Result<Vec<R>, StoreError> {
        Ok(table::list(&self.rows.read().await, owner))
    }

    async fn get(&self, owner: &str, id: &str) -> Result<R, StoreError> {
        table::get(&self.rows.read().await, owner, id)
    }

    async fn update(&self, record: R) -> Result<R, StoreError> {
        table::update(&mut self.rows.write().await, record)
    }

    async fn delete(&self, owner: &str, id: &str) -> Result<(), StoreError> {
        table::delete(&mut *self.rows.write().await, owner, id)?;
        debug!("Deleted {} record {}", R::COLLECTION, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::Client;
    use crate::models::document::{Document, DocumentKind, Status};
    use chrono::NaiveDate;

    fn client(owner: &str, name: &str) -> Client {
        Client::new(owner.to_string(), name, format!("{}@example.com", name))
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let store = MemoryStore::new();
        let created = store.create(client("u1", "acme")).await.unwrap();
        assert!(created.id.is_some());
        assert!(created.created_at.is_some());
        assert_eq!(store.get("u1", created.id.as_deref().unwrap()).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_owner_scoping() {
        let store = MemoryStore::new();
        let theirs = store.create(client("u2", "beta")).await.unwrap();
        store.create(client("u1", "acme")).await.unwrap();

        let mine = store.list("u1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].name, "acme");

        let id = theirs.id.unwrap();
        assert!(matches!(store.get("u1", &id).await, Err(StoreError::NotFound { .. })));
        assert!(matches!(store.delete("u1", &id).await, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_replaces_and_keeps_created_at() {
        let store = MemoryStore::new();
        let created = store.create(client("u1", "acme")).await.unwrap();

        let mut changed = created.clone();
        changed.phone = "555-0100".to_string();
        changed.created_at = None;
        let updated = store.update(changed).await.unwrap();

        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(store.list("u1").await.unwrap()[0].phone, "555-0100");
    }

    #[tokio::test]
    async fn test_update_unsaved_record() {
        let store: MemoryStore<Client> = MemoryStore::new();
        assert!(matches!(store.update(client("u1", "x")).await, Err(StoreError::Unsaved)));
    }

    #[tokio::test]
    async fn test_delete_is_immediate() {
        let store = MemoryStore::new();
        let created = store.create(client("u1", "acme")).await.unwrap();
        let id = created.id.unwrap();
        store.delete("u1", &id).await.unwrap();
        assert!(store.list("u1").await.unwrap().is_empty());
        assert!(store.delete("u1", &id).await.is_err());
    }

    #[tokio::test]
    async fn test_documents_normalized_on_read() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut legacy = Document::new_invoice("u1".to_string(), "7", date, 30);
        legacy.status = Status::Quote;
        let store = MemoryStore::new();
        let created = store.create(legacy).await.unwrap();
        let read = store.get("u1", created.id.as_deref().unwrap()).await.unwrap();
        assert_eq!(read.kind, DocumentKind::Quote);
    }
}
