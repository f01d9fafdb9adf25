//! Persistence collaborators.
//!
//! Every collection sits behind the async [`Repository`] trait. Writes return
//! the stored record so callers reconcile local state from what the store
//! actually accepted.

#[cfg(feature = "native")]
mod json;
mod memory;

#[cfg(feature = "native")]
pub use json::JsonStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::catalog::{Client, Item};
use crate::models::document::Document;
use crate::models::RecordId;

/// A record kept in an owner-scoped collection.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name (also the file stem for [`JsonStore`]).
    const COLLECTION: &'static str;

    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: RecordId);
    fn owner(&self) -> &str;
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn set_created_at(&mut self, at: DateTime<Utc>);
    fn set_updated_at(&mut self, at: DateTime<Utc>);

    /// Fix up a record just read from storage.
    fn normalize(&mut self) {}
}

macro_rules! impl_record {
    ($ty:ident, $collection:literal, $owner:ident) => {
        impl Record for $ty {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn set_id(&mut self, id: RecordId) {
                self.id = Some(id);
            }

            fn owner(&self) -> &str {
                &self.$owner
            }

            fn created_at(&self) -> Option<DateTime<Utc>> {
                self.created_at
            }

            fn set_created_at(&mut self, at: DateTime<Utc>) {
                self.created_at = Some(at);
            }

            fn set_updated_at(&mut self, at: DateTime<Utc>) {
                self.updated_at = Some(at);
            }

            impl_record!(@normalize $ty);
        }
    };
    (@normalize Document) => {
        fn normalize(&mut self) {
            self.normalize_kind();
        }
    };
    (@normalize $ty:ident) => {};
}

impl_record!(Document, "documents", user_id);
impl_record!(Client, "clients", user_id);
impl_record!(Item, "items", user_id);

/// Owner-scoped CRUD over one collection.
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Insert a new record; the store assigns `id` and `createdAt`.
    async fn create(&self, record: R) -> Result<R, StoreError>;

    /// All records of `owner`, newest first.
    async fn list(&self, owner: &str) -> Result<Vec<R>, StoreError>;

    /// One record; absent or foreign records are `NotFound`.
    async fn get(&self, owner: &str, id: &str) -> Result<R, StoreError>;

    /// Replace a stored record wholesale.
    async fn update(&self, record: R) -> Result<R, StoreError>;

    /// Remove a record immediately.
    async fn delete(&self, owner: &str, id: &str) -> Result<(), StoreError>;
}

/// Collection operations shared by the in-memory and file-backed stores.
pub(crate) mod table {
    use super::*;

    pub fn create<R: Record>(rows: &mut Vec<R>, mut record: R) -> R {
        let now = Utc::now();
        record.set_id(Uuid::new_v4().to_string());
        record.set_created_at(now);
        record.set_updated_at(now);
        rows.push(record.clone());
        record
    }

    pub fn list<R: Record>(rows: &[R], owner: &str) -> Vec<R> {
        let mut out: Vec<R> = rows
            .iter()
            .filter(|r| r.owner() == owner)
            .cloned()
            .map(|mut r| {
                r.normalize();
                r
            })
            .collect();
        out.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        out
    }

    fn position<R: Record>(rows: &[R], owner: &str, id: &str) -> Result<usize, StoreError> {
        rows.iter()
            .position(|r| r.id() == Some(id) && r.owner() == owner)
            .ok_or_else(|| StoreError::not_found(R::COLLECTION, id))
    }

    pub fn get<R: Record>(rows: &[R], owner: &str, id: &str) -> Result<R, StoreError> {
        let mut record = rows[position(rows, owner, id)?].clone();
        record.normalize();
        Ok(record)
    }

    pub fn update<R: Record>(rows: &mut [R], mut record: R) -> Result<R, StoreError> {
        let id = record.id().ok_or(StoreError::Unsaved)?.to_string();
        let index = position(rows, record.owner(), &id)?;
        if let Some(created) = rows[index].created_at() {
            record.set_created_at(created);
        }
        record.set_updated_at(Utc::now());
        rows[index] = record.clone();
        Ok(record)
    }

    pub fn delete<R: Record>(rows: &mut Vec<R>, owner: &str, id: &str) -> Result<(), StoreError> {
        let index = position(rows, owner, id)?;
        rows.remove(index);
        Ok(())
    }
}
