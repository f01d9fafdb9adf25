//! File-backed store: one pretty JSON array per collection.

use async_trait::async_trait;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::{table, Record, Repository};
use crate::error::StoreError;

/// Stores `R` in `<dir>/<collection>.json`, rewriting the file on each write.
#[derive(Debug)]
pub struct JsonStore<R> {
    path: PathBuf,
    lock: Mutex<()>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> JsonStore<R> {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", R::COLLECTION)),
            lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<R>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, rows: &[R]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(rows)?).await?;
        fs::rename(&tmp, &self.path).await?;
        trace!("Wrote {} {} records to {}", rows.len(), R::COLLECTION, self.path.display());
        Ok(())
    }
}

#[async_trait]
impl<R: Record> Repository<R> for JsonStore<R> {
    async fn create(&self, record: R) -> Result<R, StoreError> {
        let _guard = self.lock.lock().await;
        let mut rows = self.load().await?;
        let created = table::create(&mut rows, record);
        self.persist(&rows).await?;
        debug!("Created {} record {:?}", R::COLLECTION, created.id());
        Ok(created)
    }

    async fn list(&self, owner: &str) -> Result<Vec<R>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(table::list(&self.load().await?, owner))
    }

    async fn get(&self, owner: &str, id: &str) -> Result<R, StoreError> {
        let _guard = self.lock.lock().await;
        table::get(&self.load().await?, owner, id)
    }

    async fn update(&self, record: R) -> Result<R, StoreError> {
        let _guard = self.lock.lock().await;
        let mut rows = self.load().await?;
        let updated = table::update(&mut rows, record)?;
        self.persist(&rows).await?;
        Ok(updated)
    }

    async fn delete(&self, owner: &str, id: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut rows = self.load().await?;
        table::delete(&mut rows, owner, id)?;
        self.persist(&rows).await?;
        debug!("Deleted {} record {}", R::COLLECTION, id);
        Ok(())
    }
}
