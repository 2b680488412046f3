use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
    Error, Result,
    filter::{Filter, Page, Sort},
    model::{NewWeatherRecord, RecordId, WeatherRecord},
};

use super::{MemoryStore, RecordStore};

/// Store backed by a JSON array on disk.
///
/// Every mutation writes the whole candidate set to disk first and only then makes it visible
/// to readers. `write_lock` serializes mutations so a stale snapshot never overwrites a newer file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the file at `path`, or start empty if it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let records: Vec<WeatherRecord> = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                Error::store_with(format!("Failed to parse records file: {}", path.display()), e)
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(Error::store_with(
                    format!("Failed to read records file: {}", path.display()),
                    e,
                ));
            }
        };

        info!(path = %path.display(), records = records.len(), "Opened JSON record store");

        Ok(Self {
            path,
            inner: MemoryStore::with_records(records),
            write_lock: Mutex::new(()),
        })
    }

    async fn persist(&self, records: &[WeatherRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::store_with(format!("Failed to create store directory: {}", parent.display()), e)
            })?;
        }

        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| Error::store_with("Failed to serialize records", e))?;

        tokio::fs::write(&self.path, json).await.map_err(|e| {
            Error::store_with(format!("Failed to write records file: {}", self.path.display()), e)
        })?;

        debug!(path = %self.path.display(), records = records.len(), "Flushed record store");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn insert(&self, record: NewWeatherRecord) -> Result<WeatherRecord> {
        let _guard = self.write_lock.lock().await;

        let mut candidate = self.inner.snapshot().await;
        let stored = MemoryStore::push_new(&mut candidate, record);
        self.persist(&candidate).await?;
        self.inner.replace(candidate).await;

        debug!(id = %stored.id, city = %stored.location.city, "Inserted weather record");
        Ok(stored)
    }

    async fn find_one(&self, filter: &Filter, sort: Sort) -> Result<Option<WeatherRecord>> {
        self.inner.find_one(filter, sort).await
    }

    async fn find_many(
        &self,
        filter: &Filter,
        sort: Sort,
        page: Option<Page>,
    ) -> Result<Vec<WeatherRecord>> {
        self.inner.find_many(filter, sort, page).await
    }

    async fn find_by_key(&self, key: &RecordId) -> Result<Option<WeatherRecord>> {
        self.inner.find_by_key(key).await
    }

    async fn save(&self, record: WeatherRecord) -> Result<WeatherRecord> {
        let _guard = self.write_lock.lock().await;

        let mut candidate = self.inner.snapshot().await;
        let saved = MemoryStore::overwrite(&mut candidate, record)?;
        self.persist(&candidate).await?;
        self.inner.replace(candidate).await;

        debug!(id = %saved.id, "Saved weather record");
        Ok(saved)
    }
}
