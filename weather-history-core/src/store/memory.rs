use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    Error, Result,
    filter::{Filter, Page, Sort},
    model::{NewWeatherRecord, RecordId, WeatherRecord},
};

use super::RecordStore;

/// Process-local store. Records are kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<WeatherRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<WeatherRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Copy of every stored record, in insertion order.
    pub async fn snapshot(&self) -> Vec<WeatherRecord> {
        self.records.read().await.clone()
    }

    /// Swap in a whole new record set.
    pub(crate) async fn replace(&self, records: Vec<WeatherRecord>) {
        *self.records.write().await = records;
    }

    /// Append `record` under a fresh key.
    pub(crate) fn push_new(records: &mut Vec<WeatherRecord>, record: NewWeatherRecord) -> WeatherRecord {
        let stored = WeatherRecord::from_new(record, RecordId::generate(), Utc::now());
        records.push(stored.clone());
        stored
    }

    /// Overwrite the record sharing `record.id`; `NotFound` if there is none.
    pub(crate) fn overwrite(records: &mut [WeatherRecord], mut record: WeatherRecord) -> Result<WeatherRecord> {
        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| Error::not_found(record.id.clone()))?;

        record.updated_at = Utc::now();
        *slot = record.clone();
        Ok(record)
    }

    fn select(records: &[WeatherRecord], filter: &Filter, sort: Sort) -> Vec<WeatherRecord> {
        let mut matched: Vec<WeatherRecord> =
            records.iter().filter(|r| filter.matches(r)).cloned().collect();
        sort.apply(&mut matched);
        matched
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, record: NewWeatherRecord) -> Result<WeatherRecord> {
        let stored = Self::push_new(&mut *self.records.write().await, record);

        debug!(id = %stored.id, city = %stored.location.city, "Inserted weather record");
        Ok(stored)
    }

    async fn find_one(&self, filter: &Filter, sort: Sort) -> Result<Option<WeatherRecord>> {
        let records = self.records.read().await;
        Ok(Self::select(&records, filter, sort).into_iter().next())
    }

    async fn find_many(
        &self,
        filter: &Filter,
        sort: Sort,
        page: Option<Page>,
    ) -> Result<Vec<WeatherRecord>> {
        let records = self.records.read().await;
        let matched = Self::select(&records, filter, sort);

        Ok(match page {
            Some(Page { limit, skip }) => matched.into_iter().skip(skip).take(limit).collect(),
            None => matched,
        })
    }

    async fn find_by_key(&self, key: &RecordId) -> Result<Option<WeatherRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == *key).cloned())
    }

    async fn save(&self, record: WeatherRecord) -> Result<WeatherRecord> {
        let saved = Self::overwrite(&mut self.records.write().await, record)?;

        debug!(id = %saved.id, "Saved weather record");
        Ok(saved)
    }
}
