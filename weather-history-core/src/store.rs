use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Result,
    filter::{Filter, Page, Sort},
    model::{NewWeatherRecord, RecordId, WeatherRecord},
};

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Read/write access to persisted weather records.
///
/// Implementations own key assignment and the `createdAt`/`updatedAt` bookkeeping.
#[async_trait]
pub trait RecordStore: Send + Sync + Debug {
    async fn insert(&self, record: NewWeatherRecord) -> Result<WeatherRecord>;

    async fn find_one(&self, filter: &Filter, sort: Sort) -> Result<Option<WeatherRecord>>;

    /// `page = None` returns every match.
    async fn find_many(
        &self,
        filter: &Filter,
        sort: Sort,
        page: Option<Page>,
    ) -> Result<Vec<WeatherRecord>>;

    async fn find_by_key(&self, key: &RecordId) -> Result<Option<WeatherRecord>>;

    /// Replace the stored record with the same key. Fails with `NotFound` for unknown keys.
    async fn save(&self, record: WeatherRecord) -> Result<WeatherRecord>;
}
