use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::{
    Result,
    clock::{Clock, SystemClock},
    criteria::QueryCriteria,
    enrich,
    export::{self, ExportConfig, ExportFormat, ExportedFile},
    filter::{self, Filter, Sort},
    insight::InsightGenerator,
    model::{NewWeatherRecord, RecordId, WeatherRecord},
    stats::{self, WeatherStats},
    store::RecordStore,
};

/// Entry point for every operation exposed to a transport layer.
#[derive(Debug, Clone)]
pub struct WeatherService {
    store: Arc<dyn RecordStore>,
    generator: Arc<dyn InsightGenerator>,
    clock: Arc<dyn Clock>,
    export_config: ExportConfig,
}

impl WeatherService {
    pub fn new(store: Arc<dyn RecordStore>, generator: Arc<dyn InsightGenerator>) -> Self {
        Self {
            store,
            generator,
            clock: Arc::new(SystemClock),
            export_config: ExportConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_export_config(mut self, config: ExportConfig) -> Self {
        self.export_config = config;
        self
    }

    #[instrument(skip_all, fields(city = %record.location.city, timestamp = %record.timestamp))]
    pub async fn create_record(&self, record: NewWeatherRecord) -> Result<WeatherRecord> {
        let stored = self.store.insert(record).await?;
        info!(id = %stored.id, source = %stored.source, "Weather record created");
        Ok(stored)
    }

    #[instrument(skip(self))]
    pub async fn get_latest(&self, city: Option<&str>) -> Result<Option<WeatherRecord>> {
        let latest = self.store.find_one(&Filter::all().for_city(city), Sort::NewestFirst).await?;
        if latest.is_none() {
            warn!("No weather data available");
        }
        Ok(latest)
    }

    #[instrument(skip(self))]
    pub async fn get_history(&self, criteria: &QueryCriteria) -> Result<Vec<WeatherRecord>> {
        let filter = filter::build(criteria);
        let records = self
            .store
            .find_many(&filter, Sort::NewestFirst, Some(criteria.page()))
            .await?;

        info!(count = records.len(), "Weather history retrieved");
        Ok(records)
    }

    #[instrument(skip(self))]
    pub async fn get_stats(&self, city: Option<&str>, days: u32) -> Result<Option<WeatherStats>> {
        let result = stats::compute_stats(self.store.as_ref(), city, days, self.clock.now()).await?;

        match &result {
            Some(s) => info!(total_records = s.total_records, "Weather statistics calculated"),
            None => info!("No records in statistics window"),
        }
        Ok(result)
    }

    #[instrument(skip(self))]
    pub async fn generate_insight(&self, key: &RecordId) -> Result<WeatherRecord> {
        let record =
            enrich::enrich(self.store.as_ref(), self.generator.as_ref(), key, self.clock.now()).await?;
        info!("Insight generated");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn export(&self, criteria: &QueryCriteria, format: ExportFormat) -> Result<ExportedFile> {
        let records = self.get_history(criteria).await?;
        let file = export::export(&records, format, &self.export_config, self.clock.now())?;

        info!(filename = %file.filename, bytes = file.bytes.len(), "Export ready");
        Ok(file)
    }
}
