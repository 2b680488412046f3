//! Core library for the `weather-history` service.
//!
//! This crate defines:
//! - The weather record model and typed query criteria
//! - Filter building, rolling statistics and insight enrichment
//! - CSV / XLSX export encoding
//! - Abstractions over record stores and insight generators, with reference implementations
//! - Configuration handling
//!
//! [`WeatherService`] ties these together and is the surface a transport layer calls.

pub mod clock;
pub mod config;
pub mod criteria;
pub mod enrich;
pub mod error;
pub mod export;
pub mod filter;
pub mod insight;
pub mod model;
pub mod service;
pub mod stats;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use config::Config;
pub use criteria::{QueryCriteria, RawCriteria};
pub use error::{Error, Result};
pub use export::{ExportConfig, ExportFormat, ExportedFile};
pub use filter::Filter;
pub use insight::{InsightGenerator, InsightProviderId};
pub use model::{AiInsight, NewWeatherRecord, RecordId, WeatherRecord};
pub use service::WeatherService;
pub use stats::WeatherStats;
pub use store::RecordStore;
