use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::{path::PathBuf, sync::Arc};
use tracing::debug;
use weather_history_core::{
    Config, ExportFormat, InsightProviderId, NewWeatherRecord, RawCriteria, RecordId,
    WeatherService, insight::generator_from_config, store::JsonFileStore,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-history", version, about = "Weather observation history, statistics and export")]
pub struct Cli {
    /// Records file to use instead of the configured one.
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// History filters shared by `history` and `export`.
#[derive(Debug, Clone, Args)]
pub struct CriteriaArgs {
    #[arg(long)]
    pub city: Option<String>,

    /// Inclusive lower bound (YYYY-MM-DD or RFC 3339).
    #[arg(long)]
    pub start: Option<String>,

    /// Inclusive upper bound (YYYY-MM-DD or RFC 3339).
    #[arg(long)]
    pub end: Option<String>,

    #[arg(long)]
    pub limit: Option<String>,

    #[arg(long)]
    pub skip: Option<String>,
}

impl From<CriteriaArgs> for RawCriteria {
    fn from(args: CriteriaArgs) -> Self {
        RawCriteria {
            city: args.city,
            start_date: args.start,
            end_date: args.end,
            limit: args.limit,
            skip: args.skip,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose the insight generator ("rules" or "http").
    Configure {
        provider: String,
    },

    /// Store observations from a JSON file (one object or an array).
    Ingest {
        file: PathBuf,
    },

    /// Show the most recent observation.
    Latest {
        #[arg(long)]
        city: Option<String>,
    },

    /// List observations, newest first.
    History {
        #[command(flatten)]
        criteria: CriteriaArgs,
    },

    /// Summary statistics over a trailing window.
    Stats {
        #[arg(long)]
        city: Option<String>,

        /// Window length in days; defaults to the configured value.
        #[arg(long)]
        days: Option<u32>,
    },

    /// Generate and attach an AI insight to a stored observation.
    Insight {
        id: String,
    },

    /// Export observations to CSV or XLSX.
    Export {
        #[arg(long, default_value = "csv")]
        format: String,

        /// Directory the file is written to.
        #[arg(long, default_value = ".")]
        out: PathBuf,

        #[command(flatten)]
        criteria: CriteriaArgs,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        let command = match self.command {
            Command::Configure { provider } => return configure(&mut config, &provider),
            other => other,
        };

        let service = build_service(&config, self.store).await?;

        match command {
            Command::Configure { .. } => {}
            Command::Ingest { file } => {
                let contents = std::fs::read_to_string(&file)
                    .with_context(|| format!("Failed to read {}", file.display()))?;
                let records = parse_observations(&contents)
                    .with_context(|| format!("Failed to parse observations in {}", file.display()))?;

                for record in records {
                    let stored = service.create_record(record).await?;
                    println!("{}", stored.id);
                }
            }
            Command::Latest { city } => match service.get_latest(city.as_deref()).await? {
                Some(record) => print_json(&record)?,
                None => match city {
                    Some(city) => bail!("No weather data found for city: {city}"),
                    None => bail!("No weather data available yet."),
                },
            },
            Command::History { criteria } => {
                let criteria = RawCriteria::from(criteria).parse(config.query.default_limit)?;
                let records = service.get_history(&criteria).await?;
                print_json(&records)?;
            }
            Command::Stats { city, days } => {
                let days = days.unwrap_or(config.query.default_stats_days);
                match service.get_stats(city.as_deref(), days).await? {
                    Some(stats) => print_json(&stats)?,
                    None => println!("No weather data in the last {days} days."),
                }
            }
            Command::Insight { id } => {
                let record = service.generate_insight(&RecordId::from(id)).await?;
                print_json(&record)?;
            }
            Command::Export { format, out, criteria } => {
                let format: ExportFormat = format.parse()?;
                let criteria = RawCriteria::from(criteria).parse(config.query.default_limit)?;
                let file = service.export(&criteria, format).await?;

                let path = out.join(&file.filename);
                std::fs::write(&path, &file.bytes)
                    .with_context(|| format!("Failed to write export file: {}", path.display()))?;
                println!("{} ({}, {} bytes)", path.display(), file.mime_type, file.bytes.len());
            }
        }

        Ok(())
    }
}

async fn build_service(config: &Config, store_override: Option<PathBuf>) -> anyhow::Result<WeatherService> {
    let path = match store_override {
        Some(path) => path,
        None => config.store_path()?,
    };
    debug!(path = %path.display(), "Using records file");

    let store = JsonFileStore::open(path).await?;
    let generator = generator_from_config(config)?;

    Ok(WeatherService::new(Arc::new(store), Arc::from(generator))
        .with_export_config(config.export.clone()))
}

fn configure(config: &mut Config, provider: &str) -> anyhow::Result<()> {
    let id = InsightProviderId::try_from(provider)?;

    match id {
        InsightProviderId::Rules => config.set_insight_provider(id),
        InsightProviderId::Http => {
            let endpoint = inquire::Text::new("Insight service URL:")
                .with_initial_value(config.insight.endpoint.as_deref().unwrap_or_default())
                .prompt()?;
            let api_key = inquire::Password::new("API key (leave empty for none):")
                .without_confirmation()
                .prompt()?;

            config.set_http_insight(endpoint.trim().to_string(), Some(api_key));
        }
    }

    config.save()?;
    println!("Insight provider set to '{id}' ({}).", Config::config_file_path()?.display());
    Ok(())
}

fn parse_observations(contents: &str) -> anyhow::Result<Vec<NewWeatherRecord>> {
    let value: Value = serde_json::from_str(contents)?;
    let records = match value {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<NewWeatherRecord>, _>>()?,
        other => vec![serde_json::from_value(other)?],
    };
    Ok(records)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
