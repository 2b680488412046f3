use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

use crate::{
    Config,
    model::{InsightDraft, InsightRequest},
};

pub mod http;
pub mod rules;

pub use http::HttpInsightGenerator;
pub use rules::RuleBasedInsightGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsightProviderId {
    Rules,
    Http,
}

impl InsightProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightProviderId::Rules => "rules",
            InsightProviderId::Http => "http",
        }
    }

    pub const fn all() -> &'static [InsightProviderId] {
        &[InsightProviderId::Rules, InsightProviderId::Http]
    }
}

impl std::fmt::Display for InsightProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for InsightProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "rules" => Ok(InsightProviderId::Rules),
            "http" => Ok(InsightProviderId::Http),
            _ => Err(anyhow::anyhow!(
                "Unknown insight provider '{value}'. Supported providers: rules, http."
            )),
        }
    }
}

/// Turns the narrative projection of a record into insight text.
#[async_trait]
pub trait InsightGenerator: Send + Sync + Debug {
    async fn generate(&self, request: &InsightRequest) -> crate::Result<InsightDraft>;
}

/// Construct the configured insight generator.
pub fn generator_from_config(config: &Config) -> anyhow::Result<Box<dyn InsightGenerator>> {
    let id = config.insight_provider_id()?;

    let boxed: Box<dyn InsightGenerator> = match id {
        InsightProviderId::Rules => Box::new(RuleBasedInsightGenerator),
        InsightProviderId::Http => {
            let endpoint = config.insight.endpoint.as_deref().ok_or_else(|| {
                anyhow::anyhow!(
                    "No endpoint configured for insight provider '{id}'.\n\
                     Hint: run `weather-history configure` and enter the generator URL."
                )
            })?;

            Box::new(HttpInsightGenerator::new(
                endpoint.to_owned(),
                config.insight.api_key.clone(),
                Duration::from_secs(config.insight.timeout_secs),
            )?)
        }
    };

    Ok(boxed)
}
