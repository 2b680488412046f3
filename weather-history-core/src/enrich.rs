use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::{
    Error, Result,
    insight::InsightGenerator,
    model::{AiInsight, RecordId, WeatherRecord},
    store::RecordStore,
};

/// Attach a freshly generated insight to the record stored under `key`.
///
/// Any previous insight is replaced in full. Exactly one `save` is issued; concurrent
/// enrichments of the same key resolve as last write wins.
///
/// `generatedAt` is never earlier than the observation and always later than the insight it
/// replaces, even when the clock reads behind either of them.
pub async fn enrich(
    store: &dyn RecordStore,
    generator: &dyn InsightGenerator,
    key: &RecordId,
    now: DateTime<Utc>,
) -> Result<WeatherRecord> {
    let mut record = store.find_by_key(key).await?.ok_or_else(|| {
        warn!(%key, "Insight requested for unknown record");
        Error::not_found(key.clone())
    })?;

    let draft = generator.generate(&record.insight_request()).await.inspect_err(|e| {
        warn!(%key, error = %e, "Insight generator failed");
    })?;

    let after_previous = record
        .ai_insight
        .as_ref()
        .and_then(|i| i.generated_at.checked_add_signed(Duration::milliseconds(1)));
    let generated_at = after_previous.map_or(now, |floor| now.max(floor)).max(record.timestamp);
    record.ai_insight = Some(AiInsight::from_draft(draft, generated_at));

    debug!(%key, %generated_at, "Persisting enriched record");
    store.save(record).await
}
