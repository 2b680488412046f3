//! Store-agnostic record predicates built from query criteria.

use chrono::{DateTime, Utc};

use crate::{QueryCriteria, WeatherRecord};

/// Conjunction of the restrictions a history or stats query places on records.
///
/// The default value is the unrestricted filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Exact, case-sensitive match on `location.city`.
    pub city: Option<String>,
    /// Inclusive lower bound on `timestamp`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `timestamp`.
    pub to: Option<DateTime<Utc>>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Records observed at or after `instant`.
    pub fn since(instant: DateTime<Utc>) -> Self {
        Self {
            from: Some(instant),
            ..Self::default()
        }
    }

    pub fn for_city(mut self, city: Option<&str>) -> Self {
        self.city = city.map(str::to_string);
        self
    }

    pub fn matches(&self, record: &WeatherRecord) -> bool {
        if let Some(city) = &self.city {
            if record.location.city != *city {
                return false;
            }
        }
        if let Some(from) = self.from {
            if record.timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.timestamp > to {
                return false;
            }
        }
        true
    }
}

/// Translate criteria into a filter. Pagination is carried separately by [`Page`].
pub fn build(criteria: &QueryCriteria) -> Filter {
    Filter {
        city: criteria.city.clone(),
        from: criteria.start_date,
        to: criteria.end_date,
    }
}

/// Result ordering on the timestamp key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl Sort {
    pub fn apply(self, records: &mut [WeatherRecord]) {
        match self {
            Sort::NewestFirst => records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            Sort::OldestFirst => records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub skip: usize,
}
