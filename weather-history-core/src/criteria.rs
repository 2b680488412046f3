//! History query criteria, in typed and caller-supplied string form.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{Error, Result, filter::Page};

pub const DEFAULT_LIMIT: usize = 10;

/// Typed criteria for a history query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCriteria {
    pub city: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: usize,
    pub skip: usize,
}

impl Default for QueryCriteria {
    fn default() -> Self {
        Self {
            city: None,
            start_date: None,
            end_date: None,
            limit: DEFAULT_LIMIT,
            skip: 0,
        }
    }
}

impl QueryCriteria {
    pub fn for_city(city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..Self::default()
        }
    }

    pub fn page(&self) -> Page {
        Page {
            limit: self.limit,
            skip: self.skip,
        }
    }
}

/// Criteria exactly as a caller sent them (query-string style).
#[derive(Debug, Clone, Default)]
pub struct RawCriteria {
    pub city: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<String>,
    pub skip: Option<String>,
}

impl RawCriteria {
    /// Validate and convert into typed criteria.
    ///
    /// `default_limit` applies when no limit is given or the limit is `0`. A blank city counts as
    /// absent; any other city is kept verbatim.
    pub fn parse(&self, default_limit: usize) -> Result<QueryCriteria> {
        let city = self.city.clone().filter(|c| !c.trim().is_empty());

        let start_date = self.start_date.as_deref().map(|s| parse_date_bound("startDate", s)).transpose()?;
        let end_date = self.end_date.as_deref().map(|s| parse_date_bound("endDate", s)).transpose()?;

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(Error::validation(format!(
                    "startDate ({start}) must not be after endDate ({end})"
                )));
            }
        }

        let limit = match self.limit.as_deref() {
            Some(s) => match parse_count("limit", s)? {
                0 => default_limit,
                n => n,
            },
            None => default_limit,
        };
        let skip = match self.skip.as_deref() {
            Some(s) => parse_count("skip", s)?,
            None => 0,
        };

        Ok(QueryCriteria {
            city,
            start_date,
            end_date,
            limit,
            skip,
        })
    }
}

/// Accepts an RFC 3339 instant or a bare `YYYY-MM-DD`, which means UTC midnight.
pub fn parse_date_bound(field: &str, value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
        .ok_or_else(|| {
            Error::validation(format!(
                "{field} '{value}' is not a valid date (expected YYYY-MM-DD or RFC 3339)"
            ))
        })
}

fn parse_count(field: &str, value: &str) -> Result<usize> {
    value.trim().parse::<usize>().map_err(|_| {
        Error::validation(format!("{field} must be a non-negative integer, got '{value}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_raw_criteria_yield_defaults() {
        let criteria = RawCriteria::default().parse(DEFAULT_LIMIT).expect("defaults are valid");
        assert_eq!(criteria, QueryCriteria::default());
    }

    #[test]
    fn plain_date_means_utc_midnight() {
        let dt = parse_date_bound("startDate", "2024-03-01").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn rfc3339_offsets_are_normalized() {
        let dt = parse_date_bound("endDate", "2024-03-01T09:00:00-03:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn malformed_date_is_validation_failure() {
        let raw = RawCriteria {
            start_date: Some("yesterday".into()),
            ..RawCriteria::default()
        };
        let err = raw.parse(DEFAULT_LIMIT).unwrap_err();

        assert!(matches!(err, Error::ValidationFailed { .. }));
        assert!(err.to_string().contains("startDate 'yesterday'"));
    }

    #[test]
    fn negative_limit_is_rejected() {
        let raw = RawCriteria {
            limit: Some("-5".into()),
            ..RawCriteria::default()
        };
        assert!(matches!(raw.parse(DEFAULT_LIMIT), Err(Error::ValidationFailed { .. })));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let raw = RawCriteria {
            start_date: Some("2024-03-02".into()),
            end_date: Some("2024-03-01".into()),
            ..RawCriteria::default()
        };
        assert!(matches!(raw.parse(DEFAULT_LIMIT), Err(Error::ValidationFailed { .. })));
    }

    #[test]
    fn blank_city_counts_as_absent() {
        let raw = RawCriteria {
            city: Some("   ".into()),
            limit: Some("25".into()),
            skip: Some("5".into()),
            ..RawCriteria::default()
        };
        let criteria = raw.parse(DEFAULT_LIMIT).unwrap();

        assert_eq!(criteria.city, None);
        assert_eq!(criteria.page(), Page { limit: 25, skip: 5 });
    }

    #[test]
    fn zero_limit_falls_back_to_default() {
        let raw = RawCriteria {
            limit: Some("0".into()),
            ..RawCriteria::default()
        };
        assert_eq!(raw.parse(DEFAULT_LIMIT).unwrap().limit, DEFAULT_LIMIT);
        assert_eq!(raw.parse(3).unwrap().limit, 3);
    }

    #[test]
    fn city_is_kept_verbatim() {
        let raw = RawCriteria {
            city: Some(" Recife".into()),
            ..RawCriteria::default()
        };
        assert_eq!(raw.parse(DEFAULT_LIMIT).unwrap().city.as_deref(), Some(" Recife"));
    }
}
