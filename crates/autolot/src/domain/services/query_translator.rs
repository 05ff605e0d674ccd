//! Query Translator
//!
//! Turns listing filters into a dialect-neutral [`ListQuery`] and store rows
//! into the public [`Vehicle`] shape.
//!
//! Policy:
//! - a year range (`minYear` and/or `maxYear`) wins over an exact `year`
//! - `search` is a literal, case-insensitive substring match on title, make,
//!   model and description
//! - `make` is a case-insensitive exact match
//! - results are always newest first
//! - distinct makes are deduplicated case-sensitively, so `"TOYOTA"` and
//!   `"Toyota"` are listed separately

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Vehicle, VehicleRecord};
use crate::domain::errors::DomainError;

/// Filters as they arrive in a query string: every value is untyped text
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawListFilters {
    pub search: Option<String>,
    pub make: Option<String>,
    pub year: Option<String>,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
}

/// Typed listing filters. Every field is optional; absent means unconstrained.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListFilters {
    pub search: Option<String>,
    pub make: Option<String>,
    pub year: Option<i32>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

impl ListFilters {
    /// Parse query-string filters. Blank values count as absent.
    ///
    /// Fails with [`DomainError::Validation`] naming the first field that
    /// is not an integer where one is expected.
    pub fn parse(raw: &RawListFilters) -> Result<Self, DomainError> {
        Ok(Self {
            search: non_blank(raw.search.as_deref()),
            make: non_blank(raw.make.as_deref()),
            year: parse_year("year", raw.year.as_deref())?,
            min_year: parse_year("minYear", raw.min_year.as_deref())?,
            max_year: parse_year("maxYear", raw.max_year.as_deref())?,
        })
    }
}

/// Constraint on the model year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearConstraint {
    #[default]
    Any,
    Exact(i32),
    /// Inclusive bounds; at least one is set
    Range { min: Option<i32>, max: Option<i32> },
}

impl YearConstraint {
    pub fn admits(&self, year: i32) -> bool {
        match *self {
            YearConstraint::Any => true,
            YearConstraint::Exact(wanted) => year == wanted,
            YearConstraint::Range { min, max } => {
                min.map_or(true, |min| year >= min) && max.map_or(true, |max| year <= max)
            }
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    CreatedAtDesc,
}

/// Store-agnostic listing query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListQuery {
    /// Trimmed, non-empty search text
    pub search: Option<String>,
    /// Trimmed, non-empty make
    pub make: Option<String>,
    pub year: YearConstraint,
    pub order: SortOrder,
}

impl ListQuery {
    /// Whether `record` satisfies every constraint of this query.
    ///
    /// Stores that evaluate in-process use this directly; SQL adapters must
    /// produce the same result set.
    pub fn matches(&self, record: &VehicleRecord) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = [
                &record.title,
                &record.make,
                &record.model,
                &record.description,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(make) = &self.make {
            if record.make.to_lowercase() != make.to_lowercase() {
                return false;
            }
        }

        self.year.admits(record.year)
    }
}

/// Build the listing query for `filters`
pub fn build_list_query(filters: &ListFilters) -> ListQuery {
    let year = if filters.min_year.is_some() || filters.max_year.is_some() {
        YearConstraint::Range {
            min: filters.min_year,
            max: filters.max_year,
        }
    } else if let Some(year) = filters.year {
        YearConstraint::Exact(year)
    } else {
        YearConstraint::Any
    };

    ListQuery {
        search: non_blank(filters.search.as_deref()),
        make: non_blank(filters.make.as_deref()),
        year,
        order: SortOrder::CreatedAtDesc,
    }
}

/// Order raw make values for a filter dropdown: ascending, no duplicates
pub fn distinct_makes(mut makes: Vec<String>) -> Vec<String> {
    makes.sort();
    makes.dedup();
    makes
}

/// Order raw year values for a filter dropdown: descending, no duplicates
pub fn distinct_years(mut years: Vec<i32>) -> Vec<i32> {
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Map a store row to the public shape
pub fn normalize(record: VehicleRecord) -> Vehicle {
    Vehicle {
        id: record.record_id.to_string(),
        title: record.title,
        make: record.make,
        model: record.model,
        year: record.year,
        price: record.price,
        images: record.images,
        description: record.description,
        mileage: record.mileage,
        color: record.color,
        fuel_type: record.fuel_type,
        transmission: record.transmission,
        seller_phone: record.seller_phone,
        sold: record.sold,
        created_at: to_iso8601(record.created_at),
        updated_at: to_iso8601(record.updated_at),
    }
}

/// `2024-05-01T09:30:00.000Z`
pub fn to_iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_year(field: &str, value: Option<&str>) -> Result<Option<i32>, DomainError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse::<i32>().map(Some).map_err(|_| {
            DomainError::validation(format!("{} must be an integer, got {:?}", field, text))
        }),
    }
}
