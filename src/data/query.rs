use std::collections::BTreeSet;

use thiserror::Error;

use super::filter::{self, Selection};
use super::metric::{self, MetricValue};
use super::model::{Indicator, IndicatorRecord, IndicatorTable, Year};

pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("no records found for country '{country}'")]
    NotFound { country: String },
}

// ---------------------------------------------------------------------------
// QueryEngine – read-only queries over a loaded table
// ---------------------------------------------------------------------------

/// Owns the immutable [`IndicatorTable`] and answers selection queries.
///
/// Every query is a pure function of the table and its arguments.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    table: IndicatorTable,
}

impl QueryEngine {
    pub fn new(table: IndicatorTable) -> Self {
        QueryEngine { table }
    }

    /// Countries available for selection, in first-appearance order.
    pub fn countries(&self) -> &[String] {
        self.table.countries()
    }

    /// Year labels available for selection, ascending.
    pub fn years(&self) -> &[Year] {
        self.table.years()
    }

    pub fn contains_country(&self, country: &str) -> bool {
        self.countries().iter().any(|c| c == country)
    }

    /// The record with the greatest year for `country`.
    ///
    /// When the latest year is duplicated, the first such row in table order
    /// is returned.
    pub fn latest_record(&self, country: &str) -> QueryResult<&IndicatorRecord> {
        self.table
            .records()
            .iter()
            .filter(|rec| rec.country() == country)
            .reduce(|best, rec| if rec.year() > best.year() { rec } else { best })
            .ok_or_else(|| QueryError::NotFound {
                country: country.to_string(),
            })
    }

    /// Records whose country is in `countries` and year label in `years`,
    /// in table order.
    pub fn filter_records(
        &self,
        countries: &BTreeSet<String>,
        years: &BTreeSet<String>,
    ) -> Vec<&IndicatorRecord> {
        let rows = filter::filter_records(&self.table, countries, years);
        log::debug!(
            "Selection of {} countries x {} years matched {} rows",
            countries.len(),
            years.len(),
            rows.len()
        );
        rows
    }

    /// Shorthand for [`QueryEngine::filter_records`] over a [`Selection`].
    pub fn select(&self, selection: &Selection) -> Vec<&IndicatorRecord> {
        self.filter_records(&selection.countries, &selection.years)
    }

    pub fn metric_value(&self, record: &IndicatorRecord, indicator: Indicator) -> MetricValue {
        metric::metric_value(record, indicator)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
