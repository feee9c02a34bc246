/// Data layer: core types, loading, querying and chart preparation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → IndicatorTable (once, at startup)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  QueryEngine  │  latest record per country, country × year filter
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ metric / series   │  headline strings, per-country chart lines
///   └──────────────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod metric;
pub mod model;
pub mod query;
pub mod series;

#[cfg(test)]
pub(crate) mod fixtures;
