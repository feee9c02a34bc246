//! Small hand-built tables shared by the unit tests.

use super::model::{Indicator, IndicatorRecord, IndicatorTable, Year};

pub fn record(country: &str, year: i64) -> IndicatorRecord {
    IndicatorRecord::new(country, Year::parse(&year.to_string()))
}

/// Brazil 2020/2021, Argentina 2021 (no GDP, zero PPP), Chile 2019..2021
/// stored out of year order.
pub fn south_america() -> IndicatorTable {
    IndicatorTable::from_records(vec![
        record("Brazil", 2021)
            .with(Indicator::Population, 214_300_000.0)
            .with(Indicator::Gdp, 2_100_000_000_000.0)
            .with(Indicator::GdpPerCapita, 9_800.0)
            .with(Indicator::InflationRate, 8.3)
            .with(Indicator::Ppp, 2.5),
        record("Argentina", 2021)
            .with(Indicator::Population, 45_800_000.0)
            .with(Indicator::Ppp, 0.0),
        record("Brazil", 2020)
            .with(Indicator::Population, 213_200_000.0)
            .with(Indicator::Gdp, 2_000_000_000_000.0)
            .with(Indicator::Ppp, 2.4),
        record("Chile", 2019).with(Indicator::Gdp, 278_000_000_000.0),
        record("Chile", 2021).with(Indicator::Gdp, 317_000_000_000.0),
        record("Chile", 2020).with(Indicator::Gdp, 254_000_000_000.0),
    ])
}
