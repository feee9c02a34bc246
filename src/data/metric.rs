use std::fmt;

use super::model::{Indicator, IndicatorRecord};

// ---------------------------------------------------------------------------
// Display transform per indicator
// ---------------------------------------------------------------------------

/// Linear scale, affixes and precision used to present one indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldFormat {
    pub scale: f64,
    pub prefix: &'static str,
    pub suffix: &'static str,
    pub precision: usize,
}

impl FieldFormat {
    const fn new(scale: f64, prefix: &'static str, suffix: &'static str, precision: usize) -> Self {
        FieldFormat {
            scale,
            prefix,
            suffix,
            precision,
        }
    }

    /// Format a raw value: divide by `scale`, fix precision, add affixes.
    pub fn apply(&self, raw: f64) -> String {
        format!(
            "{}{:.*}{}",
            self.prefix,
            self.precision,
            raw / self.scale,
            self.suffix
        )
    }
}

const PERCENT: FieldFormat = FieldFormat::new(1.0, "", "%", 2);

impl Indicator {
    /// The fixed display transform for this indicator.
    pub fn format(self) -> FieldFormat {
        match self {
            Indicator::Population => FieldFormat::new(1_000_000.0, "", " M", 1),
            Indicator::Gdp => FieldFormat::new(1_000_000_000.0, "$", " B", 2),
            Indicator::GdpPerCapita | Indicator::GniPerCapita => {
                FieldFormat::new(1_000.0, "$", " K", 2)
            }
            Indicator::Ppp => FieldFormat::new(1.0, "", "", 2),
            Indicator::LifeExpectancy => FieldFormat::new(1.0, "", " yrs", 1),
            Indicator::InflationRate
            | Indicator::UrbanPopulation
            | Indicator::AccessToElectricity
            | Indicator::RenewableEnergyConsumption
            | Indicator::InternetUsers
            | Indicator::Poverty
            | Indicator::EmploymentToPopulation
            | Indicator::EducationExpenditure => PERCENT,
        }
    }
}

// ---------------------------------------------------------------------------
// MetricValue
// ---------------------------------------------------------------------------

/// A formatted headline value, or the "no data" sentinel (never zero).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricValue {
    NoData,
    Value(String),
}

impl MetricValue {
    pub fn is_no_data(&self) -> bool {
        matches!(self, MetricValue::NoData)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::NoData => f.write_str("No data found"),
            MetricValue::Value(s) => f.write_str(s),
        }
    }
}

/// Format `indicator` of `record` using its display transform.
pub fn metric_value(record: &IndicatorRecord, indicator: Indicator) -> MetricValue {
    match record.get(indicator) {
        Some(v) if v.is_finite() => MetricValue::Value(indicator.format().apply(v)),
        _ => MetricValue::NoData,
    }
}

// ---------------------------------------------------------------------------
// Headline cards
// ---------------------------------------------------------------------------

/// One of the metric cards shown above the comparison charts.
#[derive(Debug, Clone, Copy)]
pub struct HeadlineMetric {
    pub indicator: Indicator,
    pub label: &'static str,
}

pub const HEADLINE_METRICS: [HeadlineMetric; 4] = [
    HeadlineMetric {
        indicator: Indicator::Population,
        label: "Total Population (millions)",
    },
    HeadlineMetric {
        indicator: Indicator::Gdp,
        label: "GDP (billions $)",
    },
    HeadlineMetric {
        indicator: Indicator::GdpPerCapita,
        label: "GDP Per Capita (thousands $)",
    },
    HeadlineMetric {
        indicator: Indicator::InflationRate,
        label: "Inflation Rate",
    },
];
