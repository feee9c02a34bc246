use std::collections::BTreeSet;

use super::model::{Indicator, IndicatorRecord, Year};

// ---------------------------------------------------------------------------
// Chart values: raw indicators plus derived columns
// ---------------------------------------------------------------------------

/// The y-value plotted by a comparison chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartValue {
    Indicator(Indicator),
    /// `1 / PPP`, so that higher values mean stronger purchasing power.
    InversePpp,
}

impl ChartValue {
    /// Evaluate for one record. Absent inputs give absent outputs.
    pub fn of(self, record: &IndicatorRecord) -> Option<f64> {
        match self {
            ChartValue::Indicator(ind) => record.get(ind),
            ChartValue::InversePpp => inverse_ppp(record),
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            ChartValue::Indicator(ind) => ind.display_name(),
            ChartValue::InversePpp => "1/PPP",
        }
    }
}

/// `1 / PPP`, or `None` when PPP is absent, zero or not finite.
pub fn inverse_ppp(record: &IndicatorRecord) -> Option<f64> {
    record
        .get(Indicator::Ppp)
        .filter(|ppp| *ppp != 0.0)
        .map(|ppp| 1.0 / ppp)
        .filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Tabs and chart layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Economic,
    Infrastructure,
    Social,
    Education,
    /// Raw filtered rows.
    Data,
}

/// A single line chart inside a tab.
#[derive(Debug, Clone, Copy)]
pub struct ChartSpec {
    pub value: ChartValue,
    pub title: &'static str,
    pub caption: Option<&'static str>,
}

const fn chart(value: ChartValue, title: &'static str, caption: Option<&'static str>) -> ChartSpec {
    ChartSpec {
        value,
        title,
        caption,
    }
}

const ECONOMIC: &[ChartSpec] = &[
    chart(
        ChartValue::Indicator(Indicator::Gdp),
        "GDP Over Time",
        Some(
            "GDP (Gross Domestic Product) is the total value of goods and services a country \
             produces in a year, a measure of the size and health of its economy.",
        ),
    ),
    chart(
        ChartValue::Indicator(Indicator::GdpPerCapita),
        "GDP Per Capita Over Time",
        Some("GDP per capita divides a country's GDP by its population: the average economic output per person."),
    ),
    chart(
        ChartValue::InversePpp,
        "Purchasing Power Parity Over Time",
        Some(
            "Purchasing Power Parity (PPP) compares currencies by the cost of the same goods in \
             each country. The chart shows 1/PPP, so higher values mean stronger purchasing power.",
        ),
    ),
    chart(
        ChartValue::Indicator(Indicator::InflationRate),
        "Inflation Rate Over Time",
        Some("Inflation Rate is the rate at which the general price level of goods and services rises."),
    ),
];

const INFRASTRUCTURE: &[ChartSpec] = &[
    chart(
        ChartValue::Indicator(Indicator::UrbanPopulation),
        "Urban Population Over Time",
        None,
    ),
    chart(
        ChartValue::Indicator(Indicator::AccessToElectricity),
        "Access to Electricity Over Time",
        None,
    ),
    chart(
        ChartValue::Indicator(Indicator::RenewableEnergyConsumption),
        "Renewable Energy Consumption Over Time",
        Some("Renewable Energy Consumption is the share of renewable sources in total energy consumption."),
    ),
    chart(
        ChartValue::Indicator(Indicator::InternetUsers),
        "Individuals Using the Internet Over Time",
        None,
    ),
];

const SOCIAL: &[ChartSpec] = &[
    chart(
        ChartValue::Indicator(Indicator::GniPerCapita),
        "Gross National Income Per Capita Over Time",
        Some(
            "Gross National Income Per Capita is a country's total income divided by its \
             population, adjusted for purchasing power.",
        ),
    ),
    chart(
        ChartValue::Indicator(Indicator::LifeExpectancy),
        "Life Expectancy Over Time",
        None,
    ),
    chart(
        ChartValue::Indicator(Indicator::Poverty),
        "Poverty at $2.15 a Day Over Time",
        Some("Share of the population living below the international poverty line of $2.15 a day."),
    ),
    chart(
        ChartValue::Indicator(Indicator::EmploymentToPopulation),
        "Employment to Population Ratio Over Time",
        Some("Proportion of a country's working-age population that is employed."),
    ),
    chart(
        ChartValue::Indicator(Indicator::Population),
        "Population Over Time",
        None,
    ),
];

const EDUCATION: &[ChartSpec] = &[chart(
    ChartValue::Indicator(Indicator::EducationExpenditure),
    "Expenditure on Education Over Time",
    Some("Expenditure on Education is the share of GDP spent on education."),
)];

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Economic,
        Tab::Infrastructure,
        Tab::Social,
        Tab::Education,
        Tab::Data,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Economic => "Economic Indicators",
            Tab::Infrastructure => "Infrastructure Indicators",
            Tab::Social => "Social Indicators",
            Tab::Education => "Education Indicators",
            Tab::Data => "Data",
        }
    }

    /// Charts shown in this tab, laid out two per row.
    pub fn charts(self) -> &'static [ChartSpec] {
        match self {
            Tab::Economic => ECONOMIC,
            Tab::Infrastructure => INFRASTRUCTURE,
            Tab::Social => SOCIAL,
            Tab::Education => EDUCATION,
            Tab::Data => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Series building
// ---------------------------------------------------------------------------

/// One country's line in a comparison chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CountrySeries {
    pub country: String,
    /// `(x, y)` points; `y` is `None` where the value is missing.
    pub points: Vec<(f64, Option<f64>)>,
}

impl CountrySeries {
    /// Runs of consecutive present points. Missing values break the line.
    pub fn segments(&self) -> Vec<Vec<[f64; 2]>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for &(x, y) in &self.points {
            match y {
                Some(y) => current.push([x, y]),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

/// The categorical x axis of a chart: distinct years present, ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearAxis {
    years: Vec<Year>,
}

impl YearAxis {
    pub fn from_records(records: &[&IndicatorRecord]) -> Self {
        let years: BTreeSet<Year> = records.iter().map(|r| r.year().clone()).collect();
        YearAxis {
            years: years.into_iter().collect(),
        }
    }

    pub fn position(&self, year: &Year) -> Option<f64> {
        self.years.binary_search(year).ok().map(|i| i as f64)
    }

    /// Label for an x coordinate; empty between categories.
    pub fn label_at(&self, x: f64) -> &str {
        let rounded = x.round();
        if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
            return "";
        }
        self.years
            .get(rounded as usize)
            .map_or("", Year::label)
    }
}

/// Group filtered records into one series per country.
///
/// Countries keep their first-appearance order; each series is ordered by
/// year, with rows of the same year kept in record order.
pub fn build_series(
    records: &[&IndicatorRecord],
    value: ChartValue,
    axis: &YearAxis,
) -> Vec<CountrySeries> {
    let mut series: Vec<CountrySeries> = Vec::new();
    for rec in records {
        let Some(x) = axis.position(rec.year()) else {
            continue;
        };
        let point = (x, value.of(rec));
        match series.iter_mut().find(|s| s.country == rec.country()) {
            Some(s) => s.points.push(point),
            None => series.push(CountrySeries {
                country: rec.country().to_string(),
                points: vec![point],
            }),
        }
    }
    for s in &mut series {
        s.points.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
    series
}
