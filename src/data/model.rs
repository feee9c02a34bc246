use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

// ---------------------------------------------------------------------------
// Indicator – one named numeric column of the table
// ---------------------------------------------------------------------------

/// The fixed set of indicator columns carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Indicator {
    Population,
    Gdp,
    GdpPerCapita,
    InflationRate,
    Ppp,
    UrbanPopulation,
    AccessToElectricity,
    RenewableEnergyConsumption,
    InternetUsers,
    GniPerCapita,
    LifeExpectancy,
    Poverty,
    EmploymentToPopulation,
    EducationExpenditure,
}

impl Indicator {
    pub const COUNT: usize = 14;

    /// All indicators in column order.
    pub const ALL: [Indicator; Self::COUNT] = [
        Indicator::Population,
        Indicator::Gdp,
        Indicator::GdpPerCapita,
        Indicator::InflationRate,
        Indicator::Ppp,
        Indicator::UrbanPopulation,
        Indicator::AccessToElectricity,
        Indicator::RenewableEnergyConsumption,
        Indicator::InternetUsers,
        Indicator::GniPerCapita,
        Indicator::LifeExpectancy,
        Indicator::Poverty,
        Indicator::EmploymentToPopulation,
        Indicator::EducationExpenditure,
    ];

    /// Position of this indicator inside a record's value array.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical column header in the combined input file.
    pub fn column(self) -> &'static str {
        match self {
            Indicator::Population => "Population",
            Indicator::Gdp => "GDP",
            Indicator::GdpPerCapita => "GDP Per Capita",
            Indicator::InflationRate => "Inflation Rate",
            Indicator::Ppp => "PPP",
            Indicator::UrbanPopulation => "Urban Population",
            Indicator::AccessToElectricity => "Access to Electricity",
            Indicator::RenewableEnergyConsumption => "Renewable Energy Consumption",
            Indicator::InternetUsers => "Individuals Using the Internet",
            Indicator::GniPerCapita => "Gross National Income Per Capita",
            Indicator::LifeExpectancy => "Life Exp.",
            Indicator::Poverty => "Poverty at $2.15 a Day",
            Indicator::EmploymentToPopulation => "Employment to Population Ratio",
            Indicator::EducationExpenditure => "Expenditure on education",
        }
    }

    /// Alternative headers accepted for the same column.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Indicator::LifeExpectancy => &["Life Expectancy"],
            Indicator::EducationExpenditure => &["Expenditure on Education"],
            _ => &[],
        }
    }

    /// Human readable name used in chart titles and table headers.
    pub fn display_name(self) -> &'static str {
        match self {
            Indicator::LifeExpectancy => "Life Expectancy",
            Indicator::EducationExpenditure => "Expenditure on Education",
            other => other.column(),
        }
    }

    /// Whether `header` names this indicator (trimmed, case-insensitive).
    pub fn matches_header(self, header: &str) -> bool {
        let header = header.trim();
        std::iter::once(self.column())
            .chain(self.aliases().iter().copied())
            .any(|name| name.eq_ignore_ascii_case(header))
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Year – text label with an ordinal for "latest" computations
// ---------------------------------------------------------------------------

/// A year label as read from the input file.
///
/// Filtering and display use the normalized text label; ordering uses the
/// integer value when the label is numeric. Numeric years rank above
/// non-numeric labels, which fall back to lexical order among themselves.
#[derive(Debug, Clone)]
pub struct Year {
    label: String,
    ordinal: Option<i64>,
}

impl Year {
    /// Normalize a raw cell (`"2021"`, `"2021.0"`, `" 2021 "`) into a year.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let label = match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                format!("{}", v as i64)
            }
            _ => trimmed.to_string(),
        };
        let ordinal = label.parse::<i64>().ok();
        Year { label, ordinal }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for Year {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label
    }
}

impl Eq for Year {}

impl PartialOrd for Year {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Year {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.ordinal, other.ordinal) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.label.cmp(&other.label)),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => self.label.cmp(&other.label),
        }
    }
}

impl Hash for Year {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

// ---------------------------------------------------------------------------
// IndicatorRecord – one (Country, Year) row
// ---------------------------------------------------------------------------

/// One row of the combined table. Every indicator is independently nullable.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRecord {
    country: String,
    year: Year,
    values: [Option<f64>; Indicator::COUNT],
}

impl IndicatorRecord {
    /// A record with every indicator absent.
    pub fn new(country: impl Into<String>, year: Year) -> Self {
        IndicatorRecord {
            country: country.into(),
            year,
            values: [None; Indicator::COUNT],
        }
    }

    /// Builder-style setter for fixtures.
    #[cfg(test)]
    pub fn with(mut self, indicator: Indicator, value: f64) -> Self {
        self.set(indicator, Some(value));
        self
    }

    /// Store a value; non-finite numbers are kept as absent.
    pub fn set(&mut self, indicator: Indicator, value: Option<f64>) {
        self.values[indicator.index()] = value.filter(|v| v.is_finite());
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn year(&self) -> &Year {
        &self.year
    }

    /// The stored value, or `None` when the cell was missing.
    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        self.values[indicator.index()]
    }
}

// ---------------------------------------------------------------------------
// IndicatorTable – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded table with pre-computed selection options.
///
/// Built once by the loader and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct IndicatorTable {
    records: Vec<IndicatorRecord>,
    /// Distinct countries in order of first appearance.
    countries: Vec<String>,
    /// Distinct years, ascending.
    years: Vec<Year>,
    /// Number of rows repeating an earlier (country, year) pair.
    duplicate_rows: usize,
}

impl IndicatorTable {
    /// Build the selection indices from the loaded records.
    pub fn from_records(records: Vec<IndicatorRecord>) -> Self {
        let mut countries = Vec::new();
        let mut years: BTreeSet<Year> = BTreeSet::new();
        let mut duplicate_rows = 0;
        {
            let mut seen_countries: HashSet<&str> = HashSet::new();
            let mut keys: HashSet<(&str, &str)> = HashSet::new();

            for rec in &records {
                if seen_countries.insert(rec.country()) {
                    countries.push(rec.country().to_string());
                }
                years.insert(rec.year().clone());
                if !keys.insert((rec.country(), rec.year().label())) {
                    duplicate_rows += 1;
                }
            }
        }

        IndicatorTable {
            records,
            countries,
            years: years.into_iter().collect(),
            duplicate_rows,
        }
    }

    pub fn records(&self) -> &[IndicatorRecord] {
        &self.records
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn years(&self) -> &[Year] {
        &self.years
    }

    pub fn duplicate_rows(&self) -> usize {
        self.duplicate_rows
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
