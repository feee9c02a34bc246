use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const INDICATORS: [&str; 14] = [
    "Population",
    "GDP",
    "GDP Per Capita",
    "Inflation Rate",
    "PPP",
    "Urban Population",
    "Access to Electricity",
    "Renewable Energy Consumption",
    "Individuals Using the Internet",
    "Gross National Income Per Capita",
    "Life Exp.",
    "Poverty at $2.15 a Day",
    "Employment to Population Ratio",
    "Expenditure on education",
];

/// (country, population, GDP per capita, PPP) in the first sample year.
const COUNTRIES: [(&str, f64, f64, f64); 6] = [
    ("Brazil", 196.0e6, 11_200.0, 1.7),
    ("Argentina", 41.0e6, 10_300.0, 2.8),
    ("United States", 311.0e6, 49_900.0, 1.0),
    ("Germany", 80.0e6, 46_600.0, 0.78),
    ("India", 1_250.0e6, 1_450.0, 16.0),
    ("Nigeria", 162.0e6, 2_280.0, 97.0),
];

const FIRST_YEAR: i64 = 2010;
const LAST_YEAR: i64 = 2023;

/// Deterministic splitmix64 generator.
struct SplitMix(u64);

impl SplitMix {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn between(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }
}

struct Row {
    country: &'static str,
    year: i64,
    values: [Option<f64>; 14],
}

fn generate(rng: &mut SplitMix) -> Vec<Row> {
    let mut rows = Vec::new();
    for &(country, pop0, gdp_pc0, ppp0) in &COUNTRIES {
        let growth = rng.between(0.005, 0.025);
        let pop_growth = rng.between(0.002, 0.02);
        let urban0 = rng.between(40.0, 85.0);
        let life0 = rng.between(55.0, 78.0);

        for year in FIRST_YEAR..=LAST_YEAR {
            let t = (year - FIRST_YEAR) as f64;
            let population = pop0 * (1.0 + pop_growth).powf(t);
            let gdp_pc = gdp_pc0 * (1.0 + growth + rng.between(-0.02, 0.02)).powf(t);
            let mut values = [
                Some(population),
                Some(population * gdp_pc),
                Some(gdp_pc),
                Some(rng.between(0.5, 12.0)),
                Some(ppp0 * (1.0 + rng.between(-0.05, 0.05))),
                Some((urban0 + 0.3 * t).min(100.0)),
                Some((70.0 + 2.0 * t + rng.between(0.0, 5.0)).min(100.0)),
                Some(rng.between(5.0, 45.0)),
                Some((20.0 + 5.0 * t + rng.between(0.0, 10.0)).min(100.0)),
                Some(gdp_pc * rng.between(0.9, 1.1)),
                Some(life0 + 0.2 * t),
                Some(rng.between(0.0, 30.0)),
                Some(rng.between(40.0, 70.0)),
                Some(rng.between(2.0, 7.0)),
            ];
            // Roughly one value in eight is missing, and the latest year is
            // sparse, as in the real combined table.
            for value in values.iter_mut().skip(3) {
                let p_missing = if year == LAST_YEAR { 0.5 } else { 0.125 };
                if rng.unit() < p_missing {
                    *value = None;
                }
            }
            rows.push(Row {
                country,
                year,
                values,
            });
        }
    }
    rows
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    let mut header = vec!["Country", "Year"];
    header.extend(INDICATORS);
    writer.write_record(&header)?;

    for row in rows {
        let mut cells = vec![row.country.to_string(), row.year.to_string()];
        cells.extend(
            row.values
                .iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&cells)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let mut fields = vec![
        Field::new("Country", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
    ];
    fields.extend(
        INDICATORS
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, true)),
    );
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.country))),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
    ];
    for i in 0..INDICATORS.len() {
        let values: Float64Array = rows.iter().map(|r| r.values[i]).collect();
        columns.push(Arc::new(values));
    }

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SplitMix(42);
    let rows = generate(&mut rng);

    write_csv(&rows, "df_combined.csv")?;
    write_parquet(&rows, "df_combined.parquet")?;

    println!(
        "Wrote {} rows ({} countries, {FIRST_YEAR}-{LAST_YEAR}) to df_combined.csv and df_combined.parquet",
        rows.len(),
        COUNTRIES.len()
    );
    Ok(())
}
