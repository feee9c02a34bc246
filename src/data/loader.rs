use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Indicator, IndicatorRecord, IndicatorTable, Year};

pub const COUNTRY_COLUMN: &str = "Country";
pub const YEAR_COLUMN: &str = "Year";

/// Cell markers treated as a missing value.
const MISSING_MARKERS: [&str; 7] = ["", "nan", "na", "n/a", "null", "none", ".."];

/// Structural problems with an input file. Always fatal to the load.
///
/// Rows are counted from 1, excluding the header.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: column '{column}' is empty")]
    EmptyKey { row: usize, column: &'static str },
    #[error("row {row}: column '{column}' holds '{value}', which is not a number")]
    NotNumeric {
        row: usize,
        column: &'static str,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an indicator table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – one header row; `Country`, `Year` and every indicator column
/// * `.json`    – `[{ "Country": "...", "Year": 2021, "GDP": ..., ... }, ...]`
/// * `.parquet` – flat columns with the same names
pub fn load_file(path: &Path) -> Result<IndicatorTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} rows covering {} countries and {} years from {}",
        table.len(),
        table.countries().len(),
        table.years().len(),
        path.display()
    );
    if table.is_empty() {
        log::warn!("{} has a header but no data rows", path.display());
    }
    if table.duplicate_rows() > 0 {
        log::warn!(
            "{} rows repeat an earlier (Country, Year) pair",
            table.duplicate_rows()
        );
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Column layout shared by all formats
// ---------------------------------------------------------------------------

/// Positions of the required columns inside a header row.
#[derive(Debug)]
struct ColumnLayout {
    country: usize,
    year: usize,
    indicators: [usize; Indicator::COUNT],
}

impl ColumnLayout {
    fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, SchemaError> {
        let country = position(headers, COUNTRY_COLUMN, |h| {
            h.trim().eq_ignore_ascii_case(COUNTRY_COLUMN)
        })?;
        let year = position(headers, YEAR_COLUMN, |h| {
            h.trim().eq_ignore_ascii_case(YEAR_COLUMN)
        })?;
        let mut indicators = [0; Indicator::COUNT];
        for ind in Indicator::ALL {
            indicators[ind.index()] = position(headers, ind.column(), |h| ind.matches_header(h))?;
        }
        Ok(ColumnLayout {
            country,
            year,
            indicators,
        })
    }
}

fn position<S: AsRef<str>>(
    headers: &[S],
    name: &str,
    matches: impl Fn(&str) -> bool,
) -> Result<usize, SchemaError> {
    headers
        .iter()
        .position(|h| matches(h.as_ref()))
        .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
}

fn key_cell(raw: &str, row: usize, column: &'static str) -> Result<String, SchemaError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(SchemaError::EmptyKey { row, column });
    }
    Ok(value.to_string())
}

/// Parse an indicator cell; missing markers become `None`.
fn parse_indicator(raw: &str, row: usize, ind: Indicator) -> Result<Option<f64>, SchemaError> {
    let value = raw.trim();
    if MISSING_MARKERS.iter().any(|m| m.eq_ignore_ascii_case(value)) {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| SchemaError::NotNumeric {
            row,
            column: ind.column(),
            value: value.to_string(),
        })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<IndicatorTable> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Parse CSV text with a header row.  Extra columns are ignored.
pub fn read_csv<R: Read>(input: R) -> Result<IndicatorTable> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let layout = ColumnLayout::resolve(&headers)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row_no = i + 1;
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let country = key_cell(cell(layout.country), row_no, COUNTRY_COLUMN)?;
        let year = key_cell(cell(layout.year), row_no, YEAR_COLUMN)?;
        let mut record = IndicatorRecord::new(country, Year::parse(&year));
        for ind in Indicator::ALL {
            let value = parse_indicator(cell(layout.indicators[ind.index()]), row_no, ind)?;
            record.set(ind, value);
        }
        records.push(record);
    }

    Ok(IndicatorTable::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<IndicatorTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Country": "Brazil", "Year": 2021, "GDP": 1.6e12, "PPP": null, ... },
///   ...
/// ]
/// ```
pub fn parse_json(text: &str) -> Result<IndicatorTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let row_no = i + 1;
        let obj = row
            .as_object()
            .with_context(|| format!("Row {row_no} is not a JSON object"))?;
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        let layout = ColumnLayout::resolve(&keys)?;
        let field = |idx: usize| &obj[keys[idx]];

        let country = key_cell(&json_text(field(layout.country)), row_no, COUNTRY_COLUMN)?;
        let year = key_cell(&json_text(field(layout.year)), row_no, YEAR_COLUMN)?;
        let mut record = IndicatorRecord::new(country, Year::parse(&year));
        for ind in Indicator::ALL {
            let value = match field(layout.indicators[ind.index()]) {
                JsonValue::Null => None,
                JsonValue::Number(n) => n.as_f64(),
                JsonValue::String(s) => parse_indicator(s, row_no, ind)?,
                other => {
                    return Err(SchemaError::NotNumeric {
                        row: row_no,
                        column: ind.column(),
                        value: other.to_string(),
                    }
                    .into())
                }
            };
            record.set(ind, value);
        }
        records.push(record);
    }

    Ok(IndicatorTable::from_records(records))
}

fn json_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file written by Pandas (`df.to_parquet()`) or Polars.
///
/// `Country` and `Year` may be any column Arrow can cast to text: plain,
/// large, view or dictionary-encoded strings, integers of any width, floats.
/// Indicators must be numeric (plain or dictionary-encoded) or all-null.
/// Nulls are missing values.
fn load_parquet(path: &Path) -> Result<IndicatorTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let rows = read_batch(&batch, records.len())?;
        records.extend(rows);
    }

    Ok(IndicatorTable::from_records(records))
}

/// Convert one record batch. `row_offset` counts the rows of earlier batches.
fn read_batch(batch: &RecordBatch, row_offset: usize) -> Result<Vec<IndicatorRecord>> {
    let schema = batch.schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    let layout = ColumnLayout::resolve(&names)?;

    let country_col = text_column(batch.column(layout.country), COUNTRY_COLUMN)?;
    let year_col = text_column(batch.column(layout.year), YEAR_COLUMN)?;
    let indicator_cols = Indicator::ALL
        .iter()
        .map(|&ind| numeric_column(batch.column(layout.indicators[ind.index()]), ind))
        .collect::<Result<Vec<_>>>()?;

    let countries = country_col.as_string::<i32>();
    let years = year_col.as_string::<i32>();
    let mut records = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let row_no = row_offset + row + 1;
        let country = key_cell(text_at(countries, row), row_no, COUNTRY_COLUMN)?;
        let year = key_cell(text_at(years, row), row_no, YEAR_COLUMN)?;
        let mut record = IndicatorRecord::new(country, Year::parse(&year));
        for (ind, col) in Indicator::ALL.into_iter().zip(&indicator_cols) {
            let values = col.as_primitive::<Float64Type>();
            record.set(ind, values.is_valid(row).then(|| values.value(row)));
        }
        records.push(record);
    }
    Ok(records)
}

// -- Arrow helpers --

/// Cast a key column to plain UTF-8.
fn text_column(col: &ArrayRef, name: &str) -> Result<ArrayRef> {
    cast(col, &DataType::Utf8)
        .with_context(|| format!("column '{name}' of type {} cannot be read as text", col.data_type()))
}

/// Nulls read as empty.
fn text_at(col: &StringArray, row: usize) -> &str {
    if col.is_null(row) {
        ""
    } else {
        col.value(row)
    }
}

/// Cast an indicator column to `f64`, rejecting non-numeric columns.
fn numeric_column(col: &ArrayRef, ind: Indicator) -> Result<ArrayRef> {
    let numeric = match col.data_type() {
        DataType::Dictionary(_, values) => values.is_numeric(),
        DataType::Null => true,
        other => other.is_numeric(),
    };
    if !numeric {
        bail!(
            "column '{}' has type {}, expected a numeric column",
            ind.column(),
            col.data_type()
        );
    }
    cast(col, &DataType::Float64).with_context(|| format!("converting '{}' to float", ind.column()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{
        DictionaryArray, Float64Array, Int16Array, Int64Array, NullArray, StringViewArray,
        UInt32Array,
    };
    use arrow::datatypes::Int32Type;
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn header() -> String {
        let mut cols = vec![COUNTRY_COLUMN.to_string(), YEAR_COLUMN.to_string()];
        cols.extend(Indicator::ALL.iter().map(|i| format!("\"{}\"", i.column())));
        cols.join(",")
    }

    fn row(country: &str, year: &str, gdp: &str) -> String {
        let mut cells = vec![country.to_string(), year.to_string()];
        for ind in Indicator::ALL {
            cells.push(if ind == Indicator::Gdp { gdp.to_string() } else { "1".to_string() });
        }
        cells.join(",")
    }

    #[test]
    fn csv_reads_rows_and_missing_values() {
        let text = [
            header(),
            row("Brazil", "2020", "2000000000000"),
            row("Brazil", "2021.0", "2.1e12"),
            row("Argentina", "2021", ""),
            row("Chile", "2021", "nan"),
        ]
        .join("\n");

        let table = read_csv(text.as_bytes()).expect("valid csv");
        assert_eq!(table.len(), 4);
        assert_eq!(table.countries(), ["Brazil", "Argentina", "Chile"]);

        let records = table.records();
        assert_eq!(records[1].year().label(), "2021");
        assert_eq!(records[1].get(Indicator::Gdp), Some(2.1e12));
        assert_eq!(records[2].get(Indicator::Gdp), None);
        assert_eq!(records[3].get(Indicator::Gdp), None);
        assert_eq!(records[2].get(Indicator::Population), Some(1.0));
    }

    #[test]
    fn csv_missing_column_is_fatal() {
        let text = "Country,Year,GDP\nBrazil,2021,1\n";
        let err = read_csv(text.as_bytes()).expect_err("missing columns");
        let schema = err.downcast_ref::<SchemaError>().expect("schema error");
        assert!(matches!(schema, SchemaError::MissingColumn(c) if c == "Population"));
    }

    #[test]
    fn csv_non_numeric_indicator_is_fatal() {
        let text = [header(), row("Brazil", "2021", "lots")].join("\n");
        let err = read_csv(text.as_bytes()).expect_err("bad cell");
        assert!(format!("{err:#}").contains("'lots'"));
    }

    #[test]
    fn errors_count_data_rows_from_one() {
        let text = [
            header(),
            row("Brazil", "2020", "1"),
            row("Brazil", "2021", "lots"),
        ]
        .join("\n");
        let err = read_csv(text.as_bytes()).expect_err("bad cell");
        assert!(matches!(
            err.downcast_ref::<SchemaError>(),
            Some(SchemaError::NotNumeric { row: 2, column: "GDP", .. })
        ));
        assert!(err.to_string().starts_with("row 2:"));

        let text = r#"[{"Country": "Brazil", "Year": 2021}]"#;
        let err = parse_json(text).expect_err("missing columns");
        assert!(err.downcast_ref::<SchemaError>().is_some());
        let err = parse_json("[1]").expect_err("not an object");
        assert!(err.to_string().contains("Row 1"));
    }

    #[test]
    fn header_only_csv_is_an_empty_table() {
        let table = read_csv(header().as_bytes()).expect("header only");
        assert!(table.is_empty());
        assert!(table.countries().is_empty());
    }

    #[test]
    fn csv_empty_country_is_fatal() {
        let text = [header(), row("", "2021", "1")].join("\n");
        let err = read_csv(text.as_bytes()).expect_err("empty key");
        assert!(matches!(
            err.downcast_ref::<SchemaError>(),
            Some(SchemaError::EmptyKey { column: "Country", .. })
        ));
    }

    #[test]
    fn json_records_with_nulls_and_aliases() {
        let mut obj = serde_json::Map::new();
        obj.insert("Country".into(), "Brazil".into());
        obj.insert("Year".into(), 2021.into());
        for ind in Indicator::ALL {
            obj.insert(ind.column().into(), 2.0.into());
        }
        obj.remove("Life Exp.");
        obj.insert("Life Expectancy".into(), 75.5.into());
        obj.insert("PPP".into(), JsonValue::Null);
        let text = JsonValue::Array(vec![JsonValue::Object(obj)]).to_string();

        let table = parse_json(&text).expect("valid json");
        let rec = &table.records()[0];
        assert_eq!(rec.year().label(), "2021");
        assert_eq!(rec.get(Indicator::LifeExpectancy), Some(75.5));
        assert_eq!(rec.get(Indicator::Ppp), None);
        assert_eq!(rec.get(Indicator::Gdp), Some(2.0));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("indicators.xlsx")).expect_err("xlsx");
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn parquet_round_trip_through_file() {
        let mut fields = vec![
            Field::new(COUNTRY_COLUMN, DataType::Utf8, false),
            Field::new(YEAR_COLUMN, DataType::Int64, false),
        ];
        fields.extend(
            Indicator::ALL
                .iter()
                .map(|i| Field::new(i.column(), DataType::Float64, true)),
        );
        let schema = Arc::new(Schema::new(fields));

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["Peru", "Peru"])),
            Arc::new(Int64Array::from(vec![2020, 2021])),
        ];
        for ind in Indicator::ALL {
            let values = if ind == Indicator::Ppp {
                vec![Some(3.0), None]
            } else {
                vec![Some(1.0), Some(2.0)]
            };
            columns.push(Arc::new(Float64Array::from(values)));
        }
        let batch = RecordBatch::try_new(schema.clone(), columns).expect("batch");

        let path = std::env::temp_dir().join(format!(
            "country-dashboard-loader-{}.parquet",
            std::process::id()
        ));
        let file = std::fs::File::create(&path).expect("create parquet");
        let mut writer = ArrowWriter::try_new(file, schema, None).expect("writer");
        writer.write(&batch).expect("write");
        writer.close().expect("close");

        let table = load_file(&path).expect("load parquet");
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), 2);
        let records = table.records();
        assert_eq!(records[1].year().label(), "2021");
        assert_eq!(records[0].get(Indicator::Ppp), Some(3.0));
        assert_eq!(records[1].get(Indicator::Ppp), None);
        assert_eq!(records[1].get(Indicator::Gdp), Some(2.0));
    }

    /// A batch with `Country` and `Year` columns plus every indicator as
    /// Float64, except for the overridden ones.
    fn batch(country: ArrayRef, year: ArrayRef, overrides: Vec<(Indicator, ArrayRef)>) -> RecordBatch {
        let rows = country.len();
        let mut columns = vec![(COUNTRY_COLUMN, country), (YEAR_COLUMN, year)];
        for ind in Indicator::ALL {
            let col = overrides
                .iter()
                .find(|(o, _)| *o == ind)
                .map(|(_, col)| col.clone())
                .unwrap_or_else(|| Arc::new(Float64Array::from(vec![1.5; rows])) as ArrayRef);
            columns.push((ind.column(), col));
        }
        RecordBatch::try_from_iter(columns).expect("batch")
    }

    #[test]
    fn parquet_accepts_dictionary_keys_and_narrow_integers() {
        let batch = batch(
            Arc::new(DictionaryArray::<Int32Type>::from_iter(["Peru", "Chile"])),
            Arc::new(Int16Array::from(vec![2020, 2021])),
            vec![
                (Indicator::Gdp, Arc::new(UInt32Array::from(vec![Some(7), None])) as ArrayRef),
                (Indicator::Ppp, Arc::new(NullArray::new(2)) as ArrayRef),
            ],
        );

        let records = read_batch(&batch, 0).expect("castable columns");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].country(), "Peru");
        assert_eq!(records[1].country(), "Chile");
        assert_eq!(records[1].year().label(), "2021");
        assert_eq!(records[0].get(Indicator::Gdp), Some(7.0));
        assert_eq!(records[1].get(Indicator::Gdp), None);
        assert_eq!(records[0].get(Indicator::Ppp), None);
        assert_eq!(records[0].get(Indicator::Population), Some(1.5));
    }

    #[test]
    fn parquet_accepts_string_view_keys() {
        let batch = batch(
            Arc::new(StringViewArray::from(vec!["Peru"])),
            Arc::new(StringViewArray::from(vec!["2021.0"])),
            Vec::new(),
        );
        let records = read_batch(&batch, 0).expect("view columns");
        assert_eq!(records[0].country(), "Peru");
        assert_eq!(records[0].year().label(), "2021");
    }

    #[test]
    fn parquet_rejects_text_indicators() {
        let batch = batch(
            Arc::new(StringArray::from(vec!["Peru"])),
            Arc::new(Int64Array::from(vec![2021])),
            vec![(Indicator::Gdp, Arc::new(StringArray::from(vec!["7"])) as ArrayRef)],
        );
        let err = read_batch(&batch, 0).expect_err("text indicator");
        assert!(err.to_string().contains("'GDP'"));
    }

    #[test]
    fn parquet_rows_continue_across_batches() {
        let batch = batch(
            Arc::new(StringArray::from(vec![Some("Peru"), None])),
            Arc::new(Int64Array::from(vec![2020, 2021])),
            Vec::new(),
        );
        let err = read_batch(&batch, 10).expect_err("null country");
        assert!(matches!(
            err.downcast_ref::<SchemaError>(),
            Some(SchemaError::EmptyKey { row: 12, column: "Country" })
        ));
    }
}
