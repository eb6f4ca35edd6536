use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use common::{BacktestError, Bar, Result};

/// Load bars from a CSV file.
///
/// Expects a header row and `timestamp,open,high,low,close,volume` columns;
/// extra trailing columns are ignored and short rows are skipped.
pub fn load_csv(path: &Path) -> Result<Vec<Bar>> {
    let file = File::open(path)
        .map_err(|e| BacktestError::DataLoadError(format!("{}: {}", path.display(), e)))?;
    read_csv_bars(BufReader::new(file))
}

/// Parse CSV bars from any reader
pub fn read_csv_bars<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut bars = Vec::new();

    for (row, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| BacktestError::CsvError(e.to_string()))?;

        if record.len() < 6 {
            continue;
        }

        let volume = record[5]
            .trim()
            .parse()
            .map_err(|_| BacktestError::CsvError(format!("invalid volume in row {}", row + 1)))?;

        bars.push(Bar::new(
            parse_timestamp(&record[0])?,
            parse_price(&record, 1, "open", row)?,
            parse_price(&record, 2, "high", row)?,
            parse_price(&record, 3, "low", row)?,
            parse_price(&record, 4, "close", row)?,
            volume,
        ));
    }

    Ok(bars)
}

/// Load bars from a JSON array
pub fn load_json(path: &Path) -> Result<Vec<Bar>> {
    let file = File::open(path)
        .map_err(|e| BacktestError::DataLoadError(format!("{}: {}", path.display(), e)))?;
    let bars: Vec<Bar> = serde_json::from_reader(BufReader::new(file))?;
    Ok(bars)
}

fn parse_price(record: &csv::StringRecord, index: usize, name: &str, row: usize) -> Result<f64> {
    record[index].trim().parse().map_err(|_| {
        BacktestError::CsvError(format!("invalid {} price in row {}", name, row + 1))
    })
}

/// Parse a timestamp from the formats market data files commonly use
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];
    for fmt in &datetime_formats {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d"];
    for fmt in &date_formats {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap()));
        }
    }

    // Unix timestamp in seconds
    if let Ok(ts) = s.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp(ts, 0) {
            return Ok(dt);
        }
    }

    Err(BacktestError::CsvError(format!(
        "Unable to parse timestamp: {}",
        s
    )))
}
