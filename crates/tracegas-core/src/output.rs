use crate::error::WriteError;
use crate::series::SeriesTable;
use csv::Writer;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

const TIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("invalid output format: {other}")),
        }
    }
}

impl OutputFormat {
    /// Guess from the file extension, falling back to JSON.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
            .unwrap_or_default()
    }
}

pub fn write_table<P: AsRef<Path>>(
    table: &SeriesTable,
    path: P,
    format: OutputFormat,
) -> Result<(), WriteError> {
    let file = File::create(&path)?;
    match format {
        OutputFormat::Json => write_json_to(table, file)?,
        OutputFormat::Csv => write_csv_to(table, file)?,
    }
    log::info!("Wrote {} rows to {}", table.len(), path.as_ref().display());
    Ok(())
}

pub fn write_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<(), WriteError> {
    let file = File::create(&path)?;
    write_json_to(value, file)?;
    log::info!("Wrote {}", path.as_ref().display());
    Ok(())
}

pub fn write_json_to<T: Serialize, W: Write>(value: &T, writer: W) -> Result<(), WriteError> {
    let mut w = BufWriter::new(writer);
    serde_json::to_writer(&mut w, value)?;
    w.flush()?;
    Ok(())
}

/// One row per timestamp, missing values as empty fields.
pub fn write_csv_to<W: Write>(table: &SeriesTable, writer: W) -> Result<(), WriteError> {
    let mut wtr = Writer::from_writer(writer);

    let mut header = vec!["time"];
    header.extend(table.columns.iter().map(|(name, _)| name.as_str()));
    wtr.write_record(&header)?;

    for (i, time) in table.time.iter().enumerate() {
        let mut row = Vec::with_capacity(table.columns.len() + 1);
        row.push(time.format(TIME_FMT).to_string());
        for (_, values) in &table.columns {
            row.push(values[i].map(|v| v.to_string()).unwrap_or_default());
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn table() -> SeriesTable {
        let t0 = NaiveDate::from_ymd_opt(2019, 5, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let t1 = NaiveDate::from_ymd_opt(2019, 5, 1).unwrap().and_hms_opt(0, 20, 0).unwrap();
        let mut table = SeriesTable::new(vec![t0, t1]);
        table.push("ch4", vec![Some(1950.25), None]);
        table.push("wind_speed", vec![None, Some(2.5)]);
        table
    }

    #[test]
    fn csv_leaves_missing_values_empty() {
        let mut buf = Vec::new();
        write_csv_to(&table(), &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "time,ch4,wind_speed\n2019-05-01 00:00:00,1950.25,\n2019-05-01 00:20:00,,2.5\n"
        );
    }

    #[test]
    fn json_writes_null_for_missing() {
        let mut buf = Vec::new();
        write_json_to(&table(), &mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["ch4"], serde_json::json!([1950.25, null]));
        assert_eq!(v["time"][1], "2019-05-01T00:20:00");
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("out.CSV")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("out.json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("out")), OutputFormat::Json);
    }
}
