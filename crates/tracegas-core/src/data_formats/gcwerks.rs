//! GCWerks 20-minute averaged record files.
//!
//! Whitespace-delimited text with a fixed header block. Column positions are
//! not read from the header, they come from the species' [`ColumnLayout`],
//! so a file exported with a different layout fails rather than being guessed.

use crate::constants::{GCWERKS_DATE_FMT, GCWERKS_TIME_FMT};
use crate::error::{ParseError, Result};
use crate::record::RawRecord;
use crate::species::{ColumnLayout, SpeciesConfig};
use crate::utils::{parse_date_time, parse_f64};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

pub fn read_gcwerks_file<P: AsRef<Path>>(path: P, species: &SpeciesConfig) -> Result<Vec<RawRecord>> {
    let file = File::open(&path)?;
    let records = parse_reader(file, species)?;
    log::info!("Read {} {} records from {}", records.len(), species.gas, path.as_ref().display());
    Ok(records)
}

pub fn parse_reader<R: Read>(reader: R, species: &SpeciesConfig) -> Result<Vec<RawRecord>> {
    let layout = &species.columns;
    let needed = layout.min_columns();
    let mut lines = BufReader::new(reader).lines();

    for found in 0..species.header_lines {
        match lines.next() {
            Some(line) => {
                line?;
            },
            None => return Err(ParseError::MissingHeader { expected: species.header_lines, found }),
        }
    }

    let mut records = Vec::new();
    for (i, line) in lines.enumerate() {
        let line = line?;
        let line_no = species.header_lines + i + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < needed {
            return Err(ParseError::ShortRow { line: line_no, needed, found: fields.len() });
        }
        records.push(parse_row(&fields, layout, line_no)?);
    }
    Ok(records)
}

fn parse_row(fields: &[&str], layout: &ColumnLayout, line: usize) -> Result<RawRecord> {
    let date = fields[layout.date];
    let time = fields[layout.time];
    let timestamp = parse_date_time(date, time, GCWERKS_DATE_FMT, GCWERKS_TIME_FMT)
        .ok_or_else(|| ParseError::BadTimestamp { line, value: format!("{date} {time}") })?;

    Ok(RawRecord {
        timestamp,
        tag: fields[layout.tag].to_owned(),
        h2o: parse_f64(fields[layout.h2o]),
        delta_raw: parse_f64(fields[layout.delta]),
        delta_raw_stdev: parse_f64(fields[layout.delta_stdev]),
        major_conc: parse_f64(fields[layout.major_conc]),
        major_conc_stdev: parse_f64(fields[layout.major_conc_stdev]),
    })
}
