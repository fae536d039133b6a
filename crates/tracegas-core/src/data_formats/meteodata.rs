use crate::align::nearest_index_sorted;
use crate::constants::MET_TIME_FMT;
use crate::error::{ParseError, Result};
use crate::utils::{ensure_utf8, parse_f64, to_secs};
use chrono::NaiveDateTime;
use itertools::izip;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct MeteoLayout {
    pub time: usize,
    pub wind_speed: usize,
    pub wind_direction: usize,
}

impl Default for MeteoLayout {
    fn default() -> Self {
        Self { time: 0, wind_speed: 8, wind_direction: 10 }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MeteoData {
    pub datetime: Vec<i64>,
    pub wind_speed: Vec<f64>,
    pub wind_direction: Vec<f64>,
}

impl MeteoData {
    pub fn len(&self) -> usize {
        self.datetime.len()
    }
    pub fn is_empty(&self) -> bool {
        self.datetime.is_empty()
    }

    /// Wind speed and direction of the observation nearest to `target_timestamp`,
    /// `None` if nothing lies within `tolerance` seconds.
    pub fn get_nearest(&self, target_timestamp: i64, tolerance: i64) -> Option<(f64, f64)> {
        nearest_index_sorted(target_timestamp, &self.datetime, tolerance)
            .map(|i| (self.wind_speed[i], self.wind_direction[i]))
    }

    pub fn extend(&mut self, other: MeteoData) {
        self.datetime.extend(other.datetime);
        self.wind_speed.extend(other.wind_speed);
        self.wind_direction.extend(other.wind_direction);
    }

    /// Stable sort by time, keeps file order between equal timestamps.
    pub fn sort(&mut self) {
        if self.datetime.windows(2).all(|w| w[0] <= w[1]) {
            return;
        }
        let mut rows: Vec<(i64, f64, f64)> =
            izip!(&self.datetime, &self.wind_speed, &self.wind_direction)
                .map(|(&t, &s, &d)| (t, s, d))
                .collect();
        rows.sort_by_key(|r| r.0);
        self.datetime = rows.iter().map(|r| r.0).collect();
        self.wind_speed = rows.iter().map(|r| r.1).collect();
        self.wind_direction = rows.iter().map(|r| r.2).collect();
    }
}

pub fn read_meteo_csv<P: AsRef<Path>>(file_path: P, layout: &MeteoLayout) -> Result<MeteoData> {
    let content = ensure_utf8(&file_path)?;
    let mut meteo = parse_reader(content.as_bytes(), layout)?;
    meteo.sort();
    log::info!("Read {} meteo rows from {}", meteo.len(), file_path.as_ref().display());
    Ok(meteo)
}

pub fn parse_reader<R: Read>(reader: R, layout: &MeteoLayout) -> Result<MeteoData> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);
    let needed = layout.time.max(layout.wind_speed).max(layout.wind_direction) + 1;

    let mut meteo = MeteoData::default();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        if record.len() < needed {
            return Err(ParseError::ShortRow { line, needed, found: record.len() });
        }
        let datetime_str = record[layout.time].trim();
        let timestamp = NaiveDateTime::parse_from_str(datetime_str, MET_TIME_FMT)
            .map_err(|_| ParseError::BadTimestamp { line, value: datetime_str.to_owned() })?;

        meteo.datetime.push(to_secs(&timestamp));
        meteo.wind_speed.push(parse_f64(&record[layout.wind_speed]));
        meteo.wind_direction.push(parse_f64(&record[layout.wind_direction]));
    }
    Ok(meteo)
}
