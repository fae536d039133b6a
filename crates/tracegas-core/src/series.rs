use crate::constants::{AFTERNOON_END_HOUR, AFTERNOON_START_HOUR};
use crate::gastype::GasType;
use crate::record::CorrectedRecord;
use chrono::{NaiveDateTime, Timelike};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::str::FromStr;

/// Inclusive range of hours of the day, e.g. 13-17.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourWindow {
    pub start: u32,
    pub end: u32,
}

impl Default for HourWindow {
    fn default() -> Self {
        Self { start: AFTERNOON_START_HOUR, end: AFTERNOON_END_HOUR }
    }
}

impl HourWindow {
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start && hour <= self.end
    }
}

impl fmt::Display for HourWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.start, self.end)
    }
}

impl FromStr for HourWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s.split_once('-').ok_or_else(|| format!("expected START-END, got '{s}'"))?;
        let start: u32 = a.trim().parse().map_err(|_| format!("invalid start hour '{a}'"))?;
        let end: u32 = b.trim().parse().map_err(|_| format!("invalid end hour '{b}'"))?;
        if start > end || end > 23 {
            return Err(format!("invalid hour window {start}-{end}"));
        }
        Ok(Self { start, end })
    }
}

/// Ambient-air records of one gas, in file order.
#[derive(Debug, Clone)]
pub struct FilteredSeries {
    pub gas: GasType,
    pub records: Vec<CorrectedRecord>,
}

impl FilteredSeries {
    pub fn new(gas: GasType, records: Vec<CorrectedRecord>) -> Self {
        Self { gas, records }
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn is_time_ordered(&self) -> bool {
        self.records.windows(2).all(|w| w[0].timestamp < w[1].timestamp)
    }

    pub fn times(&self) -> Vec<NaiveDateTime> {
        self.records.iter().map(|r| r.timestamp).collect()
    }
    pub fn conc(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.conc).collect()
    }
    pub fn conc_stdev(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.conc_stdev).collect()
    }
    pub fn delta(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.delta).collect()
    }
    pub fn delta_stdev(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.delta_stdev).collect()
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self { gas: self.gas, records: self.records.iter().map(|r| r.scaled(factor)).collect() }
    }

    pub fn afternoon(&self, window: HourWindow) -> Self {
        let records =
            self.records.iter().filter(|r| window.contains(r.timestamp.hour())).cloned().collect();
        Self { gas: self.gas, records }
    }

    pub fn to_table(&self) -> SeriesTable {
        let mut table = SeriesTable::new(self.times());
        table.push_f64(self.gas.column_name(), &self.conc());
        table.push_f64(&self.gas.stdev_col(), &self.conc_stdev());
        table.push_f64(&self.gas.delta_col(), &self.delta());
        table.push_f64(&self.gas.delta_stdev_col(), &self.delta_stdev());
        table
    }
}

/// Filtered series with the nearest meteorological observation attached.
#[derive(Debug, Clone)]
pub struct AlignedSeries {
    pub series: FilteredSeries,
    pub wind_speed: Vec<Option<f64>>,
    pub wind_direction: Vec<Option<f64>>,
}

impl AlignedSeries {
    pub fn matched(&self) -> usize {
        self.wind_speed.iter().filter(|w| w.is_some()).count()
    }

    pub fn to_table(&self) -> SeriesTable {
        let mut table = self.series.to_table();
        table.push("wind_speed", self.wind_speed.clone());
        table.push("wind_direction", self.wind_direction.clone());
        table
    }
}

/// Field name to column mapping written out at the end of a run. Column order
/// is insertion order; missing values are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesTable {
    pub time: Vec<NaiveDateTime>,
    pub columns: Vec<(String, Vec<Option<f64>>)>,
}

impl SeriesTable {
    pub fn new(time: Vec<NaiveDateTime>) -> Self {
        Self { time, columns: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn push(&mut self, name: &str, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.time.len(), "column '{name}' length");
        self.columns.push((name.to_owned(), values));
    }

    /// NaN is stored as missing.
    pub fn push_f64(&mut self, name: &str, values: &[f64]) {
        self.push(name, values.iter().map(|&v| (!v.is_nan()).then_some(v)).collect());
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_slice())
    }
}

impl Serialize for SeriesTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len() + 1))?;
        map.serialize_entry("time", &self.time)?;
        for (name, values) in &self.columns {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(h: u32, m: u32, conc: f64) -> CorrectedRecord {
        CorrectedRecord {
            timestamp: NaiveDate::from_ymd_opt(2020, 7, 1).unwrap().and_hms_opt(h, m, 0).unwrap(),
            tag: "air".to_owned(),
            conc,
            conc_stdev: 0.2,
            delta: -9.,
            delta_stdev: 0.05,
        }
    }

    #[test]
    fn afternoon_keeps_13_to_17_inclusive() {
        let s = FilteredSeries::new(
            GasType::CO2,
            vec![rec(12, 40, 1.), rec(13, 0, 2.), rec(17, 40, 3.), rec(18, 0, 4.)],
        );
        let pm = s.afternoon(HourWindow::default());
        assert_eq!(pm.conc(), vec![2., 3.]);
    }

    #[test]
    fn hour_window_from_str() {
        assert_eq!("13-17".parse::<HourWindow>().unwrap(), HourWindow { start: 13, end: 17 });
        assert!("17-13".parse::<HourWindow>().is_err());
        assert!("13".parse::<HourWindow>().is_err());
        assert!("10-24".parse::<HourWindow>().is_err());
    }

    #[test]
    fn table_serializes_in_column_order() {
        let s = FilteredSeries::new(GasType::CO2, vec![rec(13, 0, 410.5), rec(13, 20, f64::NAN)]);
        let json = serde_json::to_string(&s.to_table()).unwrap();
        assert_eq!(
            json,
            "{\"time\":[\"2020-07-01T13:00:00\",\"2020-07-01T13:20:00\"],\
             \"co2\":[410.5,null],\"co2_stdev\":[0.2,0.2],\
             \"d13co2\":[-9.0,-9.0],\"d13co2_stdev\":[0.05,0.05]}"
        );
    }

    #[test]
    fn scaling_touches_all_measured_fields() {
        let s = FilteredSeries::new(GasType::CH4, vec![rec(1, 0, 2000.)]).scaled(2.);
        let r = &s.records[0];
        assert_eq!((r.conc, r.conc_stdev, r.delta, r.delta_stdev), (4000., 0.4, -18., 0.1));
    }
}
