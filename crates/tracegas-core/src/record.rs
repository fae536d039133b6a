use chrono::NaiveDateTime;
use serde::Serialize;

/// One row of the instrument record file, before any correction.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub timestamp: NaiveDateTime,
    pub tag: String,
    pub h2o: f64,
    pub delta_raw: f64,
    pub delta_raw_stdev: f64,
    /// Concentration of the 12C isotopologue as measured.
    pub major_conc: f64,
    pub major_conc_stdev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectedRecord {
    pub timestamp: NaiveDateTime,
    pub tag: String,
    pub conc: f64,
    pub conc_stdev: f64,
    pub delta: f64,
    pub delta_stdev: f64,
}

impl CorrectedRecord {
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            timestamp: self.timestamp,
            tag: self.tag.clone(),
            conc: self.conc * factor,
            conc_stdev: self.conc_stdev * factor,
            delta: self.delta * factor,
            delta_stdev: self.delta_stdev * factor,
        }
    }
}
