use crate::classify::Partitions;
use crate::record::CorrectedRecord;
use crate::utils::nan_mean;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Ambient air measured between two consecutive runs of the same tank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TankInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub count: usize,
    pub mean_conc: f64,
    pub mean_delta: f64,
}

pub fn tank_intervals(tank_times: &[NaiveDateTime], ambient: &[CorrectedRecord]) -> Vec<TankInterval> {
    let mut times = tank_times.to_vec();
    times.sort_unstable();
    times.dedup();

    times
        .windows(2)
        .map(|w| {
            let (start, end) = (w[0], w[1]);
            let (conc, delta): (Vec<f64>, Vec<f64>) = ambient
                .iter()
                .filter(|r| r.timestamp >= start && r.timestamp < end)
                .map(|r| (r.conc, r.delta))
                .unzip();
            TankInterval {
                start,
                end,
                count: conc.len(),
                mean_conc: nan_mean(&conc),
                mean_delta: nan_mean(&delta),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct TankSummary {
    pub serial: String,
    pub count: usize,
    pub times: Vec<NaiveDateTime>,
    pub intervals: Vec<TankInterval>,
}

/// One summary per tank serial, sorted by serial. `ambient` is the filtered
/// air series the intervals are averaged over.
pub fn summarize(parts: &Partitions, ambient: &[CorrectedRecord]) -> Vec<TankSummary> {
    parts
        .tank_serials()
        .into_iter()
        .map(|serial| {
            let records = &parts.tanks[serial];
            let times: Vec<NaiveDateTime> = records.iter().map(|r| r.timestamp).collect();
            let intervals = tank_intervals(&times, ambient);
            TankSummary { serial: serial.to_owned(), count: records.len(), times, intervals }
        })
        .collect()
}
