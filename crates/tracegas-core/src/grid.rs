//! Fixed 20-minute grid over a span of whole days.
//!
//! Every slot exists whether or not a measurement fell into it, which keeps
//! records from different runs and species index-compatible.

use crate::constants::{GRID_EPOCH_YEAR, GRID_YEARS, SLOT_MINUTES};
use crate::series::{FilteredSeries, HourWindow, SeriesTable};
use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub epoch: NaiveDate,
    pub days: u32,
    pub slot_minutes: u32,
}

impl Default for GridSpec {
    fn default() -> Self {
        // 2018-01-01 .. 2021-01-01, 1096 days with the 2020 leap day
        let epoch = NaiveDate::from_ymd_opt(GRID_EPOCH_YEAR, 1, 1).unwrap_or_default();
        Self::years(epoch, GRID_YEARS)
    }
}

impl GridSpec {
    /// Span of `years` calendar years starting at `epoch`.
    pub fn years(epoch: NaiveDate, years: i32) -> Self {
        let end = epoch.checked_add_months(Months::new(12 * years.max(0) as u32)).unwrap_or(epoch);
        let days = (end - epoch).num_days() as u32;
        Self { epoch, days, slot_minutes: SLOT_MINUTES }
    }

    pub fn slots_per_day(&self) -> usize {
        (24 * 60 / self.slot_minutes) as usize
    }
    pub fn len(&self) -> usize {
        self.days as usize * self.slots_per_day()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot holding `t`, `None` outside the grid.
    pub fn slot(&self, t: &NaiveDateTime) -> Option<usize> {
        let date = t.date();
        if date < self.epoch {
            return None;
        }
        let day = (date - self.epoch).num_days() as usize;
        let per_hour = (60 / self.slot_minutes) as usize;
        let idx = day * self.slots_per_day()
            + t.hour() as usize * per_hour
            + (t.minute() / self.slot_minutes) as usize;
        (idx < self.len()).then_some(idx)
    }

    pub fn slot_start(&self, idx: usize) -> NaiveDateTime {
        self.epoch.and_time(NaiveTime::MIN)
            + Duration::minutes(idx as i64 * self.slot_minutes as i64)
    }

    pub fn times(&self) -> Vec<NaiveDateTime> {
        (0..self.len()).map(|i| self.slot_start(i)).collect()
    }

    /// Slot indices whose in-day hour lies within `window`.
    pub fn window_slots(&self, window: HourWindow) -> impl Iterator<Item = usize> + '_ {
        let per_day = self.slots_per_day();
        let per_hour = (60 / self.slot_minutes) as usize;
        let first = window.start as usize * per_hour;
        let last = ((window.end as usize + 1) * per_hour).min(per_day);
        (0..self.days as usize).flat_map(move |d| (d * per_day + first)..(d * per_day + last))
    }
}

#[derive(Debug, Clone)]
pub struct GriddedSeries {
    pub spec: GridSpec,
    pub conc: Vec<Option<f64>>,
    pub conc_stdev: Vec<Option<f64>>,
    pub delta: Vec<Option<f64>>,
    pub delta_stdev: Vec<Option<f64>>,
}

impl GriddedSeries {
    /// Records outside the grid are skipped; a later record overwrites an
    /// earlier one in the same slot.
    pub fn build(series: &FilteredSeries, spec: GridSpec) -> Self {
        let n = spec.len();
        let mut grid = Self {
            spec,
            conc: vec![None; n],
            conc_stdev: vec![None; n],
            delta: vec![None; n],
            delta_stdev: vec![None; n],
        };
        let mut skipped = 0usize;
        for rec in &series.records {
            match spec.slot(&rec.timestamp) {
                Some(i) => {
                    grid.conc[i] = Some(rec.conc);
                    grid.conc_stdev[i] = Some(rec.conc_stdev);
                    grid.delta[i] = Some(rec.delta);
                    grid.delta_stdev[i] = Some(rec.delta_stdev);
                },
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            log::warn!("{skipped} records fall outside the grid starting {}", spec.epoch);
        }
        grid
    }

    pub fn filled(&self) -> usize {
        self.conc.iter().filter(|v| v.is_some()).count()
    }

    /// Copy of the grid with every slot outside `window` cleared.
    pub fn window(&self, window: HourWindow) -> Self {
        let n = self.spec.len();
        let mut out = Self {
            spec: self.spec,
            conc: vec![None; n],
            conc_stdev: vec![None; n],
            delta: vec![None; n],
            delta_stdev: vec![None; n],
        };
        for i in self.spec.window_slots(window) {
            out.conc[i] = self.conc[i];
            out.conc_stdev[i] = self.conc_stdev[i];
            out.delta[i] = self.delta[i];
            out.delta_stdev[i] = self.delta_stdev[i];
        }
        out
    }

    pub fn to_table(&self, series: &FilteredSeries, window: HourWindow) -> SeriesTable {
        let gas = series.gas;
        let day = self.window(window);
        let mut table = SeriesTable::new(self.spec.times());
        table.push(gas.column_name(), self.conc.clone());
        table.push(&gas.stdev_col(), self.conc_stdev.clone());
        table.push(&gas.delta_col(), self.delta.clone());
        table.push(&gas.delta_stdev_col(), self.delta_stdev.clone());
        table.push(&format!("{}_day", gas.column_name()), day.conc);
        table.push(&format!("{}_day", gas.stdev_col()), day.conc_stdev);
        table.push(&format!("{}_day", gas.delta_col()), day.delta);
        table.push(&format!("{}_day", gas.delta_stdev_col()), day.delta_stdev);
        table
    }
}
