use crate::constants::{MONTHLY_FIRST_YEAR, MONTHLY_MONTHS};
use crate::stats::BoxStats;
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A run of consecutive calendar months, addressed by offset from the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyBins {
    pub first_year: i32,
    pub first_month: u32,
    pub months: usize,
}

impl Default for MonthlyBins {
    fn default() -> Self {
        Self { first_year: MONTHLY_FIRST_YEAR, first_month: 1, months: MONTHLY_MONTHS }
    }
}

impl MonthlyBins {
    pub fn month_offset(&self, year: i32, month: u32) -> Option<usize> {
        let offset =
            (year - self.first_year) as i64 * 12 + month as i64 - self.first_month as i64;
        if offset < 0 || offset >= self.months as i64 {
            None
        } else {
            Some(offset as usize)
        }
    }

    pub fn month_starts(&self) -> Vec<NaiveDate> {
        let Some(first) = NaiveDate::from_ymd_opt(self.first_year, self.first_month, 1) else {
            return Vec::new();
        };
        (0..self.months)
            .filter_map(|i| first.checked_add_months(Months::new(i as u32)))
            .collect()
    }

    /// Pairs `times` with `values` up to the shorter of the two.
    pub fn aggregate(&self, times: &[NaiveDateTime], values: &[f64]) -> MonthlyAggregate {
        if times.len() != values.len() {
            log::warn!("{} times for {} values, extra entries ignored", times.len(), values.len());
        }
        let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); self.months];
        for (t, &v) in times.iter().zip(values) {
            if let Some(i) = self.month_offset(t.year(), t.month()) {
                buckets[i].push(v);
            }
        }
        MonthlyAggregate { month_starts: self.month_starts(), buckets }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAggregate {
    pub month_starts: Vec<NaiveDate>,
    pub buckets: Vec<Vec<f64>>,
}

impl MonthlyAggregate {
    pub fn get(&self, year: i32, month: u32) -> Option<&[f64]> {
        self.month_starts
            .iter()
            .position(|d| d.year() == year && d.month() == month)
            .map(|i| self.buckets[i].as_slice())
    }

    pub fn summaries(&self, min_count: usize) -> Vec<Option<BoxStats>> {
        self.buckets.iter().map(|b| BoxStats::from_values(b, min_count)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(14, 0, 0).unwrap()
    }

    #[test]
    fn january_full_february_empty() {
        let bins = MonthlyBins::default();
        let times: Vec<NaiveDateTime> = (1..=31).map(|d| dt(2018, 1, d)).collect();
        let values: Vec<f64> = (1..=31).map(f64::from).collect();
        let agg = bins.aggregate(&times, &values);
        assert_eq!(agg.buckets.len(), 48);
        assert_eq!(agg.buckets[0].len(), 31);
        assert!(agg.buckets[1].is_empty());
        assert_eq!(agg.month_starts[1], NaiveDate::from_ymd_opt(2018, 2, 1).unwrap());
        assert_eq!(agg.get(2018, 2), Some(&[][..]));
    }

    #[test]
    fn offsets_and_span() {
        let bins = MonthlyBins::default();
        assert_eq!(bins.month_offset(2018, 1), Some(0));
        assert_eq!(bins.month_offset(2019, 3), Some(14));
        assert_eq!(bins.month_offset(2021, 12), Some(47));
        assert_eq!(bins.month_offset(2022, 1), None);
        assert_eq!(bins.month_offset(2017, 12), None);

        let shifted = MonthlyBins { first_year: 2018, first_month: 3, months: 12 };
        assert_eq!(shifted.month_offset(2018, 2), None);
        assert_eq!(shifted.month_offset(2019, 2), Some(11));
        assert_eq!(shifted.month_starts().last(), NaiveDate::from_ymd_opt(2019, 2, 1).as_ref());
    }

    #[test]
    fn mismatched_lengths_use_shorter() {
        let bins = MonthlyBins::default();
        let agg = bins.aggregate(&[dt(2018, 1, 1), dt(2018, 1, 2), dt(2018, 2, 1)], &[1., 2.]);
        assert_eq!(agg.buckets[0], vec![1., 2.]);
        assert!(agg.buckets[1].is_empty());
        let agg = bins.aggregate(&[dt(2018, 1, 1)], &[1., 2., 3.]);
        assert_eq!(agg.buckets[0], vec![1.]);
    }

    #[test]
    fn values_outside_span_are_ignored() {
        let bins = MonthlyBins::default();
        let agg = bins.aggregate(&[dt(2017, 12, 31), dt(2022, 1, 1)], &[1., 2.]);
        assert!(agg.buckets.iter().all(Vec::is_empty));
    }

    #[test]
    fn summaries_respect_min_count() {
        let bins = MonthlyBins::default();
        let times = [dt(2018, 1, 1), dt(2018, 1, 2), dt(2018, 1, 3), dt(2018, 2, 1), dt(2018, 2, 2), dt(2018, 2, 3), dt(2018, 2, 4)];
        let agg = bins.aggregate(&times, &[1., 2., 3., 1., 2., 3., 4.]);
        let s = agg.summaries(3);
        assert!(s[0].is_none());
        assert_eq!(s[1].map(|b| b.count), Some(4));
        assert!(s[2].is_none());
    }
}
