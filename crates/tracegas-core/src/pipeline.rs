use crate::classify::{Partitions, TagClassifier};
use crate::constants::MATCH_TOLERANCE_SECS;
use crate::data_formats::gcwerks::read_gcwerks_file;
use crate::data_formats::meteodata::MeteoData;
use crate::detrend::{detrend_from, detrend_masked, DetrendError, Detrended};
use crate::error::Result;
use crate::grid::{GridSpec, GriddedSeries};
use crate::isotope::correct_all;
use crate::monthly::{MonthlyAggregate, MonthlyBins};
use crate::record::RawRecord;
use crate::series::{AlignedSeries, FilteredSeries, HourWindow};
use crate::species::SpeciesConfig;
use crate::utils::to_secs;
use std::path::Path;

/// Output of correction and tag filtering.
#[derive(Debug, Clone)]
pub struct Processed {
    pub series: FilteredSeries,
    pub partitions: Partitions,
}

/// One parameterised parse → correct → filter chain for any species.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub species: SpeciesConfig,
    pub classifier: TagClassifier,
    pub tolerance_secs: i64,
}

impl Pipeline {
    pub fn new(species: SpeciesConfig) -> Self {
        Self { species, classifier: TagClassifier::default(), tolerance_secs: MATCH_TOLERANCE_SECS }
    }

    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<Processed> {
        let raw = read_gcwerks_file(path, &self.species)?;
        Ok(self.process(&raw))
    }

    pub fn process(&self, raw: &[RawRecord]) -> Processed {
        let corrected = correct_all(raw, &self.species);
        let mut partitions = self.classifier.partition(corrected);
        let series = FilteredSeries::new(self.species.gas, std::mem::take(&mut partitions.ambient));

        log::info!(
            "{}: {} ambient, {} tank, {} dropped of {} records",
            self.species,
            series.len(),
            partitions.tank_count(),
            partitions.dropped,
            raw.len()
        );
        if !series.is_time_ordered() {
            log::warn!("{} ambient records are not in strictly increasing time order", self.species.gas);
        }
        Processed { series, partitions }
    }

    /// Attach the nearest meteorological observation to every record; records
    /// without one within the tolerance get `None`.
    pub fn align(&self, series: FilteredSeries, meteo: &MeteoData) -> AlignedSeries {
        let (wind_speed, wind_direction): (Vec<Option<f64>>, Vec<Option<f64>>) = series
            .records
            .iter()
            .map(|r| match meteo.get_nearest(to_secs(&r.timestamp), self.tolerance_secs) {
                Some((speed, direction)) => (Some(speed), Some(direction)),
                None => (None, None),
            })
            .unzip();
        let aligned = AlignedSeries { series, wind_speed, wind_direction };
        log::info!("Matched meteo data for {} of {} records", aligned.matched(), aligned.series.len());
        aligned
    }

    pub fn grid(&self, series: &FilteredSeries, spec: GridSpec) -> GriddedSeries {
        GriddedSeries::build(series, spec)
    }

    /// Afternoon subset, detrended from `start`, binned by month. δ is fitted
    /// only where the concentration is valid too.
    pub fn seasonal(
        &self,
        series: &FilteredSeries,
        window: HourWindow,
        start: usize,
        bins: MonthlyBins,
    ) -> std::result::Result<Seasonal, DetrendError> {
        let pm = series.afternoon(window);
        let conc_all = pm.conc();
        let conc = detrend_from(&conc_all, start)?;
        let delta_all = pm.delta();
        let delta_mask: Vec<bool> = conc_all[start..]
            .iter()
            .zip(&delta_all[start..])
            .map(|(c, d)| !c.is_nan() && !d.is_nan())
            .collect();
        let delta = detrend_masked(&delta_all[start..], &delta_mask)?;
        let times = pm.times();
        let monthly_conc = bins.aggregate(&times[start..], &conc.values);
        let monthly_delta = bins.aggregate(&times[start..], &delta.values);
        Ok(Seasonal { conc, delta, monthly_conc, monthly_delta })
    }
}

#[derive(Debug, Clone)]
pub struct Seasonal {
    pub conc: Detrended,
    pub delta: Detrended,
    pub monthly_conc: MonthlyAggregate,
    pub monthly_delta: MonthlyAggregate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn dt(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 5, d).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn raw(t: NaiveDateTime, tag: &str) -> RawRecord {
        RawRecord {
            timestamp: t,
            tag: tag.to_owned(),
            h2o: 1.0,
            delta_raw: -47.,
            delta_raw_stdev: 0.2,
            major_conc: 1980.,
            major_conc_stdev: 1.,
        }
    }

    #[test]
    fn keeps_only_ambient_air() {
        let p = Pipeline::new(SpeciesConfig::ch4());
        let out = p.process(&[
            raw(dt(1, 0, 0), "air"),
            raw(dt(1, 0, 20), "D671527"),
            raw(dt(1, 0, 40), "junk"),
            raw(dt(1, 1, 0), "air"),
        ]);
        assert_eq!(out.series.len(), 2);
        assert!(out.partitions.ambient.is_empty());
        assert_eq!(out.partitions.tank_count(), 1);
        assert_eq!(out.partitions.dropped, 1);
    }

    #[test]
    fn alignment_degrades_to_none() {
        let p = Pipeline::new(SpeciesConfig::ch4());
        let out = p.process(&[raw(dt(1, 0, 5), "air"), raw(dt(1, 3, 0), "air")]);
        let meteo = MeteoData {
            datetime: vec![to_secs(&dt(1, 0, 0)), to_secs(&dt(1, 0, 21))],
            wind_speed: vec![1.5, 2.5],
            wind_direction: vec![90., 100.],
        };
        let aligned = p.align(out.series, &meteo);
        assert_eq!(aligned.wind_speed, vec![Some(1.5), None]);
        assert_eq!(aligned.wind_direction, vec![Some(90.), None]);
        assert_eq!(aligned.matched(), 1);
    }

    #[test]
    fn seasonal_detrends_afternoon_values() {
        let p = Pipeline::new(SpeciesConfig::co2());
        let mut records = Vec::new();
        for d in 1..=20 {
            records.push(raw(dt(d, 9, 0), "air"));
            records.push(raw(dt(d, 14, 0), "air"));
        }
        let out = p.process(&records);
        let s = p.seasonal(&out.series, HourWindow::default(), 0, MonthlyBins::default()).unwrap();
        assert_eq!(s.conc.values.len(), 20);
        assert_eq!(s.monthly_conc.get(2019, 5).map(<[f64]>::len), Some(20));
        assert!(s.conc.fit.slope.abs() < 1e-9);
    }

    #[test]
    fn delta_fit_skips_missing_concentration() {
        let p = Pipeline::new(SpeciesConfig::co2());
        let mut records: Vec<RawRecord> = (1..=9)
            .map(|d| RawRecord { delta_raw: -8. - d as f64, ..raw(dt(d, 14, 0), "air") })
            .collect();
        records.push(RawRecord {
            delta_raw: 100.,
            major_conc: f64::NAN,
            ..raw(dt(10, 14, 0), "air")
        });
        let out = p.process(&records);
        let s = p.seasonal(&out.series, HourWindow::default(), 0, MonthlyBins::default()).unwrap();
        assert!((s.delta.fit.slope + 1.).abs() < 1e-9);
        assert_eq!(s.delta.values.len(), 10);
    }

    #[test]
    fn infinite_concentration_does_not_abort() {
        let p = Pipeline::new(SpeciesConfig::co2());
        let mut records: Vec<RawRecord> = (1..=10).map(|d| raw(dt(d, 14, 0), "air")).collect();
        records[3].major_conc = f64::INFINITY;
        let out = p.process(&records);
        let s = p.seasonal(&out.series, HourWindow::default(), 0, MonthlyBins::default()).unwrap();
        assert!(!s.conc.fit.slope.is_finite());
        assert!(s.conc.values.iter().all(|v| v.is_nan()));
    }
}
