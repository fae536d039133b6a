use crate::constants::{
    CH4_SCALE_FACTOR, GCWERKS_HEADER_LINES, H2O_CORR_A, H2O_CORR_B, VPDB_RATIO, VPDB_RATIO_STDEV,
};
use crate::gastype::GasType;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Zero-based column positions in the GCWerks record file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub date: usize,
    pub time: usize,
    pub tag: usize,
    pub h2o: usize,
    pub delta: usize,
    pub delta_stdev: usize,
    pub major_conc: usize,
    pub major_conc_stdev: usize,
}

impl ColumnLayout {
    /// Number of columns a row needs to cover every field.
    pub fn min_columns(&self) -> usize {
        [
            self.date,
            self.time,
            self.tag,
            self.h2o,
            self.delta,
            self.delta_stdev,
            self.major_conc,
            self.major_conc_stdev,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidityCorrection {
    pub a: f64,
    pub b: f64,
}

impl Default for HumidityCorrection {
    fn default() -> Self {
        Self { a: H2O_CORR_A, b: H2O_CORR_B }
    }
}

impl HumidityCorrection {
    pub fn divisor(&self, h2o: f64) -> f64 {
        self.a * h2o + self.b
    }
}

/// Isotope-standard reference ratio and its uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRatio {
    pub ratio: f64,
    pub stdev: f64,
}

impl Default for ReferenceRatio {
    fn default() -> Self {
        Self { ratio: VPDB_RATIO, stdev: VPDB_RATIO_STDEV }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub gas: GasType,
    pub header_lines: usize,
    pub columns: ColumnLayout,
    /// `None` passes δ13C through uncorrected.
    pub humidity_correction: Option<HumidityCorrection>,
    #[serde(default)]
    pub reference: ReferenceRatio,
    pub scale_factor: f64,
}

impl fmt::Display for SpeciesConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.humidity_correction {
            Some(_) => write!(f, "{} (humidity corrected)", self.gas),
            None => write!(f, "{}", self.gas),
        }
    }
}

impl SpeciesConfig {
    pub fn ch4() -> Self {
        Self {
            gas: GasType::CH4,
            header_lines: GCWERKS_HEADER_LINES,
            columns: ColumnLayout {
                date: 2,
                time: 3,
                tag: 5,
                h2o: 10,
                delta: 11,
                delta_stdev: 14,
                major_conc: 21,
                major_conc_stdev: 24,
            },
            humidity_correction: Some(HumidityCorrection::default()),
            reference: ReferenceRatio::default(),
            scale_factor: CH4_SCALE_FACTOR,
        }
    }
    pub fn co2() -> Self {
        Self {
            gas: GasType::CO2,
            header_lines: GCWERKS_HEADER_LINES,
            columns: ColumnLayout {
                date: 2,
                time: 3,
                tag: 5,
                h2o: 10,
                delta: 16,
                delta_stdev: 19,
                major_conc: 26,
                major_conc_stdev: 29,
            },
            // CO2 δ13C is used as measured
            humidity_correction: None,
            reference: ReferenceRatio::default(),
            scale_factor: 1.0,
        }
    }
    pub fn for_gas(gas: GasType) -> Self {
        match gas {
            GasType::CH4 => Self::ch4(),
            GasType::CO2 => Self::co2(),
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let content = crate::utils::ensure_utf8(&path)?;
        let cfg: SpeciesConfig = serde_json::from_str(&content)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_in_layout_and_correction() {
        let ch4 = SpeciesConfig::ch4();
        let co2 = SpeciesConfig::co2();
        assert!(ch4.humidity_correction.is_some());
        assert!(co2.humidity_correction.is_none());
        assert_eq!(ch4.columns.min_columns(), 25);
        assert_eq!(co2.columns.min_columns(), 30);
        assert_eq!(co2.scale_factor, 1.0);
    }

    #[test]
    fn reads_partial_json_with_default_reference() {
        let json = r#"{
            "gas": "co2",
            "header_lines": 2,
            "columns": {"date": 0, "time": 1, "tag": 2, "h2o": 3,
                        "delta": 4, "delta_stdev": 5, "major_conc": 6, "major_conc_stdev": 7},
            "humidity_correction": {"a": -0.01, "b": 1.0},
            "scale_factor": 1.0
        }"#;
        let cfg: SpeciesConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.gas, GasType::CO2);
        assert_eq!(cfg.reference, ReferenceRatio::default());
        assert_eq!(cfg.columns.min_columns(), 8);
        assert!((cfg.humidity_correction.unwrap().divisor(10.0) - 0.9).abs() < 1e-12);
    }
}
