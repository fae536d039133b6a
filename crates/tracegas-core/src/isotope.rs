//! Humidity correction of δ13C and the 12C + 13C mass balance.
//!
//! Nothing here guards against zero divisors or negative concentrations,
//! non-finite values simply flow through to the output.

use crate::record::{CorrectedRecord, RawRecord};
use crate::species::{HumidityCorrection, ReferenceRatio, SpeciesConfig};

/// δ13C and its stdev on a dry-air basis.
pub fn dry_delta(
    delta: f64,
    delta_stdev: f64,
    h2o: f64,
    correction: Option<&HumidityCorrection>,
) -> (f64, f64) {
    match correction {
        Some(c) => {
            let divisor = c.divisor(h2o);
            (delta / divisor, delta_stdev / divisor)
        },
        None => (delta, delta_stdev),
    }
}

/// 13C isotopologue concentration implied by the 12C concentration and δ13C.
pub fn minor_conc(
    major: f64,
    major_stdev: f64,
    delta: f64,
    delta_stdev: f64,
    reference: &ReferenceRatio,
) -> (f64, f64) {
    let minor = reference.ratio * major * (1. + delta * 1e-3);
    let minor_stdev = reference.stdev * major_stdev * (1. + delta_stdev * 1e-3);
    (minor, minor_stdev)
}

pub fn correct(raw: &RawRecord, species: &SpeciesConfig) -> CorrectedRecord {
    let (delta, delta_stdev) = dry_delta(
        raw.delta_raw,
        raw.delta_raw_stdev,
        raw.h2o,
        species.humidity_correction.as_ref(),
    );
    let (minor, minor_stdev) =
        minor_conc(raw.major_conc, raw.major_conc_stdev, delta, delta_stdev, &species.reference);

    CorrectedRecord {
        timestamp: raw.timestamp,
        tag: raw.tag.clone(),
        conc: raw.major_conc + minor,
        conc_stdev: (raw.major_conc_stdev.powi(2) + minor_stdev.powi(2)).sqrt(),
        delta,
        delta_stdev,
    }
}

pub fn correct_all(raw: &[RawRecord], species: &SpeciesConfig) -> Vec<CorrectedRecord> {
    raw.iter().map(|r| correct(r, species)).collect()
}
