use crate::stats::LinReg;
use serde::Serialize;
use std::fmt;

#[derive(Debug, PartialEq)]
pub enum DetrendError {
    StartOutOfRange { start: usize, len: usize },
    NotEnoughPoints { len: usize, needed: usize },
    MaskLength { mask: usize, values: usize },
}

impl fmt::Display for DetrendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetrendError::StartOutOfRange { start, len } => {
                write!(f, "detrend start {start} is past the end of a series of {len}")
            },
            DetrendError::NotEnoughPoints { len, needed } => {
                write!(f, "not enough valid points: got {len}, need at least {needed}")
            },
            DetrendError::MaskLength { mask, values } => {
                write!(f, "mask of length {mask} does not match {values} values")
            },
        }
    }
}

impl std::error::Error for DetrendError {}

#[derive(Debug, Clone, Serialize)]
pub struct Detrended {
    pub fit: LinReg,
    /// Same length as the input range, NaNs where the input had them.
    pub values: Vec<f64>,
}

/// Removes the linear trend of `values` against their position, keeping the
/// intercept. NaN points are left out of the fit.
pub fn detrend(values: &[f64]) -> Result<Detrended, DetrendError> {
    let mask: Vec<bool> = values.iter().map(|v| !v.is_nan()).collect();
    detrend_masked(values, &mask)
}

/// [`detrend`] fitted only over positions where `mask` is true. Infinite
/// values that pass the mask give a non-finite fit and all-NaN output.
pub fn detrend_masked(values: &[f64], mask: &[bool]) -> Result<Detrended, DetrendError> {
    if mask.len() != values.len() {
        return Err(DetrendError::MaskLength { mask: mask.len(), values: values.len() });
    }
    let (x, y): (Vec<f64>, Vec<f64>) = values
        .iter()
        .zip(mask)
        .enumerate()
        .filter(|(_, (_, &keep))| keep)
        .map(|(i, (&v, _))| (i as f64, v))
        .unzip();

    if x.len() < 2 {
        return Err(DetrendError::NotEnoughPoints { len: x.len(), needed: 2 });
    }
    let fit = LinReg::train(&x, &y);
    if !fit.slope.is_finite() {
        log::warn!("Non-finite slope in detrend fit over {} points", x.len());
    }

    let values = values.iter().enumerate().map(|(i, v)| v - fit.slope * i as f64).collect();
    Ok(Detrended { fit, values })
}

/// [`detrend`] over `values[start..]`, positions counted from `start`.
pub fn detrend_from(values: &[f64], start: usize) -> Result<Detrended, DetrendError> {
    if start > values.len() {
        return Err(DetrendError::StartOutOfRange { start, len: values.len() });
    }
    detrend(&values[start..])
}
