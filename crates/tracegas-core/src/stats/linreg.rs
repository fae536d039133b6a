use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LinReg {
    pub intercept: f64,
    pub slope: f64,
}

impl fmt::Display for LinReg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "y = {} + {} * x", self.intercept, self.slope)
    }
}

impl Default for LinReg {
    fn default() -> Self {
        Self::new()
    }
}

impl LinReg {
    pub fn new() -> Self {
        Self { intercept: 0., slope: 0. }
    }
    pub fn calculate(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// Ordinary least squares. Callers make sure there are at least two
    /// distinct x values, otherwise the slope is NaN.
    pub fn train(x: &[f64], y: &[f64]) -> Self {
        assert!(x.len() == y.len(), "Input vectors x and y must have the same length");

        let avg_x: f64 = x.iter().sum::<f64>() / x.len() as f64;
        let avg_y = y.iter().sum::<f64>() / y.len() as f64;

        let (ss_xx, ss_xy) = x.iter().zip(y).fold((0., 0.), |(ss_xx, ss_xy), (xi, yi)| {
            let dx = xi - avg_x;
            (ss_xx + dx * dx, ss_xy + dx * (yi - avg_y))
        });
        let slope = ss_xy / ss_xx;
        let intercept = avg_y - slope * avg_x;

        Self { intercept, slope }
    }
}

#[cfg(test)]
mod tests {
    use super::LinReg;

    #[test]
    fn fits_exact_line() {
        let x: Vec<f64> = (0..10).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| 2. * v + 5.).collect();
        let lr = LinReg::train(&x, &y);
        assert!((lr.slope - 2.).abs() < 1e-12);
        assert!((lr.intercept - 5.).abs() < 1e-12);
        assert!((lr.calculate(20.) - 45.).abs() < 1e-9);
    }

    #[test]
    fn flat_x_gives_nan_slope() {
        let lr = LinReg::train(&[1., 1., 1.], &[1., 2., 3.]);
        assert!(lr.slope.is_nan());
    }

    #[test]
    #[should_panic]
    fn length_mismatch_panics() {
        LinReg::train(&[1., 2.], &[1.]);
    }
}
