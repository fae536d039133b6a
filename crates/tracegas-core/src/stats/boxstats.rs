use serde::Serialize;
use statrs::statistics::{Data, Max, Min, OrderStatistics};

/// Five-number summary plus mean, as drawn in a whisker plot spanning the full range.
/// Quartiles interpolate linearly between order statistics (numpy's default
/// percentile), so `[1, 2, 3, 4, 5]` has q1 = 2 and q3 = 4.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

impl BoxStats {
    /// NaNs are dropped first; `None` unless more than `min_count` values remain.
    pub fn from_values(values: &[f64], min_count: usize) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        let count = finite.len();
        if count <= min_count || count == 0 {
            return None;
        }
        let mean = finite.iter().sum::<f64>() / count as f64;
        let mut data = Data::new(finite);
        Some(Self {
            count,
            min: data.min(),
            q1: linear_quantile(&mut data, 0.25),
            median: linear_quantile(&mut data, 0.5),
            q3: linear_quantile(&mut data, 0.75),
            max: data.max(),
            mean,
        })
    }
}

/// `tau` quantile at rank `(n - 1) * tau`, interpolated between neighbours.
fn linear_quantile(data: &mut Data<Vec<f64>>, tau: f64) -> f64 {
    let n = data.len();
    let h = (n - 1) as f64 * tau;
    let lo = h.floor() as usize;
    let below = data.order_statistic(lo + 1);
    if lo + 1 >= n {
        return below;
    }
    let above = data.order_statistic(lo + 2);
    below + (h - lo as f64) * (above - below)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_more_than_min_count() {
        assert!(BoxStats::from_values(&[1., 2., 3.], 3).is_none());
        assert!(BoxStats::from_values(&[1., 2., 3., f64::NAN], 3).is_none());
        assert!(BoxStats::from_values(&[], 0).is_none());
    }

    #[test]
    fn summary_of_simple_sample() {
        let s = BoxStats::from_values(&[5., 1., f64::NAN, 3., 2., 4.], 3).unwrap();
        assert_eq!(s.count, 5);
        assert_eq!(s.min, 1.);
        assert_eq!(s.max, 5.);
        assert!((s.median - 3.).abs() < 1e-12);
        assert!((s.mean - 3.).abs() < 1e-12);
        assert!(s.q1 <= s.median && s.median <= s.q3);
    }

    #[test]
    fn quartiles_interpolate_linearly() {
        let s = BoxStats::from_values(&[1., 2., 3., 4., 5.], 3).unwrap();
        assert_eq!(s.q1, 2.);
        assert_eq!(s.median, 3.);
        assert_eq!(s.q3, 4.);

        let s = BoxStats::from_values(&[4., 1., 3., 2.], 3).unwrap();
        assert!((s.q1 - 1.75).abs() < 1e-12);
        assert!((s.median - 2.5).abs() < 1e-12);
        assert!((s.q3 - 3.25).abs() < 1e-12);
    }
}
