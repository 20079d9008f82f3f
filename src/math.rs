//! Numeric kernels: monotone interpolation and summary statistics.

use serde::Serialize;

/// Monotone cubic Hermite interpolation through a set of points.
///
/// Fritsch, F. N., & Carlson, R. E. (1980). Monotone piecewise cubic
/// interpolation. *SIAM Journal on Numerical Analysis*, 17(2), 238–246.
///
/// # Example
///
/// ```
/// use chromametry::math::Monotone;
/// let f = Monotone::new(&[(0., 0.), (1., 1.), (2., 0.)]);
/// assert_eq!(f.eval(1.), 1.);
/// assert_eq!(f.eval(-5.), 0.);
/// ```
#[derive(Clone, Debug)]
pub struct Monotone {
    x: Vec<f64>,
    y: Vec<f64>,
    h: Vec<f64>, // x[i+1] - x[i]
    m: Vec<f64>, // tangents
}

impl Monotone {
    /// Build the interpolant.  Points are sorted by abscissa; when
    /// several points share one, the first is kept.
    pub fn new(points: &[(f64, f64)]) -> Self {
        let mut sorted = points.to_vec();
        sorted.sort_by(|p, q| p.0.total_cmp(&q.0));
        sorted.dedup_by(|p, q| p.0 == q.0);
        let (x, y): (Vec<f64>, Vec<f64>) = sorted.into_iter().unzip();
        let n = x.len();
        if n < 2 {
            return Monotone { x, y, h: vec![], m: vec![] }
        }
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let secants: Vec<f64> = (0 .. n - 1)
            .map(|i| (y[i + 1] - y[i]) / h[i]).collect();
        let mut m = vec![0.; n];
        m[0] = secants[0];
        m[n - 1] = secants[n - 2];
        for i in 1 .. n - 1 {
            let d0 = secants[i - 1];
            let d1 = secants[i];
            // Local extremum: flat tangent.
            if d0 * d1 <= 0. { continue }
            let alpha = (1. + h[i] / (h[i - 1] + h[i])) / 3.;
            m[i] = (d0 * d1) / ((1. - alpha) * d0 + alpha * d1);
        }
        Monotone { x, y, h, m }
    }

    /// Value of the interpolant at `t`.  Outside the range of the
    /// points, the value of the nearest end point is returned.  An
    /// interpolant without points is identically 0.
    pub fn eval(&self, t: f64) -> f64 {
        let n = self.x.len();
        match n {
            0 => return 0.,
            1 => return self.y[0],
            _ => (),
        }
        if t <= self.x[0] { return self.y[0] }
        if t >= self.x[n - 1] { return self.y[n - 1] }
        let mut low = 0;
        let mut high = n as isize - 2;
        let mut i = 0;
        while low <= high {
            let mid = ((low + high) / 2) as usize;
            if t >= self.x[mid] && t <= self.x[mid + 1] {
                i = mid;
                break;
            }
            if t < self.x[mid] { high = mid as isize - 1 }
            else { low = mid as isize + 1 }
        }
        let dx = self.h[i];
        let s = (t - self.x[i]) / dx;
        let s2 = s * s;
        let s3 = s2 * s;
        let m0 = self.m[i] * dx;
        let m1 = self.m[i + 1] * dx;
        (2. * s3 - 3. * s2 + 1.) * self.y[i]
            + (s3 - 2. * s2 + s) * m0
            + (-2. * s3 + 3. * s2) * self.y[i + 1]
            + (s3 - s2) * m1
    }
}

/// Root mean square of `values`, 0 if empty.
pub fn root_mean_square(values: &[f64]) -> f64 {
    if values.is_empty() { return 0. }
    let sum_sq: f64 = values.iter().map(|v| v * v).sum();
    (sum_sq / values.len() as f64).sqrt()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// Minimum, maximum and average of `values`; all 0 if empty.
pub fn statistics(values: &[f64]) -> Statistics {
    let Some(&first) = values.first() else { return Statistics::default() };
    let mut st = Statistics { min: first, max: first, avg: 0. };
    let mut sum = 0.;
    for &v in values {
        if v < st.min { st.min = v }
        if v > st.max { st.max = v }
        sum += v;
    }
    st.avg = sum / values.len() as f64;
    st
}

/// Geometric mean of `metrics` (each in \[0, 1\]) scaled to 0–100 and
/// rounded to two decimals.  A small epsilon keeps a single null
/// metric from zeroing the score.
pub fn score(metrics: &[f64]) -> f64 {
    const EPS: f64 = 1e-6;
    if metrics.is_empty() { return 0. }
    let product: f64 = metrics.iter().map(|m| m + EPS).product();
    let mean = product.powf(1. / metrics.len() as f64).clamp(0., 1.);
    (mean * 100. * 100.).round() / 100.
}
