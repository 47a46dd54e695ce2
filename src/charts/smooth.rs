//! Trend Smoothing Module
//! Locally-weighted linear regression (tricube weights) for the trend curves
//! drawn over the hour and week scatters.

/// Fraction of points participating in each local fit.
pub const DEFAULT_SPAN: f64 = 0.75;

/// Smooth `points` with local linear fits, evaluated at each input x.
///
/// For every x, the nearest `span * n` points are weighted by the tricube
/// kernel and a weighted least-squares line is solved; collapsed windows
/// (zero spread or a singular system) fall back to the weighted mean.
/// Input order is preserved and x values pass through unchanged.
pub fn loess(points: &[(f64, f64)], span: f64) -> Vec<(f64, f64)> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let k = ((span * n as f64).ceil() as usize).clamp(2, n);

    points
        .iter()
        .map(|&(x0, _)| {
            let mut by_distance: Vec<(f64, usize)> = points
                .iter()
                .enumerate()
                .map(|(i, &(x, _))| ((x - x0).abs(), i))
                .collect();
            by_distance
                .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
            let window = &by_distance[..k];
            let dmax = window[k - 1].0;

            let mut sw = 0.0;
            let mut swx = 0.0;
            let mut swy = 0.0;
            let mut swxx = 0.0;
            let mut swxy = 0.0;
            for &(dist, idx) in window {
                let weight = if dmax > 0.0 {
                    let u = dist / dmax;
                    (1.0 - u.powi(3)).powi(3)
                } else {
                    1.0
                };
                let (x, y) = points[idx];
                sw += weight;
                swx += weight * x;
                swy += weight * y;
                swxx += weight * x * x;
                swxy += weight * x * y;
            }

            let denom = sw * swxx - swx * swx;
            let smoothed = if denom.abs() > 1e-12 && sw > 0.0 {
                let slope = (sw * swxy - swx * swy) / denom;
                let intercept = (swy - slope * swx) / sw;
                intercept + slope * x0
            } else if sw > 0.0 {
                swy / sw
            } else {
                points.iter().find(|p| p.0 == x0).map(|p| p.1).unwrap_or(0.0)
            };

            (x0, smoothed)
        })
        .collect()
}
