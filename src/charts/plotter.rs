//! Chart Plotter Module
//! Renders the aggregate views as static PNG charts using plotters.

use anyhow::{Context, Result};
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

use crate::charts::smooth::{self, DEFAULT_SPAN};
use crate::stats::aggregate::COUNT_LABEL;
use crate::stats::regression::YEAR_CUTOFF;
use crate::stats::OlsFit;

const CHART_SIZE: (u32, u32) = (900, 540);
const CAPTION_FONT: (&str, i32) = ("sans-serif", 24);

// Colors
const POINT_COLOR: RGBColor = RGBColor(52, 152, 219); // Blue
const TREND_COLOR: RGBColor = RGBColor(231, 76, 60); // Red

/// Creates the static report charts.
pub struct ChartRenderer;

impl ChartRenderer {
    /// Scatter of hourly counts with a smoothed trend curve.
    pub fn hour_chart(path: &Path, by_hour: &[(u32, usize)]) -> Result<()> {
        let points: Vec<(f64, f64)> = by_hour
            .iter()
            .map(|&(hour, count)| (f64::from(hour), count as f64))
            .collect();
        Self::scatter_with_trend(path, "Shootings by hour of day", "Hour of day", &points, -0.5..23.5)
    }

    /// Scatter of weekly counts with a smoothed trend curve.
    pub fn week_chart(path: &Path, by_week: &[(u32, usize)]) -> Result<()> {
        let points: Vec<(f64, f64)> = by_week
            .iter()
            .map(|&(week, count)| (f64::from(week), count as f64))
            .collect();
        Self::scatter_with_trend(path, "Shootings by week of year", "Week of year", &points, 0.5..52.5)
    }

    /// Line + points of yearly counts, with the OLS trend segment drawn over
    /// the fitted (pre-cutoff) range only.
    pub fn year_chart(path: &Path, by_year: &[(i32, usize)], fit: Option<&OlsFit>) -> Result<()> {
        let points: Vec<(f64, f64)> = by_year
            .iter()
            .map(|&(year, count)| (f64::from(year), count as f64))
            .collect();
        if points.is_empty() {
            anyhow::bail!("yearly aggregate is empty");
        }
        let x_range = points[0].0 - 0.5..points[points.len() - 1].0 + 0.5;

        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Shootings by year", CAPTION_FONT)
            .margin(12)
            .x_label_area_size(42)
            .y_label_area_size(56)
            .build_cartesian_2d(x_range, 0.0..Self::y_ceiling(&points))?;
        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc(COUNT_LABEL)
            .x_label_formatter(&|x| format!("{x:.0}"))
            .draw()?;

        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            POINT_COLOR.stroke_width(2),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, POINT_COLOR.filled())),
        )?;

        if let Some(fit) = fit {
            let fitted_years: Vec<f64> = by_year
                .iter()
                .filter(|&&(year, _)| year < YEAR_CUTOFF)
                .map(|&(year, _)| f64::from(year))
                .collect();
            if let (Some(&first), Some(&last)) = (fitted_years.first(), fitted_years.last()) {
                chart.draw_series(LineSeries::new(
                    [(first, fit.predict(first)), (last, fit.predict(last))],
                    TREND_COLOR.stroke_width(2),
                ))?;
            }
        }

        root.present()
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    fn scatter_with_trend(
        path: &Path,
        caption: &str,
        x_desc: &str,
        points: &[(f64, f64)],
        x_range: Range<f64>,
    ) -> Result<()> {
        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, CAPTION_FONT)
            .margin(12)
            .x_label_area_size(42)
            .y_label_area_size(56)
            .build_cartesian_2d(x_range, 0.0..Self::y_ceiling(points))?;
        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc(COUNT_LABEL)
            .x_label_formatter(&|x| format!("{x:.0}"))
            .draw()?;

        chart.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, POINT_COLOR.filled())),
        )?;
        chart.draw_series(LineSeries::new(
            smooth::loess(points, DEFAULT_SPAN),
            TREND_COLOR.stroke_width(2),
        ))?;

        root.present()
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Top of the y axis: a padded count maximum, never zero-height.
    fn y_ceiling(points: &[(f64, f64)]) -> f64 {
        let max = points.iter().map(|p| p.1).fold(0.0, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_ceiling_pads_the_maximum() {
        let points = [(0.0, 10.0), (1.0, 40.0), (2.0, 20.0)];
        assert!((ChartRenderer::y_ceiling(&points) - 44.0).abs() < 1e-9);
    }

    #[test]
    fn y_ceiling_of_empty_data_stays_positive() {
        assert_eq!(ChartRenderer::y_ceiling(&[]), 1.0);
    }
}
