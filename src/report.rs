//! Report Module
//! Renders the Markdown report document: dataset summary, chart references,
//! regression summary table, and narrative text.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::stats::regression::YEAR_CUTOFF;
use crate::stats::{FitError, OlsFit};

pub const REPORT_FILE: &str = "report.md";
pub const HOUR_CHART_FILE: &str = "by_hour.png";
pub const WEEK_CHART_FILE: &str = "by_week.png";
pub const YEAR_CHART_FILE: &str = "by_year.png";

/// Everything the rendered document needs, already computed.
pub struct ReportData<'a> {
    pub total_incidents: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub by_hour: &'a [(u32, usize)],
    pub by_week: &'a [(u32, usize)],
    pub by_year: &'a [(i32, usize)],
    pub fit: &'a Result<OlsFit, FitError>,
}

/// Writes the Markdown report.
pub struct ReportWriter;

impl ReportWriter {
    /// Render the document and write it into `out_dir` next to the charts.
    pub fn write(out_dir: &Path, data: &ReportData) -> Result<PathBuf> {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("creating {}", out_dir.display()))?;
        let path = out_dir.join(REPORT_FILE);
        fs::write(&path, Self::render(data))
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "Report written");
        Ok(path)
    }

    /// Produce the full Markdown document.
    pub fn render(data: &ReportData) -> String {
        let mut doc = String::new();

        doc.push_str("# NYPD Shooting Incidents - Descriptive Report\n\n");
        doc.push_str(
            "Built from the NYC Open Data historic export of reported shooting \
             incidents. Counts below are reported incidents, not victims.\n\n",
        );

        doc.push_str("## Dataset\n\n");
        doc.push_str(&format!("- Incidents analyzed: {}\n", data.total_incidents));
        if let Some((first, last)) = data.date_range {
            doc.push_str(&format!("- Occurrence dates: {first} to {last}\n"));
        }
        doc.push('\n');

        doc.push_str("## Shootings by hour of day\n\n");
        doc.push_str(&format!("![Shootings by hour of day]({HOUR_CHART_FILE})\n\n"));
        doc.push_str(&Self::hour_narrative(data.by_hour));
        doc.push_str("\n\n");

        doc.push_str("## Shootings by week of year\n\n");
        doc.push_str(&format!("![Shootings by week of year]({WEEK_CHART_FILE})\n\n"));
        doc.push_str(&Self::week_narrative(data.by_week));
        doc.push_str("\n\n");

        doc.push_str("## Shootings by year\n\n");
        doc.push_str(&format!("![Shootings by year]({YEAR_CHART_FILE})\n\n"));
        doc.push_str(&Self::year_narrative(data.by_year, data.fit));
        doc.push_str("\n\n");

        match data.fit {
            Ok(fit) => {
                doc.push_str(&Self::regression_table(fit));
                doc.push('\n');
            }
            Err(err) => {
                doc.push_str(&format!(
                    "A linear trend for years before {YEAR_CUTOFF} could not be estimated: {err}.\n"
                ));
            }
        }

        doc
    }

    fn hour_narrative(by_hour: &[(u32, usize)]) -> String {
        match (Self::peak(by_hour), Self::trough(by_hour)) {
            (Some((peak_hour, peak_count)), Some((low_hour, low_count))) => format!(
                "Shootings cluster strongly by time of day: the busiest hour is \
                 {peak_hour:02}:00 with {peak_count} incidents, the quietest is \
                 {low_hour:02}:00 with {low_count}."
            ),
            _ => "No rows carried a parseable occurrence time.".to_string(),
        }
    }

    fn week_narrative(by_week: &[(u32, usize)]) -> String {
        match (Self::peak(by_week), Self::trough(by_week)) {
            (Some((peak_week, peak_count)), Some((low_week, low_count))) => format!(
                "Across the calendar, week {peak_week} is the heaviest with \
                 {peak_count} incidents and week {low_week} the lightest with \
                 {low_count}. Week 53 is a partial week and is excluded."
            ),
            _ => "No rows carried a parseable occurrence date.".to_string(),
        }
    }

    fn year_narrative(by_year: &[(i32, usize)], fit: &Result<OlsFit, FitError>) -> String {
        let mut text = match Self::peak(by_year) {
            Some((year, count)) => {
                format!("The heaviest year on record is {year} with {count} incidents.")
            }
            None => "No rows carried a parseable occurrence date.".to_string(),
        };

        if let Ok(fit) = fit {
            let direction = if fit.slope < 0.0 { "falling" } else { "rising" };
            let strength = if fit.slope_p < 0.05 {
                "a statistically significant"
            } else {
                "an inconclusive"
            };
            text.push_str(&format!(
                " Restricted to years before {YEAR_CUTOFF}, the linear fit shows \
                 {strength} {direction} trend of {:+.1} incidents per year \
                 (adjusted R-squared {:.3}).",
                fit.slope, fit.adj_r_squared
            ));
        }
        text
    }

    /// Summary table for the fitted model.
    pub fn regression_table(fit: &OlsFit) -> String {
        let mut table = String::new();
        table.push_str(&format!("### Linear trend, years before {YEAR_CUTOFF}\n\n"));
        table.push_str("| Term | Estimate | Std. error | P-value |\n");
        table.push_str("|------|---------:|-----------:|--------:|\n");
        table.push_str(&format!(
            "| Intercept | {:.3} | {:.3} | {:.4} |\n",
            fit.intercept, fit.intercept_se, fit.intercept_p
        ));
        table.push_str(&format!(
            "| Year | {:.3} | {:.3} | {:.4} |\n",
            fit.slope, fit.slope_se, fit.slope_p
        ));
        table.push_str(&format!(
            "\nObservations: {}. Adjusted R-squared: {:.3}.\n",
            fit.n, fit.adj_r_squared
        ));
        table
    }

    fn peak<K: Copy>(rows: &[(K, usize)]) -> Option<(K, usize)> {
        rows.iter().copied().max_by_key(|&(_, count)| count)
    }

    fn trough<K: Copy>(rows: &[(K, usize)]) -> Option<(K, usize)> {
        rows.iter().copied().min_by_key(|&(_, count)| count)
    }
}
