//! Shooting Trends - NYPD shooting incident data analysis & report generator
//!
//! One forward pass: fetch the CSV export, clean and retype it, compute the
//! descriptive aggregates, fit the yearly trend, and render the report.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use shooting_trends::charts::ChartRenderer;
use shooting_trends::data::{fetch, Cleaner, DataLoader};
use shooting_trends::model::Incident;
use shooting_trends::report::{self, ReportData, ReportWriter};
use shooting_trends::stats::{Aggregator, Regressor};

#[derive(Parser)]
#[command(name = "shooting_trends")]
#[command(about = "Builds a descriptive report from NYPD shooting incident data", long_about = None)]
struct Cli {
    /// Path to a saved CSV export, or URL to fetch
    #[arg(value_name = "FILE_OR_URL", default_value = fetch::DATASET_URL)]
    source: String,

    /// Directory for the rendered report and charts
    #[arg(short, long, default_value = "report")]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let raw = fetch::fetch_csv(&cli.source)?;
    let df = DataLoader::read_csv(&raw)?;
    info!(rows = df.height(), columns = df.width(), "Dataset loaded");

    let cleaned = Cleaner::select_columns(&df)?;
    let incidents = Cleaner::to_incidents(&cleaned)?;
    let murders = incidents.iter().filter(|inc| inc.murder).count();
    info!(incidents = incidents.len(), murders, "Dataset cleaned");

    let by_hour = Aggregator::by_hour(&incidents);
    let by_week = Aggregator::by_week(&incidents);
    let by_year = Aggregator::by_year(&incidents);
    info!(
        hours = by_hour.len(),
        weeks = by_week.len(),
        years = by_year.len(),
        "Aggregates computed"
    );

    let fit = Regressor::fit_yearly_trend(&by_year);
    match &fit {
        Ok(model) => {
            debug!(model = %serde_json::to_string(model)?, "Fitted yearly trend");
            info!(
                slope = model.slope,
                p_value = model.slope_p,
                adj_r_squared = model.adj_r_squared,
                "Yearly trend fitted"
            );
        }
        Err(err) => warn!(%err, "Yearly trend fit failed"),
    }

    std::fs::create_dir_all(&cli.output)?;
    ChartRenderer::hour_chart(&cli.output.join(report::HOUR_CHART_FILE), &by_hour)?;
    ChartRenderer::week_chart(&cli.output.join(report::WEEK_CHART_FILE), &by_week)?;
    ChartRenderer::year_chart(
        &cli.output.join(report::YEAR_CHART_FILE),
        &by_year,
        fit.as_ref().ok(),
    )?;

    let data = ReportData {
        total_incidents: incidents.len(),
        date_range: date_range(&incidents),
        by_hour: &by_hour,
        by_week: &by_week,
        by_year: &by_year,
        fit: &fit,
    };
    ReportWriter::write(&cli.output, &data)?;

    Ok(())
}

/// First and last occurrence dates among rows that have one.
fn date_range(incidents: &[Incident]) -> Option<(NaiveDate, NaiveDate)> {
    let mut dates = incidents.iter().filter_map(|inc| inc.occur_date);
    let first = dates.next()?;
    let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some((min, max))
}
