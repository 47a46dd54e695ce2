//! Aggregation Module
//! Group-by-count reductions over cleaned incident records.

use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};

use crate::model::Incident;

/// Human label for the count column, used by charts and the report.
pub const COUNT_LABEL: &str = "Shootings";

/// ISO week 53 only exists in some years and is always partial; its low count
/// distorts the weekly axis, so it is removed after counting.
pub const PARTIAL_WEEK: u32 = 53;

/// Builds (key, count) tables from incident records.
///
/// Each view keys on a component derived from the occurrence date or time;
/// records where that component is null are skipped for that view only.
pub struct Aggregator;

impl Aggregator {
    /// Incident counts by hour of day (0-23).
    pub fn by_hour(incidents: &[Incident]) -> Vec<(u32, usize)> {
        Self::count_by(
            incidents
                .iter()
                .filter_map(|inc| inc.occur_time.map(|t| t.hour())),
        )
    }

    /// Incident counts by ISO week of year, with the partial week 53 removed.
    pub fn by_week(incidents: &[Incident]) -> Vec<(u32, usize)> {
        let mut counts = Self::count_by(
            incidents
                .iter()
                .filter_map(|inc| inc.occur_date.map(|d| d.iso_week().week())),
        );
        counts.retain(|&(week, _)| week != PARTIAL_WEEK);
        counts
    }

    /// Incident counts by calendar year.
    pub fn by_year(incidents: &[Incident]) -> Vec<(i32, usize)> {
        Self::count_by(incidents.iter().filter_map(|inc| inc.occur_date.map(|d| d.year())))
    }

    /// Count occurrences per key, sorted ascending by key.
    fn count_by<K: Ord>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
        let mut counts: BTreeMap<K, usize> = BTreeMap::new();
        for key in keys {
            *counts.entry(key).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }
}
