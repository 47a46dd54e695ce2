//! Data Cleaner Module
//! Column selection, date/time retyping, and categorical coercion.

use chrono::{NaiveDate, NaiveTime};
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

use crate::model::{AgeGroup, Incident, Race, Sex};

pub const KEY_COLUMN: &str = "INCIDENT_KEY";
pub const DATE_COLUMN: &str = "OCCUR_DATE";
pub const TIME_COLUMN: &str = "OCCUR_TIME";
pub const MURDER_FLAG_COLUMN: &str = "STATISTICAL_MURDER_FLAG";
pub const MURDER_COLUMN: &str = "murder";
pub const LAST_COLUMN: &str = "VIC_RACE";

/// Location and jurisdiction columns removed from the retained range.
pub const DROPPED_COLUMNS: [&str; 6] = [
    "BORO",
    "LOC_OF_OCCUR_DESC",
    "PRECINCT",
    "JURISDICTION_CODE",
    "LOC_CLASSFCTN_DESC",
    "LOCATION_DESC",
];

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column not found: {0}")]
    MissingColumn(String),
    #[error("Column {0} appears after {1} in the export")]
    UnexpectedLayout(String, String),
}

/// Handles cleaning of the raw dataset frame.
pub struct Cleaner;

impl Cleaner {
    /// Keep the positional column range `INCIDENT_KEY ..= VIC_RACE`, drop the
    /// location/jurisdiction columns, and rename the murder flag.
    pub fn select_columns(df: &DataFrame) -> Result<DataFrame, CleanError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let start = names
            .iter()
            .position(|n| n == KEY_COLUMN)
            .ok_or_else(|| CleanError::MissingColumn(KEY_COLUMN.to_string()))?;
        let end = names
            .iter()
            .position(|n| n == LAST_COLUMN)
            .ok_or_else(|| CleanError::MissingColumn(LAST_COLUMN.to_string()))?;
        if start > end {
            return Err(CleanError::UnexpectedLayout(
                KEY_COLUMN.to_string(),
                LAST_COLUMN.to_string(),
            ));
        }

        let keep: Vec<&str> = names[start..=end]
            .iter()
            .map(String::as_str)
            .filter(|n| !DROPPED_COLUMNS.contains(n))
            .collect();

        let mut selected = df.select(keep)?;
        selected.rename(MURDER_FLAG_COLUMN, MURDER_COLUMN.into())?;
        Ok(selected)
    }

    /// Convert a cleaned frame into typed incident records, row by row.
    ///
    /// Unparseable dates and times become `None`; demographic values outside
    /// their vocabulary coerce to `Unmatched`. Neither aborts the run.
    pub fn to_incidents(df: &DataFrame) -> Result<Vec<Incident>, CleanError> {
        let key = df.column(KEY_COLUMN)?;
        let date = df.column(DATE_COLUMN)?;
        let time = df.column(TIME_COLUMN)?;
        let murder = df.column(MURDER_COLUMN)?;
        let perp_age = df.column("PERP_AGE_GROUP")?;
        let perp_sex = df.column("PERP_SEX")?;
        let perp_race = df.column("PERP_RACE")?;
        let vic_age = df.column("VIC_AGE_GROUP")?;
        let vic_sex = df.column("VIC_SEX")?;
        let vic_race = df.column("VIC_RACE")?;

        let mut incidents = Vec::with_capacity(df.height());
        let mut undated = 0usize;
        let mut untimed = 0usize;

        for i in 0..df.height() {
            let occur_date = Self::cell_str(date, i).and_then(|s| Self::parse_date(&s));
            let occur_time = Self::cell_str(time, i).and_then(|s| Self::parse_time(&s));
            if occur_date.is_none() {
                undated += 1;
            }
            if occur_time.is_none() {
                untimed += 1;
            }

            incidents.push(Incident {
                incident_key: Self::cell_str(key, i).unwrap_or_default(),
                occur_date,
                occur_time,
                murder: Self::cell_bool(murder, i),
                perp_age_group: AgeGroup::from_raw(Self::cell_str(perp_age, i).as_deref()),
                perp_sex: Sex::from_raw(Self::cell_str(perp_sex, i).as_deref()),
                perp_race: Race::from_raw(Self::cell_str(perp_race, i).as_deref()),
                vic_age_group: AgeGroup::from_raw(Self::cell_str(vic_age, i).as_deref()),
                vic_sex: Sex::from_raw(Self::cell_str(vic_sex, i).as_deref()),
                vic_race: Race::from_raw(Self::cell_str(vic_race, i).as_deref()),
            });
        }

        debug!(
            rows = incidents.len(),
            undated, untimed, "Converted cleaned frame to incident records"
        );
        Ok(incidents)
    }

    /// Get a cell as trimmed text, `None` for nulls.
    fn cell_str(column: &Column, idx: usize) -> Option<String> {
        let val = column.get(idx).ok()?;
        if val.is_null() {
            None
        } else {
            Some(val.to_string().trim_matches('"').to_string())
        }
    }

    /// Read the murder flag from either a boolean or a textual column.
    fn cell_bool(column: &Column, idx: usize) -> bool {
        match column.get(idx) {
            Ok(AnyValue::Boolean(b)) => b,
            Ok(val) if !val.is_null() => {
                let text = val.to_string();
                let text = text.trim_matches('"');
                text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("y")
            }
            _ => false,
        }
    }

    fn parse_date(raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), "%m/%d/%Y").ok()
    }

    fn parse_time(raw: &str) -> Option<NaiveTime> {
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AgeGroup, Race, Sex};

    fn raw_frame() -> DataFrame {
        df![
            KEY_COLUMN => [11111i64, 22222, 33333],
            DATE_COLUMN => ["01/05/2019", "01/05/2019", "not a date"],
            TIME_COLUMN => ["08:00:00", "23:00:00", "8:30"],
            "BORO" => ["QUEENS", "BRONX", "BROOKLYN"],
            "LOC_OF_OCCUR_DESC" => ["OUTSIDE", "OUTSIDE", "INSIDE"],
            "PRECINCT" => [105i64, 44, 73],
            "JURISDICTION_CODE" => [0i64, 0, 2],
            "LOC_CLASSFCTN_DESC" => ["STREET", "STREET", "HOUSING"],
            "LOCATION_DESC" => ["GROCERY/BODEGA", "PVT HOUSE", "MULTI DWELL"],
            MURDER_FLAG_COLUMN => [true, false, true],
            "PERP_AGE_GROUP" => ["18-24", "224", "UNKNOWN"],
            "PERP_SEX" => ["M", "M", "U"],
            "PERP_RACE" => ["BLACK", "WHITE HISPANIC", "UNKNOWN"],
            "VIC_AGE_GROUP" => ["25-44", "<18", "65+"],
            "VIC_SEX" => ["M", "F", "M"],
            LAST_COLUMN => ["BLACK", "BLACK", "WHITE"],
            "X_COORD_CD" => [1040000.0f64, 1005000.0, 1010000.0],
            "Latitude" => [40.7f64, 40.8, 40.6],
        ]
        .unwrap()
    }

    #[test]
    fn retains_exactly_the_fixed_column_subset() {
        let cleaned = Cleaner::select_columns(&raw_frame()).unwrap();

        let names: Vec<String> = cleaned
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                KEY_COLUMN,
                DATE_COLUMN,
                TIME_COLUMN,
                MURDER_COLUMN,
                "PERP_AGE_GROUP",
                "PERP_SEX",
                "PERP_RACE",
                "VIC_AGE_GROUP",
                "VIC_SEX",
                LAST_COLUMN,
            ]
        );
    }

    #[test]
    fn forbidden_columns_do_not_reappear() {
        let cleaned = Cleaner::select_columns(&raw_frame()).unwrap();
        let names = cleaned.get_column_names();
        for dropped in DROPPED_COLUMNS {
            assert!(!names.iter().any(|n| n.as_str() == dropped));
        }
        // Columns past the retained range go too.
        assert!(!names.iter().any(|n| n.as_str() == "X_COORD_CD"));
        assert!(!names.iter().any(|n| n.as_str() == "Latitude"));
    }

    #[test]
    fn missing_key_column_is_reported() {
        let df = df!["OCCUR_DATE" => ["01/05/2019"]].unwrap();
        match Cleaner::select_columns(&df) {
            Err(CleanError::MissingColumn(col)) => assert_eq!(col, KEY_COLUMN),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_dates_become_null_not_errors() {
        let cleaned = Cleaner::select_columns(&raw_frame()).unwrap();
        let incidents = Cleaner::to_incidents(&cleaned).unwrap();

        assert_eq!(incidents.len(), 3);
        assert!(incidents[0].occur_date.is_some());
        assert!(incidents[1].occur_date.is_some());
        assert!(incidents[2].occur_date.is_none());
    }

    #[test]
    fn times_parse_with_and_without_seconds() {
        let cleaned = Cleaner::select_columns(&raw_frame()).unwrap();
        let incidents = Cleaner::to_incidents(&cleaned).unwrap();

        use chrono::Timelike;
        assert_eq!(incidents[0].occur_time.unwrap().hour(), 8);
        assert_eq!(incidents[1].occur_time.unwrap().hour(), 23);
        assert_eq!(incidents[2].occur_time.unwrap().hour(), 8);
    }

    #[test]
    fn demographics_coerce_to_vocabulary_or_unmatched() {
        let cleaned = Cleaner::select_columns(&raw_frame()).unwrap();
        let incidents = Cleaner::to_incidents(&cleaned).unwrap();

        assert_eq!(incidents[0].perp_age_group, AgeGroup::From18To24);
        // "224" is a known data-entry artifact: out of vocabulary, kept silently.
        assert_eq!(incidents[1].perp_age_group, AgeGroup::Unmatched);
        assert_eq!(incidents[2].perp_sex, Sex::Undetermined);
        assert_eq!(incidents[1].perp_race, Race::WhiteHispanic);

        for inc in &incidents {
            // Every coerced value is a vocabulary member or the unmatched variant.
            assert!(inc.vic_age_group.label().is_some() || inc.vic_age_group == AgeGroup::Unmatched);
        }
    }

    #[test]
    fn murder_flag_is_renamed_and_read() {
        let cleaned = Cleaner::select_columns(&raw_frame()).unwrap();
        let incidents = Cleaner::to_incidents(&cleaned).unwrap();

        assert!(incidents[0].murder);
        assert!(!incidents[1].murder);
        assert!(incidents[2].murder);
    }

    #[test]
    fn textual_murder_flags_are_accepted() {
        let df = df![
            KEY_COLUMN => [1i64, 2, 3],
            DATE_COLUMN => ["01/05/2019", "01/05/2019", "01/05/2019"],
            TIME_COLUMN => ["08:00:00", "09:00:00", "10:00:00"],
            MURDER_FLAG_COLUMN => ["TRUE", "false", "Y"],
            "PERP_AGE_GROUP" => ["18-24", "18-24", "18-24"],
            "PERP_SEX" => ["M", "M", "M"],
            "PERP_RACE" => ["BLACK", "BLACK", "BLACK"],
            "VIC_AGE_GROUP" => ["25-44", "25-44", "25-44"],
            "VIC_SEX" => ["M", "M", "M"],
            LAST_COLUMN => ["BLACK", "BLACK", "BLACK"],
        ]
        .unwrap();

        let cleaned = Cleaner::select_columns(&df).unwrap();
        let incidents = Cleaner::to_incidents(&cleaned).unwrap();
        assert!(incidents[0].murder);
        assert!(!incidents[1].murder);
        assert!(incidents[2].murder);
    }
}
