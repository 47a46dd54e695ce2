//! Incident Record Model
//! Typed incident rows and the fixed demographic vocabularies they use.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Age bracket of a perpetrator or victim.
///
/// Ordered low-to-high, with the dataset's own `UNKNOWN` level last.
/// `Unmatched` is the catch-all for values outside the vocabulary
/// (including nulls); it never round-trips back to a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AgeGroup {
    Under18,
    From18To24,
    From25To44,
    From45To64,
    Over65,
    Unknown,
    Unmatched,
}

impl AgeGroup {
    /// Total mapping from raw text. Anything outside the six levels,
    /// null included, lands on `Unmatched`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("<18") => AgeGroup::Under18,
            Some("18-24") => AgeGroup::From18To24,
            Some("25-44") => AgeGroup::From25To44,
            Some("45-64") => AgeGroup::From45To64,
            Some("65+") => AgeGroup::Over65,
            Some("UNKNOWN") => AgeGroup::Unknown,
            _ => AgeGroup::Unmatched,
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            AgeGroup::Under18 => Some("<18"),
            AgeGroup::From18To24 => Some("18-24"),
            AgeGroup::From25To44 => Some("25-44"),
            AgeGroup::From45To64 => Some("45-64"),
            AgeGroup::Over65 => Some("65+"),
            AgeGroup::Unknown => Some("UNKNOWN"),
            AgeGroup::Unmatched => None,
        }
    }
}

/// Recorded sex of a perpetrator or victim. Unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sex {
    Male,
    Female,
    Undetermined,
    Unmatched,
}

impl Sex {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("M") => Sex::Male,
            Some("F") => Sex::Female,
            Some("U") => Sex::Undetermined,
            _ => Sex::Unmatched,
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            Sex::Male => Some("M"),
            Sex::Female => Some("F"),
            Sex::Undetermined => Some("U"),
            Sex::Unmatched => None,
        }
    }
}

/// Recorded race of a perpetrator or victim, using the dataset's fixed
/// seven-level list. Unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Race {
    AmericanIndianAlaskanNative,
    AsianPacificIslander,
    Black,
    BlackHispanic,
    White,
    WhiteHispanic,
    Unknown,
    Unmatched,
}

impl Race {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("AMERICAN INDIAN/ALASKAN NATIVE") => Race::AmericanIndianAlaskanNative,
            Some("ASIAN / PACIFIC ISLANDER") => Race::AsianPacificIslander,
            Some("BLACK") => Race::Black,
            Some("BLACK HISPANIC") => Race::BlackHispanic,
            Some("WHITE") => Race::White,
            Some("WHITE HISPANIC") => Race::WhiteHispanic,
            Some("UNKNOWN") => Race::Unknown,
            _ => Race::Unmatched,
        }
    }

    pub fn label(&self) -> Option<&'static str> {
        match self {
            Race::AmericanIndianAlaskanNative => Some("AMERICAN INDIAN/ALASKAN NATIVE"),
            Race::AsianPacificIslander => Some("ASIAN / PACIFIC ISLANDER"),
            Race::Black => Some("BLACK"),
            Race::BlackHispanic => Some("BLACK HISPANIC"),
            Race::White => Some("WHITE"),
            Race::WhiteHispanic => Some("WHITE HISPANIC"),
            Race::Unknown => Some("UNKNOWN"),
            Race::Unmatched => None,
        }
    }
}

/// One reported shooting incident after cleaning.
///
/// Dates and times that failed to parse are `None` rather than dropped, so
/// downstream aggregations decide per-view which rows they can key on.
#[derive(Debug, Clone)]
pub struct Incident {
    pub incident_key: String,
    pub occur_date: Option<NaiveDate>,
    pub occur_time: Option<NaiveTime>,
    /// True if the incident was classified as a murder.
    pub murder: bool,
    pub perp_age_group: AgeGroup,
    pub perp_sex: Sex,
    pub perp_race: Race,
    pub vic_age_group: AgeGroup,
    pub vic_sex: Sex,
    pub vic_race: Race,
}
