use std::collections::BTreeMap;

use serde::Serialize;

use super::{Category, PlayerId};

/// Normalized field key (`batting_innings`) to the value shown on the page.
pub type FieldMap = BTreeMap<String, String>;

/// A sub-grouping of a category's stats page.
///
/// Parsing is exact and case-sensitive against the header text.
#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
pub enum Section {
    Batting,
    Fielding,
    Bowling,
    #[strum(serialize = "Wicket Keeping")]
    WicketKeeping,
    Captaincy,
}

impl Section {
    /// Prefix used in field keys, e.g. `wicket_keeping`.
    pub fn key_prefix(self) -> String {
        normalize_key(&self.to_string())
    }
}

/// Lower-case and replace spaces with underscores.
pub(crate) fn normalize_key(label: &str) -> String {
    label.trim().replace(' ', "_").to_lowercase()
}

/// Field labels kept from a stats page; everything else is dropped.
pub const STAT_FIELDS: &[&str] = &[
    "Innings",
    "Not Outs",
    "Aggregate",
    "Highest Score",
    "50s",
    "100s",
    "Ducks",
    "4s",
    "6s",
    "Scoring Rate",
    "Overs",
    "Runs Conceded",
    "Wickets",
    "Average",
    "4 Wickets in Innings",
    "5 Wickets in Innings",
    "Best",
    "Economy Rate",
    "Strike Rate",
    "Catches",
    "Most Catches in Innings",
    "Stumpings",
    "Most Dismissals in Innings",
    "Won/Lost",
    "Matches/Won/Lost",
    "Tosses Won",
    "Runs Scored",
    "Batting Average",
];

/// One player's statistics for one category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStatsRecord {
    pub id: PlayerId,
    pub series: Category,
    #[serde(flatten)]
    pub fields: FieldMap,
}
