use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;

use super::SeriesCounts;

/// Opaque howstat player identifier, taken from the `PlayerID=` query parameter.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PlayerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A currently active player as listed on the roster page.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct RosterEntry {
    pub id: PlayerId,
    /// Lower-cased, trimmed display name.
    pub name: String,
}

/// The roster as persisted once per run, keyed by the year it was taken.
#[derive(Debug, Clone, Serialize)]
pub struct RosterSnapshot {
    pub id: i32,
    pub players: Vec<RosterEntry>,
    pub player_id: Vec<PlayerId>,
}

impl RosterSnapshot {
    pub fn new(year: i32, players: &[RosterEntry]) -> Self {
        Self {
            id: year,
            players: players.to_vec(),
            player_id: players.iter().map(|p| p.id.clone()).collect(),
        }
    }
}

/// Sentinel stored for bio fields whose value cell is blank.
pub const BLANK_FIELD: &str = "null";

/// Player profile from the overview page.
#[derive(Debug, Clone, Serialize)]
pub struct BioRecord {
    pub id: PlayerId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Labelled profile fields (`born`, `batting_style`, ...).
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    #[serde(flatten)]
    pub matches: SeriesCounts,
    /// Extraction time, `DD/MM/YYYY HH:MM:SS` local time.
    pub datetime: String,
}
