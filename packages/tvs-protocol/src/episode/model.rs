//! Payload schemas of the episode tracking service.

use serde::de::Error as _;
use serde::Deserializer;
use serde_json::{Map, Value};

use crate::{ordered::OrderedMap, params::SeriesId, Deserialize, Serialize};

/// Key of a season inside a series (`"1"`, `"2"`, ...).
pub type SeasonKey = String;

/// `getgroups` payload, keyed by group id.
pub type Groups = OrderedMap<String, Group>;

/// `getdata` / `getalldata` payload, keyed by series id.
pub type SeriesData = OrderedMap<String, Series>;

/// Episodes of one season, keyed by episode number.
pub type Season = OrderedMap<String, EpisodeStatus>;

/// Per-language watch state of one episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Lenient", into = "u8")]
pub enum WatchStatus {
    NotSeen,
    Seen,
    /// No data for this language. Transparent when aggregating a season.
    Unknown,
}

impl WatchStatus {
    pub fn code(self) -> u8 {
        match self {
            WatchStatus::NotSeen => 0,
            WatchStatus::Seen => 1,
            WatchStatus::Unknown => 2,
        }
    }
}

impl TryFrom<u64> for WatchStatus {
    type Error = String;

    fn try_from(code: u64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(WatchStatus::NotSeen),
            1 => Ok(WatchStatus::Seen),
            2 => Ok(WatchStatus::Unknown),
            other => Err(format!("unknown watch status code {}", other)),
        }
    }
}

impl TryFrom<Lenient> for WatchStatus {
    type Error = String;

    fn try_from(raw: Lenient) -> Result<Self, Self::Error> {
        WatchStatus::try_from(raw.into_u64()?)
    }
}

impl From<WatchStatus> for u8 {
    fn from(status: WatchStatus) -> Self {
        status.code()
    }
}

/// Language code to status table of a single episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeStatus(pub OrderedMap<String, WatchStatus>);

impl EpisodeStatus {
    /// Status for `language`, `None` when the episode has no entry for it.
    pub fn status(&self, language: &str) -> Option<WatchStatus> {
        self.0.get(language).copied()
    }
}

/// A user-defined group of tracked series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(deserialize_with = "deserialize_ids")]
    pub categs: Vec<SeriesId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tracking data of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Last coordinate marked seen, `"<season>x<episode>"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastseen: Option<String>,
    /// Final known episode number per season.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epnums: Option<OrderedMap<SeasonKey, EpisodeNumber>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episodes: Option<OrderedMap<SeasonKey, Season>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Series {
    /// `"<season>x<final episode>"` of the last `epnums` entry.
    pub fn last_known_coordinate(&self) -> Option<String> {
        self.epnums
            .as_ref()?
            .last()
            .map(|(season, last)| format!("{}x{}", season, last))
    }
}

/// Episode number exactly as the payload wrote it.
///
/// `"010"` and `10` are different values here: `lastseen` is compared
/// against this text, not against the parsed number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct EpisodeNumber(Value);

impl EpisodeNumber {
    pub fn as_u64(&self) -> Option<u64> {
        match &self.0 {
            Value::String(s) => s.trim().parse().ok(),
            other => other.as_u64(),
        }
    }
}

impl std::fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

impl TryFrom<Value> for EpisodeNumber {
    type Error = String;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        match raw {
            Value::Number(_) | Value::String(_) => Ok(EpisodeNumber(raw)),
            other => Err(format!("expected an episode number, got {}", other)),
        }
    }
}

impl From<EpisodeNumber> for Value {
    fn from(number: EpisodeNumber) -> Self {
        number.0
    }
}

/// Numbers arrive either as JSON numbers or numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(u64),
    Text(String),
}

impl Lenient {
    fn into_u64(self) -> Result<u64, String> {
        match self {
            Lenient::Number(n) => Ok(n),
            Lenient::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| format!("expected a number, got {:?}", s)),
        }
    }
}

fn deserialize_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<SeriesId>, D::Error> {
    Vec::<Lenient>::deserialize(deserializer)?
        .into_iter()
        .map(|raw| raw.into_u64().map_err(D::Error::custom))
        .collect()
}
