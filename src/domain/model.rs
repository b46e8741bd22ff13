use crate::domain::numeric::normalize_field;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One graded assessment inside a unit.
///
/// Both fields are normalized on ingestion: `None` means the field was
/// missing, `null` or an empty string. A present but unparsable value is
/// kept as `Some(NaN)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ContentItem {
    #[serde(default, deserialize_with = "loose_number")]
    pub weighting: Option<f64>,
    #[serde(default, deserialize_with = "loose_number")]
    pub achieved: Option<f64>,
}

impl ContentItem {
    pub fn new(weighting: Option<f64>, achieved: Option<f64>) -> Self {
        Self {
            weighting,
            achieved,
        }
    }

    /// Builds an item from the raw text a grade form stores.
    pub fn from_raw(weighting: Option<&str>, achieved: Option<&str>) -> Self {
        let normalize = |raw: Option<&str>| {
            raw.and_then(|s| normalize_field(&Value::String(s.to_string())))
        };
        Self {
            weighting: normalize(weighting),
            achieved: normalize(achieved),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Unit {
    #[serde(default, deserialize_with = "lenient_title")]
    pub title: String,
    #[serde(default, deserialize_with = "ordered_content")]
    pub content: Vec<ContentItem>,
}

impl Unit {
    pub fn new(title: impl Into<String>, content: Vec<ContentItem>) -> Self {
        Self {
            title: title.into(),
            content,
        }
    }
}

/// Units keyed by an opaque identifier, in document order.
///
/// The key is only ever used to build a hash link, so nothing assumes
/// numeric or contiguous keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitCollection {
    entries: Vec<(String, Unit)>,
}

impl UnitCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, unit: Unit) {
        self.entries.push((key.into(), unit));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<(&str, &Unit)> {
        self.entries.first().map(|(key, unit)| (key.as_str(), unit))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Unit)> {
        self.entries.iter().map(|(key, unit)| (key.as_str(), unit))
    }

    /// Parses a collection out of an already-decoded JSON value.
    ///
    /// A `null` in the first slot is kept as an empty unit so the ranking
    /// still reports "no data" for it. Later `null` slots are skipped.
    pub fn from_value(value: Value) -> std::result::Result<Self, String> {
        let mut collection = Self::new();
        for (position, (key, raw)) in keyed_entries(value)?.into_iter().enumerate() {
            if raw.is_null() {
                if position == 0 {
                    collection.push(key, Unit::default());
                }
                continue;
            }
            let unit: Unit = serde_json::from_value(raw)
                .map_err(|e| format!("unit '{}': {}", key, e))?;
            collection.push(key, unit);
        }
        Ok(collection)
    }
}

impl<K: Into<String>> FromIterator<(K, Unit)> for UnitCollection {
    fn from_iter<I: IntoIterator<Item = (K, Unit)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, u)| (k.into(), u)).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for UnitCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}

/// Where a ranking link points: the current page's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationContext {
    pub current_search_query: String,
}

impl NavigationContext {
    pub fn new(current_search_query: impl Into<String>) -> Self {
        Self {
            current_search_query: current_search_query.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub title: String,
    pub total: f64,
    pub link: String,
}

/// Result of ranking a unit collection.
///
/// `Empty` is the "no data" signal for an empty collection or a first unit
/// without content. It is distinct from a ranked list whose lowest total is 0.
#[derive(Debug, Clone, PartialEq)]
pub enum Ranking {
    Empty,
    Ranked(Vec<RankingEntry>),
}

impl Ranking {
    pub fn is_empty(&self) -> bool {
        matches!(self, Ranking::Empty)
    }

    pub fn entries(&self) -> &[RankingEntry] {
        match self {
            Ranking::Empty => &[],
            Ranking::Ranked(entries) => entries.as_slice(),
        }
    }

    /// The leaderboard slice: at most `n` entries from the top.
    pub fn top(&self, n: usize) -> &[RankingEntry] {
        let entries = self.entries();
        &entries[..n.min(entries.len())]
    }
}

// Serialized as `0` for the empty sentinel so report consumers keep seeing
// the numeric "no data" marker.
impl Serialize for Ranking {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Ranking::Empty => serializer.serialize_u8(0),
            Ranking::Ranked(entries) => entries.serialize(serializer),
        }
    }
}

/// Everything the load step writes, rendered during transform.
#[derive(Debug, Clone)]
pub struct RankingReport {
    pub ranking: Ranking,
    pub top: Vec<RankingEntry>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub csv_output: String,
    pub tsv_output: String,
    pub json_output: String,
}

/// How the aggregator treats a present field that did not parse as a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NanPolicy {
    /// Unparsable or non-finite values count as absent; totals stay finite.
    #[default]
    Hardened,
    /// A NaN weighting with a positive mark propagates into the total.
    Literal,
}

impl std::str::FromStr for NanPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hardened" => Ok(NanPolicy::Hardened),
            "literal" => Ok(NanPolicy::Literal),
            other => Err(format!(
                "unknown NaN policy '{}', expected 'hardened' or 'literal'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Csv, OutputFormat::Tsv, OutputFormat::Json];

    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "leaderboard.csv",
            OutputFormat::Tsv => "leaderboard.tsv",
            OutputFormat::Json => "leaderboard.json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unsupported output format '{}'", other)),
        }
    }
}

/// A stored profile: years, each holding its own unit collection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Year {
    #[serde(default, deserialize_with = "lenient_title")]
    pub title: String,
    #[serde(default)]
    pub units: UnitCollection,
}

/// The two shapes a units file can take: a bare unit collection, or a
/// profile whose `years` map holds one collection per academic year.
#[derive(Debug, Clone)]
pub enum UnitsDocument {
    Collection(UnitCollection),
    Profile(Vec<(String, Year)>),
}

impl UnitsDocument {
    pub fn from_value(value: Value) -> std::result::Result<Self, String> {
        match value {
            Value::Object(mut map) if map.contains_key("years") => {
                let years = map.remove("years").unwrap_or(Value::Null);
                let mut parsed = Vec::new();
                for (key, raw) in keyed_entries(years)?
                    .into_iter()
                    .filter(|(_, raw)| !raw.is_null())
                {
                    let year: Year = serde_json::from_value(raw)
                        .map_err(|e| format!("year '{}': {}", key, e))?;
                    parsed.push((key, year));
                }
                Ok(UnitsDocument::Profile(parsed))
            }
            other => UnitCollection::from_value(other).map(UnitsDocument::Collection),
        }
    }

    /// Picks the collection to rank. A profile uses the requested year, or
    /// its first year when none is requested.
    pub fn into_units(self, year: Option<&str>) -> std::result::Result<UnitCollection, String> {
        match self {
            UnitsDocument::Collection(units) => Ok(units),
            UnitsDocument::Profile(years) => {
                let selected = match year {
                    Some(wanted) => years.into_iter().find(|(key, _)| key == wanted),
                    None => years.into_iter().next(),
                };
                match (selected, year) {
                    (Some((_, found)), _) => Ok(found.units),
                    (None, Some(wanted)) => Err(format!("year '{}' not found", wanted)),
                    (None, None) => Ok(UnitCollection::new()),
                }
            }
        }
    }
}

/// Flattens an object or array into `(key, value)` pairs in document order.
///
/// Arrays use their index as the key, so sparse numeric-keyed records from
/// the store keep their original keys. `null` entries are returned as-is;
/// each caller decides what an empty slot means.
pub fn keyed_entries(value: Value) -> std::result::Result<Vec<(String, Value)>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect()),
        other => Err(format!(
            "expected an object or array of entries, found {}",
            json_kind(&other)
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn loose_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_field(&value))
}

fn lenient_title<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn ordered_content<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<ContentItem>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    // anything that is not a list of items means "no items"; an item that is
    // not an object has no fields and contributes nothing
    let items = keyed_entries(value).unwrap_or_default();
    Ok(items
        .into_iter()
        .filter(|(_, item)| !item.is_null())
        .map(|(_, item)| match item {
            Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
            _ => ContentItem::default(),
        })
        .collect())
}
