use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One upstream game record
///
/// The payload is kept as raw JSON and serialized back untouched. Only the
/// three fields the filters look at have typed accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Game(Value);

/// Games in upstream order
pub type GameList = Vec<Game>;

impl Game {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Home team name, or an empty string when missing or not a string
    pub fn home_team(&self) -> &str {
        self.str_field("home_team")
    }

    /// Away team name, or an empty string when missing or not a string
    pub fn away_team(&self) -> &str {
        self.str_field("away_team")
    }

    /// Kickoff instant parsed from `commence_time`
    ///
    /// Accepts RFC 3339, and ISO-8601 date-times without an offset read as UTC.
    pub fn commence_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.get("commence_time")?.as_str()?.trim();

        if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
            return Some(t.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
            .ok()
            .map(|t| t.and_utc())
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    fn str_field(&self, key: &str) -> &str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }
}

/// Turn an arbitrary upstream payload into a game list
///
/// Anything that is not a JSON array (an error object, a string, null)
/// becomes an empty list.
pub fn games_from_payload(payload: Value) -> GameList {
    match payload {
        Value::Array(items) => items.into_iter().map(Game).collect(),
        _ => Vec::new(),
    }
}
