use std::collections::HashMap;

/// Recognised query parameters, all optional
///
/// Built from a plain string map rather than deserialized directly, so that
/// unknown or repeated keys never reject a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OddsQuery {
    pub books: Option<String>,
    pub book: Option<String>,
    pub regions: Option<String>,
    pub markets: Option<String>,
    pub odds_format: Option<String>,
    pub team: Option<String>,
    pub window_hours: Option<String>,
}

impl OddsQuery {
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).cloned();

        Self {
            books: get("books"),
            book: get("book"),
            regions: get("regions"),
            markets: get("markets"),
            odds_format: get("oddsFormat"),
            team: get("team"),
            window_hours: get("windowHours"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_map_uses_wire_names() {
        let map: HashMap<String, String> = [
            ("oddsFormat", "decimal"),
            ("windowHours", "36"),
            ("team", "eagles"),
            ("unrelated", "ignored"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let query = OddsQuery::from_map(&map);

        assert_eq!(query.odds_format.as_deref(), Some("decimal"));
        assert_eq!(query.window_hours.as_deref(), Some("36"));
        assert_eq!(query.team.as_deref(), Some("eagles"));
        assert!(query.books.is_none());
    }
}
