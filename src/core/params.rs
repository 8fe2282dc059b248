use crate::core::bookmakers::normalize_bookmakers;
use crate::models::OddsQuery;

/// Per-route fallbacks used when the client leaves a parameter out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDefaults {
    pub regions: String,
    pub markets: String,
    pub odds_format: String,
    pub bookmakers: String,
}

/// Query parameters for one upstream odds call
///
/// The API key is not stored here. The client attaches it when the request is
/// sent, so these params can be logged or compared freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamParams {
    pub sport: String,
    pub regions: String,
    pub markets: String,
    pub odds_format: String,
    pub bookmakers: String,
}

impl UpstreamParams {
    /// Query pairs in the order the provider documents them
    pub fn query_pairs<'a>(&'a self, api_key: &'a str) -> [(&'static str, &'a str); 5] {
        [
            ("apiKey", api_key),
            ("regions", self.regions.as_str()),
            ("markets", self.markets.as_str()),
            ("oddsFormat", self.odds_format.as_str()),
            ("bookmakers", self.bookmakers.as_str()),
        ]
    }
}

/// Build upstream params from a sport and the raw client query
///
/// Never fails. Missing or blank values take the route defaults; anything else
/// is passed through as-is, leaving the provider to reject unknown sports or
/// markets.
pub fn build_upstream_params(
    sport: &str,
    query: &OddsQuery,
    defaults: &RequestDefaults,
) -> UpstreamParams {
    UpstreamParams {
        sport: sport.trim().to_string(),
        regions: or_default(query.regions.as_deref(), &defaults.regions),
        markets: or_default(query.markets.as_deref(), &defaults.markets),
        odds_format: or_default(query.odds_format.as_deref(), &defaults.odds_format),
        bookmakers: normalize_bookmakers(
            query.books.as_deref(),
            query.book.as_deref(),
            &defaults.bookmakers,
        ),
    }
}

fn or_default(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> RequestDefaults {
        RequestDefaults {
            regions: "us".to_string(),
            markets: "h2h,spreads,totals".to_string(),
            odds_format: "american".to_string(),
            bookmakers: "draftkings,fanduel".to_string(),
        }
    }

    #[test]
    fn test_empty_query_uses_defaults() {
        let params = build_upstream_params("americanfootball_nfl", &OddsQuery::default(), &defaults());

        assert_eq!(params.sport, "americanfootball_nfl");
        assert_eq!(params.regions, "us");
        assert_eq!(params.markets, "h2h,spreads,totals");
        assert_eq!(params.odds_format, "american");
        assert_eq!(params.bookmakers, "draftkings,fanduel");
    }

    #[test]
    fn test_query_values_override_defaults() {
        let query = OddsQuery {
            regions: Some("uk".to_string()),
            markets: Some("h2h".to_string()),
            odds_format: Some("decimal".to_string()),
            book: Some("Bet365".to_string()),
            ..Default::default()
        };

        let params = build_upstream_params("soccer_epl", &query, &defaults());

        assert_eq!(params.regions, "uk");
        assert_eq!(params.markets, "h2h");
        assert_eq!(params.odds_format, "decimal");
        assert_eq!(params.bookmakers, "bet365");
    }

    #[test]
    fn test_blank_values_are_treated_as_absent() {
        let query = OddsQuery {
            regions: Some("  ".to_string()),
            markets: Some(String::new()),
            ..Default::default()
        };

        let params = build_upstream_params("basketball_nba", &query, &defaults());

        assert_eq!(params.regions, "us");
        assert_eq!(params.markets, "h2h,spreads,totals");
    }

    #[test]
    fn test_unknown_values_pass_through() {
        let query = OddsQuery {
            markets: Some("not_a_market".to_string()),
            ..Default::default()
        };

        let params = build_upstream_params("curling_world", &query, &defaults());

        assert_eq!(params.sport, "curling_world");
        assert_eq!(params.markets, "not_a_market");
    }

    #[test]
    fn test_query_pairs_carry_key_first() {
        let params = build_upstream_params("americanfootball_nfl", &OddsQuery::default(), &defaults());
        let pairs = params.query_pairs("secret");

        assert_eq!(pairs[0], ("apiKey", "secret"));
        assert_eq!(pairs[4], ("bookmakers", "draftkings,fanduel"));
    }
}
