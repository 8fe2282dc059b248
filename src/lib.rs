//! Odds Proxy - read-only proxy in front of a sports-odds data provider
//!
//! This library normalizes client query parameters into an upstream odds
//! request, forwards it once, and narrows the returned games by team name and
//! kickoff window before handing them back with caching hints.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{build_upstream_params, filter_games, normalize_bookmakers, RequestDefaults, UpstreamParams};
pub use models::{Game, GameList, OddsQuery};
pub use routes::odds::{AppState, FailurePolicy, OddsRoutes, ProxyOutcome, RouteConfig, SportSource};
pub use services::{OddsApiClient, OddsApiError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let books = normalize_bookmakers(None, Some("FanDuel"), "draftkings");
        assert_eq!(books, "fanduel");
    }
}
