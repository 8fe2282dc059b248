use actix_web::http::header::{self, CacheControl, CacheDirective};
use actix_web::{web, HttpResponse, Responder};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Instrument;

use crate::config::{CacheSettings, DefaultsSettings};
use crate::core::{build_upstream_params, filter_games, RequestDefaults};
use crate::models::{games_from_payload, ErrorResponse, GameList, HealthResponse, OddsQuery};
use crate::services::{OddsApiClient, OddsApiError};

/// Response header carrying the provider's remaining quota
pub const REQUESTS_REMAINING_RESPONSE_HEADER: &str = "X-OddsAPI-Requests-Remaining";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const INDEX_TEXT: &str = "NFL Odds Proxy API is running. Endpoints: /nfl-odds, /nfl-props, \
/odds/{sport}, /props/{sport}, /nfl/team/{teamName}, /health";

/// Where a route takes its provider sport key from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SportSource {
    Fixed(String),
    Path,
}

/// What a route does when the upstream call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// 500 with `{error: message}`
    HardError { message: &'static str },
    /// 200 with `[]` and a short cache lifetime
    SoftEmpty,
}

impl FailurePolicy {
    pub fn on_error(self, err: OddsApiError) -> ProxyOutcome {
        match self {
            FailurePolicy::HardError { message } => ProxyOutcome::HardFailure { message, error: err },
            FailurePolicy::SoftEmpty => ProxyOutcome::SoftFailure,
        }
    }
}

/// One exposed proxy route
#[derive(Debug, Clone)]
pub struct RouteConfig {
    pub name: &'static str,
    pub sport: SportSource,
    pub defaults: RequestDefaults,
    pub policy: FailurePolicy,
}

impl RouteConfig {
    /// Resolve the sport key for a request
    pub fn sport<'a>(&'a self, path_sport: Option<&'a str>) -> &'a str {
        match (&self.sport, path_sport) {
            (SportSource::Fixed(sport), _) => sport,
            (SportSource::Path, Some(sport)) => sport,
            (SportSource::Path, None) => "",
        }
    }
}

/// All proxy routes, built once from settings
#[derive(Debug, Clone)]
pub struct OddsRoutes {
    pub nfl_odds: RouteConfig,
    pub nfl_props: RouteConfig,
    pub nfl_team: RouteConfig,
    pub sport_odds: RouteConfig,
    pub sport_props: RouteConfig,
}

impl OddsRoutes {
    pub fn from_settings(defaults: &DefaultsSettings) -> Self {
        let nfl = SportSource::Fixed(defaults.sport.clone());

        Self {
            nfl_odds: RouteConfig {
                name: "nfl-odds",
                sport: nfl.clone(),
                defaults: defaults.core(),
                policy: FailurePolicy::HardError {
                    message: "Failed to fetch NFL odds.",
                },
            },
            nfl_props: RouteConfig {
                name: "nfl-props",
                sport: nfl.clone(),
                defaults: defaults.props(),
                policy: FailurePolicy::SoftEmpty,
            },
            nfl_team: RouteConfig {
                name: "nfl-team",
                sport: nfl,
                defaults: defaults.core(),
                policy: FailurePolicy::HardError {
                    message: "Failed to fetch NFL odds.",
                },
            },
            sport_odds: RouteConfig {
                name: "odds",
                sport: SportSource::Path,
                defaults: defaults.core(),
                policy: FailurePolicy::HardError {
                    message: "Failed to fetch odds.",
                },
            },
            sport_props: RouteConfig {
                name: "props",
                sport: SportSource::Path,
                defaults: defaults.props(),
                policy: FailurePolicy::SoftEmpty,
            },
        }
    }
}

/// Result of one proxied request
#[derive(Debug)]
pub enum ProxyOutcome {
    Success {
        games: GameList,
        requests_remaining: Option<String>,
    },
    SoftFailure,
    HardFailure {
        message: &'static str,
        error: OddsApiError,
    },
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<OddsApiClient>,
    pub routes: Arc<OddsRoutes>,
    pub cache: CacheSettings,
    pub expose_error_details: bool,
}

/// Configure all proxy routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .route("/nfl-odds", web::get().to(nfl_odds))
        .route("/nfl-props", web::get().to(nfl_props))
        .route("/nfl/team/{team_name}", web::get().to(nfl_team))
        .route("/odds/{sport}", web::get().to(sport_odds))
        .route("/props/{sport}", web::get().to(sport_props));
}

/// Normalize, call upstream once, then filter
///
/// Upstream errors are logged here and mapped through the route's policy.
pub async fn run_pipeline(
    client: &OddsApiClient,
    route: &RouteConfig,
    sport: &str,
    query: &OddsQuery,
) -> ProxyOutcome {
    let params = build_upstream_params(sport, query, &route.defaults);

    match client.fetch_odds(&params).await {
        Ok(response) => {
            let games = games_from_payload(response.payload);
            let total = games.len();
            let games = filter_games(games, query.team.as_deref(), query.window_hours.as_deref());

            tracing::debug!("Returning {} of {} games", games.len(), total);

            ProxyOutcome::Success {
                games,
                requests_remaining: response.requests_remaining,
            }
        }
        Err(e) => {
            match route.policy {
                FailurePolicy::HardError { .. } => {
                    tracing::error!("Error fetching {}: {}", route.name, e)
                }
                FailurePolicy::SoftEmpty => {
                    tracing::warn!("Error fetching {}, serving empty list: {}", route.name, e)
                }
            }
            route.policy.on_error(e)
        }
    }
}

/// Turn an outcome into the HTTP response
pub fn respond(
    outcome: ProxyOutcome,
    cache: &CacheSettings,
    expose_error_details: bool,
) -> HttpResponse {
    match outcome {
        ProxyOutcome::Success {
            games,
            requests_remaining,
        } => {
            let mut builder = HttpResponse::Ok();
            builder.insert_header(cache_control(cache.success_max_age_secs));
            if let Some(remaining) = requests_remaining {
                builder.insert_header((REQUESTS_REMAINING_RESPONSE_HEADER, remaining));
            }
            builder.json(games)
        }
        ProxyOutcome::SoftFailure => HttpResponse::Ok()
            .insert_header(cache_control(cache.fallback_max_age_secs))
            .json(GameList::new()),
        ProxyOutcome::HardFailure { message, error } => HttpResponse::InternalServerError()
            .insert_header(CacheControl(vec![CacheDirective::NoStore]))
            .json(ErrorResponse {
                error: message.to_string(),
                details: expose_error_details.then(|| error.details()),
            }),
    }
}

fn cache_control(max_age: u32) -> CacheControl {
    CacheControl(vec![CacheDirective::Public, CacheDirective::MaxAge(max_age)])
}

async fn proxy(
    state: &AppState,
    route: &RouteConfig,
    path_sport: Option<&str>,
    query: OddsQuery,
) -> HttpResponse {
    let request_id = uuid::Uuid::new_v4();
    let sport = route.sport(path_sport);
    let span = tracing::info_span!(
        "proxy",
        request_id = %request_id,
        route = route.name,
        sport = %sport
    );

    async {
        let outcome = run_pipeline(&state.client, route, sport, &query).await;
        let mut response = respond(outcome, &state.cache, state.expose_error_details);

        if let Ok(value) = header::HeaderValue::from_str(&request_id.to_string()) {
            response
                .headers_mut()
                .insert(header::HeaderName::from_static(REQUEST_ID_HEADER), value);
        }
        response
    }
    .instrument(span)
    .await
}

/// Liveness text
async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(INDEX_TEXT)
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let upstream_configured = state.client.has_api_key();
    let status = if upstream_configured { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        upstream_configured,
    })
}

/// GET /nfl-odds
async fn nfl_odds(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let route = &state.routes.nfl_odds;
    proxy(&state, route, None, OddsQuery::from_map(&query)).await
}

/// GET /nfl-props
async fn nfl_props(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let route = &state.routes.nfl_props;
    proxy(&state, route, None, OddsQuery::from_map(&query)).await
}

/// GET /nfl/team/{team_name}
///
/// The path team replaces any `team` query parameter.
async fn nfl_team(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let mut odds_query = OddsQuery::from_map(&query);
    odds_query.team = Some(path.into_inner());

    let route = &state.routes.nfl_team;
    proxy(&state, route, None, odds_query).await
}

/// GET /odds/{sport}
async fn sport_odds(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let route = &state.routes.sport_odds;
    proxy(&state, route, Some(path.as_str()), OddsQuery::from_map(&query)).await
}

/// GET /props/{sport}
async fn sport_props(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let route = &state.routes.sport_props;
    proxy(&state, route, Some(path.as_str()), OddsQuery::from_map(&query)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    fn routes() -> OddsRoutes {
        OddsRoutes::from_settings(&DefaultsSettings::default())
    }

    #[test]
    fn test_route_policies() {
        let routes = routes();

        assert_eq!(
            routes.nfl_odds.policy,
            FailurePolicy::HardError { message: "Failed to fetch NFL odds." }
        );
        assert_eq!(
            routes.nfl_team.policy,
            FailurePolicy::HardError { message: "Failed to fetch NFL odds." }
        );
        assert_eq!(
            routes.sport_odds.policy,
            FailurePolicy::HardError { message: "Failed to fetch odds." }
        );
        assert_eq!(routes.nfl_props.policy, FailurePolicy::SoftEmpty);
        assert_eq!(routes.sport_props.policy, FailurePolicy::SoftEmpty);
        assert_eq!(routes.nfl_props.defaults.markets.split(',').count(), 6);
    }

    #[test]
    fn test_sport_resolution() {
        let routes = routes();

        assert_eq!(routes.nfl_odds.sport(Some("basketball_nba")), "americanfootball_nfl");
        assert_eq!(routes.sport_odds.sport(Some("basketball_nba")), "basketball_nba");
    }

    #[test]
    fn test_policy_mapping() {
        assert!(matches!(
            FailurePolicy::SoftEmpty.on_error(OddsApiError::Timeout),
            ProxyOutcome::SoftFailure
        ));
        assert!(matches!(
            FailurePolicy::HardError { message: "boom" }.on_error(OddsApiError::Timeout),
            ProxyOutcome::HardFailure {
                message: "boom",
                error: OddsApiError::Timeout
            }
        ));
    }

    #[actix_web::test]
    async fn test_hard_failure_response() {
        let routes = routes();
        let resp = respond(
            routes.nfl_odds.policy.on_error(OddsApiError::Timeout),
            &CacheSettings::default(),
            false,
        );

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Failed to fetch NFL odds."}"#);
    }

    #[actix_web::test]
    async fn test_hard_failure_with_details() {
        let routes = routes();
        let resp = respond(
            routes.sport_odds.policy.on_error(OddsApiError::Timeout),
            &CacheSettings::default(),
            true,
        );

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Failed to fetch odds.");
        assert_eq!(json["details"], "Upstream request timed out");
    }

    #[actix_web::test]
    async fn test_soft_failure_response() {
        let routes = routes();
        let resp = respond(
            routes.nfl_props.policy.on_error(OddsApiError::Timeout),
            &CacheSettings::default(),
            false,
        );

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=10"
        );
        let body = to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(&body[..], b"[]");
    }
}
