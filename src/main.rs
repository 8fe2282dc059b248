use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use odds_proxy::config::{LoggingSettings, Settings};
use odds_proxy::routes::{self, odds::{AppState, OddsRoutes}};
use odds_proxy::services::OddsApiClient;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for query decoding errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let loaded = match std::env::var("ODDS_PROXY_CONFIG") {
        Ok(path) => Settings::load_from(path),
        Err(_) => Settings::load(),
    };

    let settings = match loaded {
        Ok(settings) => {
            init_logging(&settings.logging);
            settings
        }
        Err(e) => {
            init_logging(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    info!("Starting odds proxy...");
    info!("Configuration loaded: upstream={:?}", settings.upstream);

    let client = OddsApiClient::new(
        settings.upstream.base_url.clone(),
        settings.upstream.api_key.clone(),
        settings.upstream.timeout(),
    )
    .map_err(|e| {
        error!("Failed to build upstream client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    if !client.has_api_key() {
        warn!("ODDS_API_KEY is not set; upstream requests will be rejected");
    }

    let app_state = AppState {
        client: Arc::new(client),
        routes: Arc::new(OddsRoutes::from_settings(&settings.defaults)),
        cache: settings.cache.clone(),
        expose_error_details: settings.server.expose_error_details,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or_else(num_workers);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

fn num_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
