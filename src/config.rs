use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::{normalize_list, RequestDefaults};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub defaults: DefaultsSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// Add upstream error details to core-route error bodies
    #[serde(default)]
    pub expose_error_details: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            expose_error_details: false,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 3000 }

#[derive(Clone, Deserialize)]
pub struct UpstreamSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Keep the key out of Debug output
impl std::fmt::Debug for UpstreamSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl UpstreamSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_base_url() -> String { "https://api.the-odds-api.com/v4".to_string() }
fn default_timeout_secs() -> u64 { 15 }

/// Fallback values for client query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsSettings {
    /// Provider sport key served by the `/nfl-*` routes
    #[serde(default = "default_sport")]
    pub sport: String,
    #[serde(default = "default_regions")]
    pub regions: String,
    #[serde(default = "default_odds_format")]
    pub odds_format: String,
    #[serde(default = "default_bookmakers")]
    pub bookmakers: String,
    #[serde(default = "default_core_markets")]
    pub core_markets: String,
    #[serde(default = "default_prop_markets")]
    pub prop_markets: String,
}

impl Default for DefaultsSettings {
    fn default() -> Self {
        Self {
            sport: default_sport(),
            regions: default_regions(),
            odds_format: default_odds_format(),
            bookmakers: default_bookmakers(),
            core_markets: default_core_markets(),
            prop_markets: default_prop_markets(),
        }
    }
}

impl DefaultsSettings {
    /// Defaults for moneyline/spread/total routes
    pub fn core(&self) -> RequestDefaults {
        self.with_markets(&self.core_markets, default_core_markets)
    }

    /// Defaults for player-prop routes
    pub fn props(&self) -> RequestDefaults {
        self.with_markets(&self.prop_markets, default_prop_markets)
    }

    /// Blank configured values fall back to the built-in lists, so a route's
    /// bookmaker and market defaults are never empty
    fn with_markets(&self, markets: &str, builtin_markets: fn() -> String) -> RequestDefaults {
        RequestDefaults {
            regions: or_builtin("regions", &self.regions, default_regions),
            markets: or_builtin_list("markets", markets, builtin_markets),
            odds_format: or_builtin("odds_format", &self.odds_format, default_odds_format),
            bookmakers: or_builtin_list("bookmakers", &self.bookmakers, default_bookmakers),
        }
    }
}

fn or_builtin(name: &str, value: &str, builtin: impl FnOnce() -> String) -> String {
    let value = value.trim();
    if value.is_empty() {
        tracing::warn!("defaults.{} is blank, using built-in value", name);
        builtin()
    } else {
        value.to_string()
    }
}

fn or_builtin_list(name: &str, value: &str, builtin: impl FnOnce() -> String) -> String {
    let list = normalize_list(value);
    if list.is_empty() {
        tracing::warn!("defaults.{} has no entries, using built-in list", name);
        builtin()
    } else {
        list
    }
}

fn default_sport() -> String { "americanfootball_nfl".to_string() }
fn default_regions() -> String { "us".to_string() }
fn default_odds_format() -> String { "american".to_string() }
fn default_bookmakers() -> String {
    "draftkings,fanduel,betmgm,caesars,bet365,thescore".to_string()
}
fn default_core_markets() -> String { "h2h,spreads,totals".to_string() }
fn default_prop_markets() -> String {
    [
        "player_pass_yds",
        "player_pass_tds",
        "player_rush_yds",
        "player_recv_yds",
        "player_receptions",
        "player_anytime_td",
    ]
    .join(",")
}

/// Cache-Control lifetimes
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_success_max_age")]
    pub success_max_age_secs: u32,
    #[serde(default = "default_fallback_max_age")]
    pub fallback_max_age_secs: u32,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            success_max_age_secs: default_success_max_age(),
            fallback_max_age_secs: default_fallback_max_age(),
        }
    }
}

fn default_success_max_age() -> u32 { 60 }
fn default_fallback_max_age() -> u32 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local configuration file (config/local.toml)
    /// 4. Environment variables (prefixed with ODDS_PROXY__)
    /// 5. Legacy `PORT` and `ODDS_API_KEY` variables
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ODDS_PROXY__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_legacy_env(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_file_with(path.as_ref(), |name| std::env::var(name).ok())
    }
}

fn load_file_with<F>(path: &Path, lookup: F) -> Result<Settings, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = Config::builder()
        .add_source(File::from(path))
        .add_source(env_source())
        .build()?;

    apply_legacy_vars(settings, lookup)?.try_deserialize()
}

fn env_source() -> Environment {
    Environment::with_prefix("ODDS_PROXY")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the plain `PORT` and `ODDS_API_KEY` variables most hosting
/// platforms set
fn apply_legacy_env(settings: Config) -> Result<Config, ConfigError> {
    apply_legacy_vars(settings, |name| std::env::var(name).ok())
}

fn apply_legacy_vars<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
        builder = builder.set_override("server.port", i64::from(port))?;
    }
    if let Some(api_key) = lookup("ODDS_API_KEY") {
        builder = builder.set_override("upstream.api_key", api_key)?;
    }

    builder.build()
}
