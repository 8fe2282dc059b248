// Core pipeline exports
pub mod bookmakers;
pub mod filters;
pub mod params;

pub use bookmakers::{normalize_bookmakers, normalize_list};
pub use filters::{filter_games, filter_games_at, TeamFilter, WindowFilter};
pub use params::{build_upstream_params, RequestDefaults, UpstreamParams};
