// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{games_from_payload, Game, GameList};
pub use requests::OddsQuery;
pub use responses::{ErrorResponse, HealthResponse};
