// Service exports
pub mod odds_api;

pub use odds_api::{OddsApiClient, OddsApiError, OddsResponse, REQUESTS_REMAINING_HEADER};
