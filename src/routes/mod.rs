// Route exports
pub mod odds;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(odds::configure);
}
