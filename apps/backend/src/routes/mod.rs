use actix_web::web;

pub mod health;
pub mod matches;
pub mod parties;

/// Configure application routes for tests and non-HttpServer contexts.
///
/// In production, `main.rs` wires these under the same scopes with the
/// middleware stack around them; tests register the same paths directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Match registration routes: /api/matches/**
    cfg.service(web::scope("/api/matches").configure(matches::configure_routes));

    // Party membership routes: /api/parties/**
    cfg.service(web::scope("/api/parties").configure(parties::configure_routes));
}
