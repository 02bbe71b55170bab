//! HTTP-facing services, one module per resource.
//!
//! Each module exposes a `configure_routes()` returning its Actix `Scope`;
//! [`configure`] mounts them all.

pub mod attendance;
pub mod batches;
pub mod enrollments;
pub mod reports;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(batches::configure_routes())
        .service(enrollments::configure_routes())
        .service(attendance::configure_routes())
        .service(reports::configure_routes());
}
