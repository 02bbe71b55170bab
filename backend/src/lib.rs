//! Demo-class attendance tracker.
//!
//! Administrators schedule batches of demo classes, students enroll and receive
//! a QR-coded pass, and staff scan passes to record attendance. This crate holds
//! the HTTP API, the SQLite store and the services behind it; `main.rs` only
//! reads the configuration and starts the server.

pub mod config;
pub mod db;
pub mod error;
pub mod services;

use crate::db::Store;
use crate::error::AppError;
use actix_web::{web, HttpResponse};
use tracker_common::responses::ApiResponse;

/// JSON body limits, with malformed bodies reported as validation errors.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

/// Registers shared state and every API route on an `App`.
pub fn configure_app(store: Store, json_limit: usize) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(store))
            .app_data(json_config(json_limit));
        services::configure(cfg);
    }
}

/// Fallback for unknown routes.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::failure("Route not found"))
}
