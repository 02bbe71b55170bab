//! # Batch Service Module
//!
//! Administrative management of batches: scheduled cohorts of demo classes
//! identified by a human-readable code. Routes live under `/api/batches`.
//!
//! ## Sub-modules:
//! - `create`: validates and stores a new batch with its ordered demo dates.
//! - `get`: lists batches and looks them up by internal id or by code.
//! - `update`: edits description and schedule; the code itself is immutable.
//! - `delete`: removes a batch together with its enrollments and attendance.

mod create;
mod delete;
mod get;
mod update;

pub use create::create_batch;
pub use delete::delete_batch;
pub use get::{get_batch, get_batch_by_code};
pub use update::update_batch;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/batches";

/// Configures and returns the Actix `Scope` for all batch routes.
///
/// # Registered Routes:
///
/// *   **`POST /`**: create a batch (`201`, or `400` when the code is taken).
/// *   **`GET /`**: list all batches, newest first.
/// *   **`GET /code/{batch_id}`**: fetch a batch by its human code.
/// *   **`GET /{id}`**, **`PUT /{id}`**, **`DELETE /{id}`**: by internal id.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(create::process))
        .route("", get().to(get::process_list))
        .route("/code/{batch_id}", get().to(get::process_by_code))
        .route("/{id}", get().to(get::process))
        .route("/{id}", put().to(update::process))
        .route("/{id}", delete().to(delete::process))
}
