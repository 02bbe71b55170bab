//! # Enrollment Service Module
//!
//! Binds students to batches and issues the opaque token printed as a QR code
//! on the student's demo pass. Routes live under `/api/enrollments`.
//!
//! ## Sub-modules:
//! - `enroll`: creates (or reuses) the student and the enrollment.
//! - `get`: looks an enrollment up by id or by QR token.
//! - `validate`: format rules for the enrollment form.

mod enroll;
mod get;
mod validate;

pub use enroll::enroll_student;
pub use get::{lookup, EnrollmentKey};

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/enrollments";

/// Configures and returns the Actix `Scope` for enrollment routes.
///
/// *   **`POST /`**: enroll a student (`201`; `400` invalid form, `404` unknown
///     batch code, `409` already enrolled).
/// *   **`GET /qr/{token}`**: resolve a demo pass token.
/// *   **`GET /{id}`**: fetch an enrollment by id.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(enroll::process))
        .route("/qr/{token}", get().to(get::process_by_token))
        .route("/{id}", get().to(get::process))
}
