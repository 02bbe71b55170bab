//! # Attendance Service Module
//!
//! Records demo pass scans and exposes the attendance views used by the
//! scanner and report screens. Routes live under `/api/attendance`.
//!
//! ## Sub-modules:
//! - `mark`: resolves a scan to an enrollment and records today's attendance.
//! - `stats`: attendance of a batch grouped by day.
//! - the per-student report of a batch is served by `reports::roster`.
//! - `by_batch`: flat list of a batch's attendance records.
//!
//! `stats` and `report` address the batch by its human code, `by_batch` by
//! its internal id.

mod by_batch;
mod mark;
mod stats;

pub use by_batch::list_batch_attendance;
pub use mark::mark_attendance;
pub use stats::daily_attendance;

use crate::services::reports::roster;
use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/attendance";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        // Record a scan.
        .route("/mark", post().to(mark::process))
        // Day-by-day counts for a batch code.
        .route("/stats/{batch_id}", get().to(stats::process))
        // Per-student report for a batch code.
        .route("/report/{batch_id}", get().to(roster::process))
        // Raw records for a batch id.
        .route("/batch/{batch_id}", get().to(by_batch::process))
}
