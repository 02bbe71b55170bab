//! # Reporting Service Module
//!
//! Read-only aggregations of attendance for the dashboard. Nothing here
//! writes to the store. Routes live under `/api/reports`; the per-student
//! roster report is served from `/api/attendance/report/{batch_id}`.
//!
//! ## Sub-modules:
//! - `aggregate`: the arithmetic, as pure functions.
//! - `batch`: histogram of one batch over its scheduled days.
//! - `student`: attendance detail of one enrollment.
//! - `batches`: percentages of every batch.
//! - `roster`: every enrolled student of a batch with the days attended.

pub mod aggregate;
mod batch;
mod batches;
pub(crate) mod roster;
mod student;

pub use batch::batch_attendance_stats;
pub use batches::all_batches_stats;
pub use roster::student_attendance_report;
pub use student::enrollment_attendance_details;

use crate::db;
use crate::error::AppError;
use actix_web::web::{get, scope};
use actix_web::Scope;
use chrono::NaiveDate;
use rusqlite::{params, Connection};

const API_PATH: &str = "/api/reports";

/// Configures and returns the Actix `Scope` for report routes.
///
/// *   **`GET /batch/{batch_id}`**: histogram of a batch (by internal id).
/// *   **`GET /student/{enrollment_id}`**: detail of one enrollment.
/// *   **`GET /batches`**: summary of every batch.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/batch/{batch_id}", get().to(batch::process))
        .route("/student/{enrollment_id}", get().to(student::process))
        .route("/batches", get().to(batches::process))
}

pub(crate) fn enrolled_count(conn: &Connection, batch_id: &str) -> Result<usize, AppError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM enrollments WHERE batch_id = ?1",
        params![batch_id],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

/// Days of every attendance record of a batch, ascending.
pub(crate) fn attendance_days(conn: &Connection, batch_id: &str) -> Result<Vec<NaiveDate>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT attendance_date FROM attendance WHERE batch_id = ?1 ORDER BY attendance_date",
    )?;
    let days = stmt
        .query_map(params![batch_id], |row| db::day_column(row, 0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(days)
}
