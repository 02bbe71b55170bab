use crate::db::Store;
use crate::error::AppError;
use crate::services::batches::get_batch;
use crate::services::reports::aggregate::batch_histogram;
use crate::services::reports::{attendance_days, enrolled_count};
use actix_web::{web, HttpResponse};
use rusqlite::Connection;
use tracker_common::model::report::BatchAttendanceStats;
use tracker_common::responses::ApiResponse;

/// `GET /api/reports/batch/{batch_id}`
pub async fn process(
    store: web::Data<Store>,
    batch_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let batch_id = batch_id.into_inner();
    let stats = store
        .run(move |conn| batch_attendance_stats(conn, &batch_id))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}

/// Attendance counts of a batch on each of its scheduled days, plus the
/// overall average over `enrolled students × scheduled days`.
pub fn batch_attendance_stats(
    conn: &Connection,
    batch_id: &str,
) -> Result<BatchAttendanceStats, AppError> {
    let batch = get_batch(conn, batch_id)?;
    let total_students = enrolled_count(conn, &batch.id)?;
    let days = attendance_days(conn, &batch.id)?;
    Ok(batch_histogram(&batch, total_students, &days))
}
