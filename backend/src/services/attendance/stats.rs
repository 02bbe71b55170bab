use crate::db::{self, Store};
use crate::error::AppError;
use crate::services::batches::get_batch_by_code;
use crate::services::reports::aggregate::group_by_day;
use actix_web::{web, HttpResponse};
use rusqlite::{params, Connection};
use tracker_common::model::attendance::DailyAttendance;
use tracker_common::responses::ApiResponse;

/// `GET /api/attendance/stats/{batch_id}` (batch code)
pub async fn process(
    store: web::Data<Store>,
    batch_code: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let batch_code = batch_code.into_inner();
    let days = store
        .run(move |conn| daily_attendance(conn, &batch_code))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(days)))
}

/// Attendance of a batch grouped by UTC day, earliest day first.
pub fn daily_attendance(
    conn: &Connection,
    batch_code: &str,
) -> Result<Vec<DailyAttendance>, AppError> {
    let batch = get_batch_by_code(conn, batch_code)?;
    let mut stmt = conn.prepare(
        "SELECT attendance_date, student_id FROM attendance
         WHERE batch_id = ?1 ORDER BY attendance_date, scan_time",
    )?;
    let records = stmt
        .query_map(params![&batch.id], |row| {
            Ok((db::day_column(row, 0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(group_by_day(&records))
}
