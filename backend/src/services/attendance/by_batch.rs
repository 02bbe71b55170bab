use crate::db::{self, Store};
use crate::error::AppError;
use crate::services::batches::get_batch;
use actix_web::{web, HttpResponse};
use rusqlite::{params, Connection};
use tracker_common::model::attendance::AttendanceEntry;
use tracker_common::responses::ApiResponse;

/// `GET /api/attendance/batch/{batch_id}` (internal id)
pub async fn process(
    store: web::Data<Store>,
    batch_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let batch_id = batch_id.into_inner();
    let entries = store
        .run(move |conn| list_batch_attendance(conn, &batch_id))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(entries)))
}

/// Attendance records of a batch with the student's name, latest scan first.
pub fn list_batch_attendance(
    conn: &Connection,
    batch_id: &str,
) -> Result<Vec<AttendanceEntry>, AppError> {
    let batch = get_batch(conn, batch_id)?;
    let mut stmt = conn.prepare(
        "SELECT a.id, s.name, a.attendance_date, a.scan_time
         FROM attendance a JOIN students s ON s.id = a.student_id
         WHERE a.batch_id = ?1
         ORDER BY a.scan_time DESC, a.rowid DESC",
    )?;
    let entries = stmt
        .query_map(params![&batch.id], |row| {
            Ok(AttendanceEntry {
                id: row.get(0)?,
                student_name: row.get(1)?,
                attendance_date: db::day_column(row, 2)?,
                scan_time: db::timestamp_column(row, 3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}
