use crate::db::{self, Store};
use crate::error::AppError;
use crate::services::batches::get_batch_by_code;
use crate::services::reports::aggregate::{student_rows, RosterEntry};
use actix_web::{web, HttpResponse};
use rusqlite::{params, Connection};
use tracker_common::model::report::{StudentAttendanceRow, StudentSummary};
use tracker_common::responses::ApiResponse;

/// `GET /api/attendance/report/{batch_id}` (batch code)
pub async fn process(
    store: web::Data<Store>,
    batch_code: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let batch_code = batch_code.into_inner();
    let rows = store
        .run(move |conn| student_attendance_report(conn, &batch_code))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(rows)))
}

/// Every student enrolled in the batch, in enrollment order, with the distinct
/// days they attended.
pub fn student_attendance_report(
    conn: &Connection,
    batch_code: &str,
) -> Result<Vec<StudentAttendanceRow>, AppError> {
    let batch = get_batch_by_code(conn, batch_code)?;

    let mut stmt = conn.prepare(
        "SELECT e.id, s.id, s.name, s.mobile_number, e.created_at, e.is_walk_in
         FROM enrollments e JOIN students s ON s.id = e.student_id
         WHERE e.batch_id = ?1
         ORDER BY e.created_at, e.rowid",
    )?;
    let roster = stmt
        .query_map(params![&batch.id], |row| {
            Ok(RosterEntry {
                enrollment_id: row.get(0)?,
                student: StudentSummary {
                    id: row.get(1)?,
                    name: row.get(2)?,
                    mobile_number: row.get(3)?,
                },
                enrolled_at: db::timestamp_column(row, 4)?,
                is_walk_in: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT enrollment_id, attendance_date FROM attendance
         WHERE batch_id = ?1 ORDER BY attendance_date",
    )?;
    let attendance = stmt
        .query_map(params![&batch.id], |row| {
            Ok((row.get::<_, String>(0)?, db::day_column(row, 1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(student_rows(roster, &attendance))
}
