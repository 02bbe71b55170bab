use crate::db::{self, Store};
use crate::error::AppError;
use crate::services::enrollments::{lookup, EnrollmentKey};
use crate::services::reports::aggregate::attendance_percentage;
use actix_web::{web, HttpResponse};
use rusqlite::{params, Connection};
use tracker_common::model::report::{BatchSchedule, EnrollmentAttendanceDetails, StudentContact};
use tracker_common::responses::ApiResponse;

/// `GET /api/reports/student/{enrollment_id}`
pub async fn process(
    store: web::Data<Store>,
    enrollment_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let enrollment_id = enrollment_id.into_inner();
    let details = store
        .run(move |conn| enrollment_attendance_details(conn, &enrollment_id))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(details)))
}

/// Days attended by one enrollment and the share of its batch's schedule they cover.
pub fn enrollment_attendance_details(
    conn: &Connection,
    enrollment_id: &str,
) -> Result<EnrollmentAttendanceDetails, AppError> {
    let enrollment = lookup(conn, EnrollmentKey::Id(enrollment_id))?;

    let mut stmt = conn.prepare(
        "SELECT attendance_date FROM attendance WHERE enrollment_id = ?1 ORDER BY attendance_date",
    )?;
    let attendance_dates = stmt
        .query_map(params![enrollment_id], |row| db::day_column(row, 0))?
        .collect::<Result<Vec<_>, _>>()?;

    let total_possible_dates = enrollment.batch.demo_dates.len();
    let total_attended = attendance_dates.len();

    Ok(EnrollmentAttendanceDetails {
        student: StudentContact {
            id: enrollment.student.id,
            name: enrollment.student.name,
            mobile_number: enrollment.student.mobile_number,
            email: enrollment.student.email,
        },
        batch: BatchSchedule {
            id: enrollment.batch.id,
            batch_id: enrollment.batch.batch_id,
            description: enrollment.batch.description,
            demo_dates: enrollment.batch.demo_dates,
        },
        attendance_dates,
        percent_attended: attendance_percentage(total_attended, total_possible_dates),
        total_attended,
        total_possible_dates,
    })
}
