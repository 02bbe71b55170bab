//! # Attendance Marking
//!
//! `POST /api/attendance/mark` is called by the scanner with whatever it read
//! off a demo pass. At most one attendance record exists per enrollment and
//! UTC calendar day: the handler checks the day window first and the unique
//! index on `(enrollment_id, attendance_date)` rejects whatever slips past the
//! check when two scans of the same pass race.

use crate::db::{self, Store};
use crate::error::{is_unique_violation, AppError};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, SubsecRound, Utc};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use tracker_common::model::attendance::Attendance;
use tracker_common::model::day::utc_day_window;
use tracker_common::requests::{MarkAttendanceRequest, ScanPayload};
use tracker_common::responses::ApiResponse;

const ALREADY_MARKED: &str = "Attendance already marked for today";

pub async fn process(
    store: web::Data<Store>,
    payload: web::Json<MarkAttendanceRequest>,
) -> Result<HttpResponse, AppError> {
    let scan = payload.into_inner().qr_code_data;
    let attendance = store
        .run(move |conn| mark_attendance(conn, &scan, Utc::now()))
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(attendance)))
}

/// Records attendance for the enrollment named by `scan`, on the UTC day of `now`.
///
/// # Errors
/// - `NotFound` ("Invalid QR code") when the scan matches no enrollment.
/// - `Duplicate` when the enrollment already has a record for that day.
pub fn mark_attendance(
    conn: &Connection,
    scan: &ScanPayload,
    now: DateTime<Utc>,
) -> Result<Attendance, AppError> {
    let enrollment = match scan {
        ScanPayload::Token(token) => db::find_enrollment_by_token(conn, token.trim())?,
        ScanPayload::Enrollment { enrollment_id } => db::find_enrollment(conn, enrollment_id)?,
    };
    let enrollment = enrollment.ok_or_else(|| {
        warn!("Scan did not match any enrollment: {:?}", scan);
        AppError::NotFound("Invalid QR code. Enrollment not found.".to_string())
    })?;

    // Storage keeps microseconds; answer with the value a later read returns.
    let now = now.trunc_subsecs(6);
    let (start, end) = utc_day_window(now);
    let today = start.date_naive();

    let existing: Option<String> = conn
        .query_row(
            "SELECT id FROM attendance
             WHERE enrollment_id = ?1 AND attendance_date >= ?2 AND attendance_date < ?3",
            params![
                &enrollment.id,
                db::day_param(today),
                db::day_param(end.date_naive())
            ],
            |row| row.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Err(AppError::Duplicate(ALREADY_MARKED.to_string()));
    }

    let id = db::new_id();
    conn.execute(
        "INSERT INTO attendance (id, enrollment_id, batch_id, student_id, attendance_date, scan_time)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            &id,
            &enrollment.id,
            &enrollment.batch.id,
            &enrollment.student.id,
            db::day_param(today),
            db::format_timestamp(now)
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Duplicate(ALREADY_MARKED.to_string())
        } else {
            e.into()
        }
    })?;

    info!(
        "Attendance marked for student {} in batch {} on {}",
        enrollment.student.id, enrollment.batch.batch_id, today
    );

    Ok(Attendance {
        id,
        batch: enrollment.batch.id.clone(),
        student: enrollment.student.id.clone(),
        enrollment,
        attendance_date: today,
        scan_time: now,
    })
}
