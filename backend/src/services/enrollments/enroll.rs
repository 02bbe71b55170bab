//! # Enrollment
//!
//! Handles `POST /api/enrollments`, used both by administrators entering an
//! enquiry and by students registering themselves at the venue (walk-ins).
//!
//! ## Workflow
//!
//! 1.  **Validation**: the form is trimmed and checked (`validate::validate_form`).
//! 2.  **Batch lookup**: the batch is resolved by its human code.
//! 3.  **Student**: looked up by mobile number and created on first sight. Two
//!     concurrent first enrollments with the same number race on the unique
//!     index; the loser gets a `409 Conflict`.
//! 4.  **Enrollment**: refused when the student is already in the batch,
//!     otherwise stored with a fresh random token. The unique index on
//!     `(batch_id, student_id)` backs the existence check.
//! 5.  **Response**: the enrollment is returned with batch and student populated.

use crate::db::{self, Store};
use crate::error::{is_unique_violation, AppError};
use crate::services::enrollments::validate::{validate_form, EnrollmentForm};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use tracker_common::model::enrollment::Enrollment;
use tracker_common::model::student::Student;
use tracker_common::requests::EnrollRequest;
use tracker_common::responses::ApiResponse;
use uuid::Uuid;

pub async fn process(
    store: web::Data<Store>,
    payload: web::Json<EnrollRequest>,
) -> Result<HttpResponse, AppError> {
    let req = payload.into_inner();
    let enrollment = store
        .run(move |conn| enroll_student(conn, &req, Utc::now()))
        .await?;
    Ok(HttpResponse::Created()
        .json(ApiResponse::ok(enrollment).with_message("Enrollment successful")))
}

/// Enrolls a student in a batch, creating the student on first enrollment.
///
/// # Errors
/// - `Validation` when the form is incomplete or malformed.
/// - `NotFound` when no batch has the given code.
/// - `Conflict` when the student is already enrolled in the batch, or when the
///   student record could not be created because its mobile number or email is
///   already taken.
pub fn enroll_student(
    conn: &Connection,
    req: &EnrollRequest,
    now: DateTime<Utc>,
) -> Result<Enrollment, AppError> {
    let form = validate_form(req)?;

    let batch = db::find_batch_by_code(conn, &form.batch_code)?
        .ok_or_else(|| AppError::NotFound(format!("Batch {} not found", form.batch_code)))?;

    let tx = db::begin(conn)?;

    let student = match find_student_by_mobile(&tx, &form.mobile_number)? {
        Some(student) => student,
        None => create_student(&tx, &form, now)?,
    };

    let already_enrolled: Option<String> = tx
        .query_row(
            "SELECT id FROM enrollments WHERE batch_id = ?1 AND student_id = ?2",
            params![&batch.id, &student.id],
            |row| row.get(0),
        )
        .optional()?;
    if already_enrolled.is_some() {
        return Err(AppError::Conflict(
            "Student is already enrolled in this batch".to_string(),
        ));
    }

    let id = db::new_id();
    let token = new_token();
    tx.execute(
        "INSERT INTO enrollments (id, batch_id, student_id, qr_code_data, is_walk_in, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            &id,
            &batch.id,
            &student.id,
            &token,
            form.is_walk_in,
            db::format_timestamp(now)
        ],
    )
    .map_err(enrollment_insert_error)?;
    tx.commit()?;

    info!(
        "Student {} enrolled in batch {} (walk-in: {})",
        student.id, batch.batch_id, form.is_walk_in
    );

    db::find_enrollment(conn, &id)?
        .ok_or_else(|| AppError::Internal(format!("enrollment {} vanished after insert", id)))
}

/// Maps a rejected enrollment insert. Both the `(batch, student)` pair index
/// and the token index mean the enrollment already exists.
fn enrollment_insert_error(e: rusqlite::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::Conflict("Student is already enrolled in this batch".to_string())
    } else {
        e.into()
    }
}

/// 128 random bits from the OS generator, as 32 lowercase hex characters.
fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn find_student_by_mobile(conn: &Connection, mobile: &str) -> Result<Option<Student>, AppError> {
    let sql = format!(
        "SELECT {} FROM students WHERE mobile_number = ?1",
        db::STUDENT_COLUMNS
    );
    Ok(conn
        .query_row(&sql, params![mobile], db::student_from_row)
        .optional()?)
}

fn create_student(
    conn: &Connection,
    form: &EnrollmentForm,
    now: DateTime<Utc>,
) -> Result<Student, AppError> {
    let student = Student {
        id: db::new_id(),
        name: form.name.clone(),
        mobile_number: form.mobile_number.clone(),
        email: form.email.clone(),
        created_at: now,
    };
    conn.execute(
        "INSERT INTO students (id, name, mobile_number, email, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            &student.id,
            &student.name,
            &student.mobile_number,
            &student.email,
            db::format_timestamp(now)
        ],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(
                "A student with this mobile number or email already exists".to_string(),
            )
        } else {
            e.into()
        }
    })?;
    info!("Student {} created", student.id);
    Ok(student)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_store;
    use crate::services::batches::create_batch;
    use chrono::NaiveDate;
    use std::sync::Barrier;
    use std::thread;
    use tracker_common::requests::CreateBatchRequest;

    fn seed_batch(conn: &Connection, code: &str) {
        create_batch(
            conn,
            &CreateBatchRequest {
                batch_id: code.to_string(),
                description: "Demo".to_string(),
                demo_dates: vec![NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()],
            },
            Utc::now(),
        )
        .unwrap();
    }

    fn form(code: &str, mobile: &str, email: &str) -> EnrollRequest {
        EnrollRequest {
            batch_id: code.to_string(),
            name: "Ravi Kumar".to_string(),
            mobile_number: mobile.to_string(),
            email: email.to_string(),
            is_walk_in: false,
        }
    }

    #[test]
    fn enrolling_twice_is_a_conflict() {
        let (_dir, store) = temp_store();
        let conn = store.open().unwrap();
        seed_batch(&conn, "B1");

        let first = enroll_student(&conn, &form("B1", "9000000001", "ravi@example.com"), Utc::now())
            .unwrap();
        assert_eq!(first.batch.batch_id, "B1");
        assert_eq!(first.student.mobile_number, "9000000001");
        assert_eq!(first.qr_code_data.len(), 32);

        let err = enroll_student(&conn, &form("B1", "9000000001", "ravi@example.com"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn student_is_reused_across_batches() {
        let (_dir, store) = temp_store();
        let conn = store.open().unwrap();
        seed_batch(&conn, "B1");
        seed_batch(&conn, "B2");

        let a = enroll_student(&conn, &form("B1", "9000000001", "ravi@example.com"), Utc::now())
            .unwrap();
        let b = enroll_student(&conn, &form("B2", "9000000001", "ravi@example.com"), Utc::now())
            .unwrap();
        assert_eq!(a.student.id, b.student.id);
        assert_ne!(a.qr_code_data, b.qr_code_data);
    }

    #[test]
    fn email_owned_by_another_number_is_a_conflict() {
        let (_dir, store) = temp_store();
        let conn = store.open().unwrap();
        seed_batch(&conn, "B1");

        enroll_student(&conn, &form("B1", "9000000001", "ravi@example.com"), Utc::now()).unwrap();
        let err = enroll_student(&conn, &form("B1", "9000000002", "RAVI@example.com"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn unknown_batch_code_is_not_found() {
        let (_dir, store) = temp_store();
        let conn = store.open().unwrap();
        let err = enroll_student(&conn, &form("NOPE", "9000000001", "ravi@example.com"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn concurrent_submissions_enroll_once() {
        const CLIENTS: usize = 8;
        let (_dir, store) = temp_store();
        seed_batch(&store.open().unwrap(), "B1");
        let req = form("B1", "9000000001", "ravi@example.com");
        let barrier = Barrier::new(CLIENTS);

        let results: Vec<Result<Enrollment, AppError>> = thread::scope(|s| {
            let handles: Vec<_> = (0..CLIENTS)
                .map(|_| {
                    s.spawn(|| {
                        let conn = store.open().unwrap();
                        barrier.wait();
                        enroll_student(&conn, &req, Utc::now())
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let enrolled = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(AppError::Conflict(_))))
            .count();
        assert_eq!(enrolled, 1);
        assert_eq!(conflicts, CLIENTS - 1);

        let conn = store.open().unwrap();
        let (students, enrollments): (i64, i64) = conn
            .query_row(
                "SELECT (SELECT COUNT(*) FROM students), (SELECT COUNT(*) FROM enrollments)",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!((students, enrollments), (1, 1));
    }

    #[test]
    fn index_rejections_are_reported_as_conflicts() {
        let (_dir, store) = temp_store();
        let conn = store.open().unwrap();
        seed_batch(&conn, "B1");
        seed_batch(&conn, "B2");
        let first = enroll_student(&conn, &form("B1", "9000000001", "ravi@example.com"), Utc::now())
            .unwrap();
        let b2 = db::find_batch_by_code(&conn, "B2").unwrap().unwrap();

        // Inserts from requests that slipped past the pre-insert check.
        let insert = |batch_id: &str, token: &str| {
            conn.execute(
                "INSERT INTO enrollments (id, batch_id, student_id, qr_code_data, is_walk_in, created_at)
                 VALUES (?1, ?2, ?3, ?4, 0, ?5)",
                params![
                    db::new_id(),
                    batch_id,
                    &first.student.id,
                    token,
                    db::format_timestamp(Utc::now())
                ],
            )
            .unwrap_err()
        };
        let same_pair = insert(&first.batch.id, &new_token());
        let same_token = insert(&b2.id, &first.qr_code_data);

        assert!(matches!(enrollment_insert_error(same_pair), AppError::Conflict(_)));
        assert!(matches!(enrollment_insert_error(same_token), AppError::Conflict(_)));
    }
}
