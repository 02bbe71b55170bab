//! # Entity Store
//!
//! SQLite persistence for students, batches, enrollments and attendance.
//!
//! Every request opens its own short-lived connection through [`Store::open`];
//! nothing is shared between requests except the database file itself. The
//! uniqueness rules of the domain are declared as unique indexes so that the
//! database, not the application's check-then-insert sequences, has the final
//! word when two requests race:
//!
//! - `students(mobile_number)`, `students(email)`
//! - `batches(batch_code)`
//! - `enrollments(batch_id, student_id)`, `enrollments(qr_code_data)`
//! - `attendance(enrollment_id, attendance_date)`
//!
//! This module also hosts the row mappers and lookups shared by several
//! services (loading a batch with its schedule, loading a populated enrollment).

use crate::error::AppError;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracker_common::model::batch::Batch;
use tracker_common::model::day::{format_day, parse_day};
use tracker_common::model::enrollment::Enrollment;
use tracker_common::model::student::Student;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS students(
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    mobile_number TEXT NOT NULL,
    email TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_students_mobile ON students(mobile_number);
CREATE UNIQUE INDEX IF NOT EXISTS idx_students_email ON students(email);

CREATE TABLE IF NOT EXISTS batches(
    id TEXT PRIMARY KEY,
    batch_code TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_batches_code ON batches(batch_code);

CREATE TABLE IF NOT EXISTS batch_demo_dates(
    batch_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    demo_date TEXT NOT NULL,
    PRIMARY KEY(batch_id, position),
    FOREIGN KEY(batch_id) REFERENCES batches(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS enrollments(
    id TEXT PRIMARY KEY,
    batch_id TEXT NOT NULL,
    student_id TEXT NOT NULL,
    qr_code_data TEXT NOT NULL,
    is_walk_in INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    FOREIGN KEY(batch_id) REFERENCES batches(id) ON DELETE CASCADE,
    FOREIGN KEY(student_id) REFERENCES students(id)
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_enrollments_pair ON enrollments(batch_id, student_id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_enrollments_qr ON enrollments(qr_code_data);

CREATE TABLE IF NOT EXISTS attendance(
    id TEXT PRIMARY KEY,
    enrollment_id TEXT NOT NULL,
    batch_id TEXT NOT NULL,
    student_id TEXT NOT NULL,
    attendance_date TEXT NOT NULL,
    scan_time TEXT NOT NULL,
    FOREIGN KEY(enrollment_id) REFERENCES enrollments(id) ON DELETE CASCADE,
    FOREIGN KEY(batch_id) REFERENCES batches(id) ON DELETE CASCADE,
    FOREIGN KEY(student_id) REFERENCES students(id)
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_attendance_day ON attendance(enrollment_id, attendance_date);
CREATE INDEX IF NOT EXISTS idx_attendance_batch ON attendance(batch_id);
";

/// Handle to the database file. Cheap to clone; holds no open connection.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Creates the schema if needed and returns a handle to `path`.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let store = Store {
            path: path.as_ref().to_path_buf(),
        };
        let conn = store.open()?;
        conn.execute_batch(SCHEMA)?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a fresh connection with foreign keys enforced.
    pub fn open(&self) -> Result<Connection, AppError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(conn)
    }

    /// Runs `f` on a fresh connection in the blocking thread pool.
    pub async fn run<T, F>(&self, f: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, AppError> + Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || {
            let conn = store.open()?;
            f(&conn)
        })
        .await?
    }
}

/// Starts an immediate transaction, taking the write lock up front so that
/// concurrent writers queue on the busy timeout instead of failing on upgrade.
pub fn begin(conn: &Connection) -> Result<Transaction<'_>, AppError> {
    Ok(Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?)
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Fixed-width RFC 3339 so stored timestamps sort lexicographically.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error(idx: usize, raw: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        format!("unparseable value: {}", raw).into(),
    )
}

pub fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| conversion_error(idx, &raw))
}

pub fn day_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    parse_day(&raw).ok_or_else(|| conversion_error(idx, &raw))
}

pub fn day_param(day: NaiveDate) -> String {
    format_day(day)
}

pub const STUDENT_COLUMNS: &str = "id, name, mobile_number, email, created_at";

pub fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        mobile_number: row.get(2)?,
        email: row.get(3)?,
        created_at: timestamp_column(row, 4)?,
    })
}

pub fn find_student(conn: &Connection, id: &str) -> Result<Option<Student>, AppError> {
    let sql = format!("SELECT {} FROM students WHERE id = ?1", STUDENT_COLUMNS);
    Ok(conn
        .query_row(&sql, params![id], student_from_row)
        .optional()?)
}

/// Scheduled days of a batch in their stored order.
pub fn load_demo_dates(conn: &Connection, batch_id: &str) -> Result<Vec<NaiveDate>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT demo_date FROM batch_demo_dates WHERE batch_id = ?1 ORDER BY position",
    )?;
    let dates = stmt
        .query_map(params![batch_id], |row| day_column(row, 0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(dates)
}

/// Replaces the schedule of a batch, keeping the given order.
pub fn store_demo_dates(
    conn: &Connection,
    batch_id: &str,
    dates: &[NaiveDate],
) -> Result<(), AppError> {
    conn.execute(
        "DELETE FROM batch_demo_dates WHERE batch_id = ?1",
        params![batch_id],
    )?;
    let mut stmt = conn.prepare(
        "INSERT INTO batch_demo_dates (batch_id, position, demo_date) VALUES (?1, ?2, ?3)",
    )?;
    for (position, day) in dates.iter().enumerate() {
        stmt.execute(params![batch_id, position as i64, day_param(*day)])?;
    }
    Ok(())
}

fn batch_where(conn: &Connection, clause: &str, value: &str) -> Result<Option<Batch>, AppError> {
    let sql = format!(
        "SELECT id, batch_code, description, created_at FROM batches WHERE {} = ?1",
        clause
    );
    let head = conn
        .query_row(&sql, params![value], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                timestamp_column(row, 3)?,
            ))
        })
        .optional()?;

    match head {
        Some((id, batch_id, description, created_at)) => {
            let demo_dates = load_demo_dates(conn, &id)?;
            Ok(Some(Batch {
                id,
                batch_id,
                description,
                demo_dates,
                created_at,
            }))
        }
        None => Ok(None),
    }
}

pub fn find_batch(conn: &Connection, id: &str) -> Result<Option<Batch>, AppError> {
    batch_where(conn, "id", id)
}

pub fn find_batch_by_code(conn: &Connection, code: &str) -> Result<Option<Batch>, AppError> {
    batch_where(conn, "batch_code", code)
}

/// All batches, newest first.
pub fn list_batches(conn: &Connection) -> Result<Vec<Batch>, AppError> {
    let ids: Vec<String> = conn
        .prepare("SELECT id FROM batches ORDER BY created_at DESC, rowid DESC")?
        .query_map([], |row| row.get(0))?
        .collect::<Result<_, _>>()?;

    let mut batches = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(batch) = find_batch(conn, &id)? {
            batches.push(batch);
        }
    }
    Ok(batches)
}

fn enrollment_where(
    conn: &Connection,
    clause: &str,
    value: &str,
) -> Result<Option<Enrollment>, AppError> {
    let sql = format!(
        "SELECT id, batch_id, student_id, qr_code_data, is_walk_in, created_at
         FROM enrollments WHERE {} = ?1",
        clause
    );
    let head = conn
        .query_row(&sql, params![value], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, bool>(4)?,
                timestamp_column(row, 5)?,
            ))
        })
        .optional()?;

    let Some((id, batch_id, student_id, qr_code_data, is_walk_in, created_at)) = head else {
        return Ok(None);
    };

    let batch = find_batch(conn, &batch_id)?
        .ok_or_else(|| AppError::Internal(format!("enrollment {} lost its batch", id)))?;
    let student = find_student(conn, &student_id)?
        .ok_or_else(|| AppError::Internal(format!("enrollment {} lost its student", id)))?;

    Ok(Some(Enrollment {
        id,
        batch,
        student,
        qr_code_data,
        is_walk_in,
        created_at,
    }))
}

/// Loads an enrollment by id with batch and student populated.
pub fn find_enrollment(conn: &Connection, id: &str) -> Result<Option<Enrollment>, AppError> {
    enrollment_where(conn, "id", id)
}

/// Loads an enrollment by its QR token with batch and student populated.
pub fn find_enrollment_by_token(
    conn: &Connection,
    token: &str,
) -> Result<Option<Enrollment>, AppError> {
    enrollment_where(conn, "qr_code_data", token)
}
