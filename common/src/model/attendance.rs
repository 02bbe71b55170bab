use crate::model::enrollment::Enrollment;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One successful scan of a demo pass.
///
/// `batch` and `student` hold the ids copied from the enrollment when the
/// record was created; they are never re-synced afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: String,
    pub enrollment: Enrollment,
    pub batch: String,
    pub student: String,
    /// UTC calendar day of the scan; at most one record per enrollment and day.
    pub attendance_date: NaiveDate,
    pub scan_time: DateTime<Utc>,
}

/// Flattened attendance row used by the per-batch listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub id: String,
    pub student_name: String,
    /// Sent as `timestamp`, the key report views read the scan day from.
    #[serde(rename = "timestamp")]
    pub attendance_date: NaiveDate,
    pub scan_time: DateTime<Utc>,
}

/// Attendance of a batch grouped by day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAttendance {
    pub date: NaiveDate,
    pub count: usize,
    /// Ids of the students that attended on `date`.
    pub students: Vec<String>,
}
