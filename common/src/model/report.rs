//! Shapes returned by the reporting endpoints.
//!
//! These mirror what the dashboard charts consume: parallel arrays for plotting
//! plus detailed rows for the tables underneath.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Attendance histogram of one batch over its scheduled days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAttendanceStats {
    pub total_students: usize,
    pub demo_dates: Vec<NaiveDate>,
    /// Chart labels such as `May 1`, aligned with `demo_dates`.
    pub demo_date_labels: Vec<String>,
    /// Number of attendance records per scheduled day, aligned with `demo_dates`.
    pub attendance_counts: Vec<usize>,
    /// Rounded percentage of attended (student, day) slots.
    pub average_attendance: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub mobile_number: String,
}

/// One row of the per-student report of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAttendanceRow {
    pub student: StudentSummary,
    pub enrollment_id: String,
    pub enrollment_date: DateTime<Utc>,
    pub is_walk_in: bool,
    /// Distinct days attended, ascending.
    pub days_attended: Vec<NaiveDate>,
    pub total_days_attended: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentContact {
    pub id: String,
    pub name: String,
    pub mobile_number: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSchedule {
    pub id: String,
    pub batch_id: String,
    pub description: String,
    pub demo_dates: Vec<NaiveDate>,
}

/// Attendance detail of a single enrollment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentAttendanceDetails {
    pub student: StudentContact,
    pub batch: BatchSchedule,
    pub attendance_dates: Vec<NaiveDate>,
    pub percent_attended: u32,
    pub total_attended: usize,
    pub total_possible_dates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub batch_id: String,
    pub description: String,
    pub total_students: usize,
    pub total_attendance: usize,
    pub possible_attendance: usize,
    pub attendance_percentage: u32,
}

/// Attendance percentages of every batch, newest batch first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllBatchesStats {
    pub batch_ids: Vec<String>,
    pub average_attendance_percentages: Vec<u32>,
    pub detailed_stats: Vec<BatchSummary>,
}
