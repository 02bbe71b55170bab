//! Attendance arithmetic shared by every report.
//!
//! Pure functions over rows already loaded from the store, so the numbers
//! can be checked without a database.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use tracker_common::model::attendance::DailyAttendance;
use tracker_common::model::batch::Batch;
use tracker_common::model::day::day_label;
use tracker_common::model::report::{
    AllBatchesStats, BatchAttendanceStats, BatchSummary, StudentAttendanceRow, StudentSummary,
};

/// `attended / possible` as a percentage rounded half up; 0 when nothing was possible.
pub fn attendance_percentage(attended: usize, possible: usize) -> u32 {
    if possible == 0 {
        return 0;
    }
    let scaled = (attended as u64 * 200 + possible as u64) / (possible as u64 * 2);
    scaled as u32
}

/// Number of attendance records on each scheduled day, in schedule order.
pub fn counts_per_day(scheduled: &[NaiveDate], attended: &[NaiveDate]) -> Vec<usize> {
    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for day in attended {
        *per_day.entry(*day).or_insert(0) += 1;
    }
    scheduled
        .iter()
        .map(|day| per_day.get(day).copied().unwrap_or(0))
        .collect()
}

/// Histogram of a batch over its schedule.
///
/// The average counts every attendance record of the batch, including scans on
/// days that are not on the schedule.
pub fn batch_histogram(
    batch: &Batch,
    total_students: usize,
    attended: &[NaiveDate],
) -> BatchAttendanceStats {
    let possible = total_students * batch.demo_dates.len();
    BatchAttendanceStats {
        total_students,
        demo_dates: batch.demo_dates.clone(),
        demo_date_labels: batch.demo_dates.iter().map(|d| day_label(*d)).collect(),
        attendance_counts: counts_per_day(&batch.demo_dates, attended),
        average_attendance: attendance_percentage(attended.len(), possible),
    }
}

/// Groups `(day, student id)` pairs by day, ascending.
pub fn group_by_day(records: &[(NaiveDate, String)]) -> Vec<DailyAttendance> {
    let mut days: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for (day, student) in records {
        days.entry(*day).or_default().push(student.clone());
    }
    days.into_iter()
        .map(|(date, students)| DailyAttendance {
            date,
            count: students.len(),
            students,
        })
        .collect()
}

/// An enrolled student as needed by the per-student report.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub enrollment_id: String,
    pub student: StudentSummary,
    pub enrolled_at: DateTime<Utc>,
    pub is_walk_in: bool,
}

/// One row per enrolled student with the distinct days they attended.
///
/// `attendance` holds `(enrollment id, day)` pairs; pairs for enrollments not
/// in `roster` are ignored. Students without attendance keep an empty list.
pub fn student_rows(
    roster: Vec<RosterEntry>,
    attendance: &[(String, NaiveDate)],
) -> Vec<StudentAttendanceRow> {
    let mut days: HashMap<&str, BTreeSet<NaiveDate>> = HashMap::new();
    for (enrollment_id, day) in attendance {
        days.entry(enrollment_id.as_str()).or_default().insert(*day);
    }

    roster
        .into_iter()
        .map(|entry| {
            let days_attended: Vec<NaiveDate> = days
                .get(entry.enrollment_id.as_str())
                .map(|set| set.iter().copied().collect())
                .unwrap_or_default();
            StudentAttendanceRow {
                total_days_attended: days_attended.len(),
                days_attended,
                student: entry.student,
                enrollment_id: entry.enrollment_id,
                enrollment_date: entry.enrolled_at,
                is_walk_in: entry.is_walk_in,
            }
        })
        .collect()
}

pub fn batch_summary(batch: &Batch, total_students: usize, total_attendance: usize) -> BatchSummary {
    let possible_attendance = total_students * batch.demo_dates.len();
    BatchSummary {
        batch_id: batch.batch_id.clone(),
        description: batch.description.clone(),
        total_students,
        total_attendance,
        possible_attendance,
        attendance_percentage: attendance_percentage(total_attendance, possible_attendance),
    }
}

/// Chart-ready arrays plus the detailed rows, in the order given.
pub fn all_batches(detailed_stats: Vec<BatchSummary>) -> AllBatchesStats {
    AllBatchesStats {
        batch_ids: detailed_stats.iter().map(|s| s.batch_id.clone()).collect(),
        average_attendance_percentages: detailed_stats
            .iter()
            .map(|s| s.attendance_percentage)
            .collect(),
        detailed_stats,
    }
}
