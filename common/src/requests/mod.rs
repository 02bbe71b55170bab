//! Request payloads accepted by the API.

use crate::model::day::{deserialize_days, deserialize_optional_days};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBatchRequest {
    #[serde(default)]
    pub batch_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "deserialize_days")]
    pub demo_dates: Vec<NaiveDate>,
}

/// Partial batch update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBatchRequest {
    /// Accepted only when equal to the stored code.
    pub batch_id: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_days")]
    pub demo_dates: Option<Vec<NaiveDate>>,
}

/// Enrollment form. `batch_id` is the human batch code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    #[serde(default)]
    pub batch_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mobile_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_walk_in: bool,
}

/// What a scanner read off a demo pass.
///
/// Older passes carry the bare token; newer ones encode a JSON object naming the
/// enrollment directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScanPayload {
    Token(String),
    Enrollment {
        #[serde(rename = "enrollmentId")]
        enrollment_id: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    pub qr_code_data: ScanPayload,
}
