use crate::model::batch::Batch;
use crate::model::student::Student;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The binding of one student to one batch, with batch and student populated.
///
/// `qr_code_data` is the opaque token printed on the demo pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: String,
    pub batch: Batch,
    pub student: Student,
    pub qr_code_data: String,
    pub is_walk_in: bool,
    pub created_at: DateTime<Utc>,
}
