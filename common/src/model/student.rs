use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person who enrolled in at least one batch.
///
/// Students are keyed by mobile number: the first enrollment with an unknown
/// number creates the record, later ones reuse it. `created_at` is never
/// rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub mobile_number: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
