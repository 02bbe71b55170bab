use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled cohort of demo classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// Internal identifier (UUID).
    pub id: String,
    /// Human-readable code, unique across all batches. Never changes after creation.
    pub batch_id: String,
    pub description: String,
    /// Scheduled demo days, in the order the administrator entered them.
    pub demo_dates: Vec<NaiveDate>,
    pub created_at: DateTime<Utc>,
}
