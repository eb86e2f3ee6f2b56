use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One rating of a collaborator for a finished job. At most one row per
/// (job, reviewer, reviewee) triple.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Review {
    pub id: Uuid,
    pub job_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub rating: i32,
    pub feedback: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
