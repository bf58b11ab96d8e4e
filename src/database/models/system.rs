use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::measurement::Measurement;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HydroSystem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Ids of the system's sensors, populated by an ARRAY subselect.
    pub sensor_ids: Vec<Uuid>,
}

/// Detail representation: the system plus the 10 most recent measurements
/// across all of its sensors, newest first.
#[derive(Debug, Serialize)]
pub struct HydroSystemDetail {
    #[serde(flatten)]
    pub system: HydroSystem,
    pub recent_measurements: Vec<Measurement>,
}
