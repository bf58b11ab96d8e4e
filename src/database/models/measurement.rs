use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Measurement {
    pub id: Uuid,
    pub sensor_id: Uuid,
    pub value: Decimal,
    pub measured_at: DateTime<Utc>,
}
