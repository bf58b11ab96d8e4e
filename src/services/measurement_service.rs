use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{ensure_owned, ServiceError};
use crate::database::manager::DatabaseManager;
use crate::database::models::measurement::Measurement;
use crate::database::models::sensor::SensorKind;
use crate::domain::ownership::ResourceOwner;
use crate::domain::validation;
use crate::filter::order;
use crate::filter::pagination::{self, Paged};
use crate::filter::params::MeasurementListParams;

#[derive(Debug, Deserialize)]
pub struct CreateMeasurement {
    pub sensor: Uuid,
    pub value: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMeasurement {
    pub sensor: Uuid,
    pub value: Decimal,
}

/// Measurement row joined through its sensor to the system owner.
#[derive(Debug, FromRow)]
struct MeasurementWithOwner {
    id: Uuid,
    sensor_id: Uuid,
    value: Decimal,
    measured_at: DateTime<Utc>,
    owner_id: Uuid,
}

pub struct MeasurementService {
    pool: PgPool,
}

impl MeasurementService {
    pub async fn new() -> Result<Self, ServiceError> {
        Ok(Self { pool: DatabaseManager::pool().await? })
    }

    pub async fn list(
        &self,
        identity: Uuid,
        params: &MeasurementListParams,
    ) -> Result<Paged<Measurement>, ServiceError> {
        let page = pagination::resolve(params.page, params.page_size)?;
        let order = order::parse(
            params.order.as_deref(),
            MeasurementListParams::ORDER_KEYS,
            MeasurementListParams::DEFAULT_ORDER,
        );

        // Foreign-key filter values are scoped choices: they must name the
        // caller's own sensor/system or the request is rejected.
        if let Some(sensor) = params.sensor {
            self.check_sensor_filter(identity, sensor).await?;
        }
        if let Some(system) = params.system {
            self.check_system_filter(identity, system).await?;
        }

        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM measurements m \
             JOIN sensors se ON se.id = m.sensor_id \
             JOIN systems sy ON sy.id = se.system_id WHERE sy.owner_id = ",
        );
        count_qb.push_bind(identity);
        params.push_predicates(&mut count_qb);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT m.id, m.sensor_id, m.value, m.measured_at FROM measurements m \
             JOIN sensors se ON se.id = m.sensor_id \
             JOIN systems sy ON sy.id = se.system_id WHERE sy.owner_id = ",
        );
        qb.push_bind(identity);
        params.push_predicates(&mut qb);
        order::push_order(&mut qb, &order);
        page.push_limit(&mut qb);
        let items: Vec<Measurement> = qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(Paged { items, pagination: page.meta(total) })
    }

    pub async fn create(
        &self,
        identity: Uuid,
        input: CreateMeasurement,
    ) -> Result<Measurement, ServiceError> {
        let kind = self
            .owned_sensor_kind(identity, input.sensor, "cannot record a measurement against another user's sensor")
            .await?;
        validation::validate_measurement_value(kind, input.value)?;

        // measured_at is server-assigned, never caller-supplied.
        let measurement = sqlx::query_as::<_, Measurement>(
            "INSERT INTO measurements (sensor_id, value) VALUES ($1, $2) \
             RETURNING id, sensor_id, value, measured_at",
        )
        .bind(input.sensor)
        .bind(input.value)
        .fetch_one(&self.pool)
        .await?;

        Ok(measurement)
    }

    pub async fn retrieve(&self, identity: Uuid, id: Uuid) -> Result<Measurement, ServiceError> {
        let row = self.fetch_with_owner(id).await?.ok_or(ServiceError::NotFound)?;
        ensure_owned(
            ResourceOwner::Measurement { sensor_system_owner: row.owner_id },
            identity,
        )?;
        Ok(Measurement {
            id: row.id,
            sensor_id: row.sensor_id,
            value: row.value,
            measured_at: row.measured_at,
        })
    }

    pub async fn update(
        &self,
        identity: Uuid,
        id: Uuid,
        input: UpdateMeasurement,
    ) -> Result<Measurement, ServiceError> {
        let current = self.fetch_with_owner(id).await?.ok_or(ServiceError::NotFound)?;
        ensure_owned(
            ResourceOwner::Measurement { sensor_system_owner: current.owner_id },
            identity,
        )?;

        // The target sensor (changed or not) must be the caller's own, and
        // the value is re-validated against that sensor's kind.
        let kind = self
            .owned_sensor_kind(identity, input.sensor, "cannot move a measurement to another user's sensor")
            .await?;
        validation::validate_measurement_value(kind, input.value)?;

        // measured_at stays as recorded at creation.
        let measurement = sqlx::query_as::<_, Measurement>(
            "UPDATE measurements SET sensor_id = $1, value = $2 WHERE id = $3 \
             RETURNING id, sensor_id, value, measured_at",
        )
        .bind(input.sensor)
        .bind(input.value)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(measurement)
    }

    pub async fn delete(&self, identity: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let current = self.fetch_with_owner(id).await?.ok_or(ServiceError::NotFound)?;
        ensure_owned(
            ResourceOwner::Measurement { sensor_system_owner: current.owner_id },
            identity,
        )?;

        sqlx::query("DELETE FROM measurements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn fetch_with_owner(
        &self,
        id: Uuid,
    ) -> Result<Option<MeasurementWithOwner>, ServiceError> {
        let row = sqlx::query_as::<_, MeasurementWithOwner>(
            "SELECT m.id, m.sensor_id, m.value, m.measured_at, sy.owner_id FROM measurements m \
             JOIN sensors se ON se.id = m.sensor_id \
             JOIN systems sy ON sy.id = se.system_id WHERE m.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn sensor_target(&self, sensor: Uuid) -> Result<Option<(SensorKind, Uuid)>, ServiceError> {
        let target = sqlx::query_as::<_, (SensorKind, Uuid)>(
            "SELECT se.kind, sy.owner_id FROM sensors se \
             JOIN systems sy ON sy.id = se.system_id WHERE se.id = $1",
        )
        .bind(sensor)
        .fetch_optional(&self.pool)
        .await?;
        Ok(target)
    }

    /// Resolve the referenced sensor's kind, requiring the caller to own it.
    /// Missing and foreign sensors are both Forbidden: the caller supplied
    /// the id, so there is nothing to hide.
    async fn owned_sensor_kind(
        &self,
        identity: Uuid,
        sensor: Uuid,
        denial: &str,
    ) -> Result<SensorKind, ServiceError> {
        match self.sensor_target(sensor).await? {
            Some((kind, owner))
                if (ResourceOwner::Sensor { system_owner: owner }).owned_by(identity) =>
            {
                Ok(kind)
            }
            _ => Err(ServiceError::Forbidden(denial.to_string())),
        }
    }

    async fn check_sensor_filter(&self, identity: Uuid, sensor: Uuid) -> Result<(), ServiceError> {
        let owned = matches!(
            self.sensor_target(sensor).await?,
            Some((_, owner)) if (ResourceOwner::Sensor { system_owner: owner }).owned_by(identity)
        );
        if !owned {
            return Err(ServiceError::InvalidFilter {
                field: "sensor",
                message: "sensor is not one of your sensors".to_string(),
            });
        }
        Ok(())
    }

    async fn check_system_filter(&self, identity: Uuid, system: Uuid) -> Result<(), ServiceError> {
        let owner: Option<Uuid> = sqlx::query_scalar("SELECT owner_id FROM systems WHERE id = $1")
            .bind(system)
            .fetch_optional(&self.pool)
            .await?;
        let owned = matches!(owner, Some(o) if (ResourceOwner::System { owner: o }).owned_by(identity));
        if !owned {
            return Err(ServiceError::InvalidFilter {
                field: "system",
                message: "system is not one of your systems".to_string(),
            });
        }
        Ok(())
    }
}
