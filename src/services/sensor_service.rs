use serde::Deserialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{ensure_owned, ServiceError};
use crate::database::manager::DatabaseManager;
use crate::database::models::sensor::{Sensor, SensorBody, SensorKind};
use crate::domain::ownership::ResourceOwner;
use crate::domain::validation;
use crate::filter::order;
use crate::filter::pagination::{self, Paged};
use crate::filter::params::SensorListParams;

#[derive(Debug, Deserialize)]
pub struct CreateSensor {
    pub system: Uuid,
    pub kind: SensorKind,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSensor {
    pub system: Uuid,
    pub kind: SensorKind,
    pub name: String,
}

/// Sensor row joined to its system's owner for the ownership check.
#[derive(Debug, FromRow)]
struct SensorWithOwner {
    id: Uuid,
    system_id: Uuid,
    kind: SensorKind,
    name: String,
    owner_id: Uuid,
}

impl SensorWithOwner {
    fn into_sensor(self) -> Sensor {
        Sensor {
            id: self.id,
            system_id: self.system_id,
            kind: self.kind,
            name: self.name,
        }
    }
}

pub struct SensorService {
    pool: PgPool,
}

impl SensorService {
    pub async fn new() -> Result<Self, ServiceError> {
        Ok(Self { pool: DatabaseManager::pool().await? })
    }

    pub async fn list(
        &self,
        identity: Uuid,
        params: &SensorListParams,
    ) -> Result<Paged<SensorBody>, ServiceError> {
        let page = pagination::resolve(params.page, params.page_size)?;
        let order = order::parse(
            params.order.as_deref(),
            SensorListParams::ORDER_KEYS,
            SensorListParams::DEFAULT_ORDER,
        );

        // The system filter is a scoped choice: referencing another owner's
        // system is rejected outright rather than silently matching nothing.
        if let Some(system) = params.system {
            self.check_system_filter(identity, system).await?;
        }

        let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT COUNT(*) FROM sensors se JOIN systems sy ON sy.id = se.system_id \
             WHERE sy.owner_id = ",
        );
        count_qb.push_bind(identity);
        params.push_predicates(&mut count_qb);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT se.id, se.system_id, se.kind, se.name FROM sensors se \
             JOIN systems sy ON sy.id = se.system_id WHERE sy.owner_id = ",
        );
        qb.push_bind(identity);
        params.push_predicates(&mut qb);
        order::push_order(&mut qb, &order);
        page.push_limit(&mut qb);
        let rows: Vec<Sensor> = qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(Paged {
            items: rows.into_iter().map(SensorBody::from).collect(),
            pagination: page.meta(total),
        })
    }

    pub async fn create(
        &self,
        identity: Uuid,
        input: CreateSensor,
    ) -> Result<SensorBody, ServiceError> {
        let name = input.name.trim().to_string();
        validation::validate_name(&name)?;
        self.check_parent_system(identity, input.system, "cannot attach a sensor to another user's system")
            .await?;

        let sensor = sqlx::query_as::<_, Sensor>(
            "INSERT INTO sensors (system_id, kind, name) VALUES ($1, $2, $3) \
             RETURNING id, system_id, kind, name",
        )
        .bind(input.system)
        .bind(input.kind)
        .bind(&name)
        .fetch_one(&self.pool)
        .await?;

        Ok(sensor.into())
    }

    pub async fn retrieve(&self, identity: Uuid, id: Uuid) -> Result<SensorBody, ServiceError> {
        let row = self.fetch_with_owner(id).await?.ok_or(ServiceError::NotFound)?;
        ensure_owned(ResourceOwner::Sensor { system_owner: row.owner_id }, identity)?;
        Ok(row.into_sensor().into())
    }

    pub async fn update(
        &self,
        identity: Uuid,
        id: Uuid,
        input: UpdateSensor,
    ) -> Result<SensorBody, ServiceError> {
        let current = self.fetch_with_owner(id).await?.ok_or(ServiceError::NotFound)?;
        ensure_owned(ResourceOwner::Sensor { system_owner: current.owner_id }, identity)?;

        let name = input.name.trim().to_string();
        validation::validate_name(&name)?;

        // Repointing is only allowed within the caller's own systems.
        if input.system != current.system_id {
            self.check_parent_system(identity, input.system, "cannot move a sensor to another user's system")
                .await?;
        }

        let sensor = sqlx::query_as::<_, Sensor>(
            "UPDATE sensors SET system_id = $1, kind = $2, name = $3 WHERE id = $4 \
             RETURNING id, system_id, kind, name",
        )
        .bind(input.system)
        .bind(input.kind)
        .bind(&name)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(sensor.into())
    }

    pub async fn delete(&self, identity: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let current = self.fetch_with_owner(id).await?.ok_or(ServiceError::NotFound)?;
        ensure_owned(ResourceOwner::Sensor { system_owner: current.owner_id }, identity)?;

        // Measurements go with the sensor (FK cascade).
        sqlx::query("DELETE FROM sensors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn fetch_with_owner(&self, id: Uuid) -> Result<Option<SensorWithOwner>, ServiceError> {
        let row = sqlx::query_as::<_, SensorWithOwner>(
            "SELECT se.id, se.system_id, se.kind, se.name, sy.owner_id FROM sensors se \
             JOIN systems sy ON sy.id = se.system_id WHERE se.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn system_owner(&self, system: Uuid) -> Result<Option<Uuid>, ServiceError> {
        let owner = sqlx::query_scalar("SELECT owner_id FROM systems WHERE id = $1")
            .bind(system)
            .fetch_optional(&self.pool)
            .await?;
        Ok(owner)
    }

    /// Create/update parent check: a missing or foreign system is Forbidden,
    /// since the caller supplied the id rather than probing for it.
    async fn check_parent_system(
        &self,
        identity: Uuid,
        system: Uuid,
        denial: &str,
    ) -> Result<(), ServiceError> {
        let owner = self.system_owner(system).await?;
        let owned = matches!(owner, Some(o) if (ResourceOwner::System { owner: o }).owned_by(identity));
        if !owned {
            return Err(ServiceError::Forbidden(denial.to_string()));
        }
        Ok(())
    }

    /// Filter-value check: the `system` query parameter must name one of the
    /// caller's own systems.
    async fn check_system_filter(&self, identity: Uuid, system: Uuid) -> Result<(), ServiceError> {
        let owner = self.system_owner(system).await?;
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
