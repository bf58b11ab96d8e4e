use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{ensure_owned, ServiceError};
use crate::database::is_unique_violation;
use crate::database::manager::DatabaseManager;
use crate::database::models::measurement::Measurement;
use crate::database::models::system::{HydroSystem, HydroSystemDetail};
use crate::domain::ownership::ResourceOwner;
use crate::domain::validation::{self, DomainError};
use crate::filter::order;
use crate::filter::pagination::{self, Paged};
use crate::filter::params::SystemListParams;

/// Column list shared by every system query; sensor ids ride along via an
/// ARRAY subselect so representations match across list/detail/update.
const SYSTEM_COLUMNS: &str = "s.id, s.name, s.description, s.owner_id, s.created_at, \
     ARRAY(SELECT id FROM sensors WHERE system_id = s.id) AS sensor_ids";

#[derive(Debug, Deserialize)]
pub struct CreateSystem {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSystem {
    pub name: String,
    pub description: Option<String>,
}

pub struct SystemService {
    pool: PgPool,
}

impl SystemService {
    pub async fn new() -> Result<Self, ServiceError> {
        Ok(Self { pool: DatabaseManager::pool().await? })
    }

    pub async fn list(
        &self,
        identity: Uuid,
        params: &SystemListParams,
    ) -> Result<Paged<HydroSystem>, ServiceError> {
        let page = pagination::resolve(params.page, params.page_size)?;
        let order = order::parse(
            params.order.as_deref(),
            SystemListParams::ORDER_KEYS,
            SystemListParams::DEFAULT_ORDER,
        );

        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM systems s WHERE s.owner_id = ");
        count_qb.push_bind(identity);
        params.push_predicates(&mut count_qb);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {} FROM systems s WHERE s.owner_id = ",
            SYSTEM_COLUMNS
        ));
        qb.push_bind(identity);
        params.push_predicates(&mut qb);
        order::push_order(&mut qb, &order);
        page.push_limit(&mut qb);
        let items: Vec<HydroSystem> = qb.build_query_as().fetch_all(&self.pool).await?;

        Ok(Paged { items, pagination: page.meta(total) })
    }

    pub async fn create(
        &self,
        identity: Uuid,
        input: CreateSystem,
    ) -> Result<HydroSystem, ServiceError> {
        let name = input.name.trim().to_string();
        validation::validate_name(&name)?;
        let conflicting = self.find_named(identity, &name).await?;
        validation::validate_unique_system_name(&name, conflicting, None)?;

        // Owner is always the acting identity; the unique constraint is the
        // backstop for concurrent creates racing the check above.
        let system = sqlx::query_as::<_, HydroSystem>(
            "INSERT INTO systems (owner_id, name, description) VALUES ($1, $2, $3) \
             RETURNING id, name, description, owner_id, created_at, ARRAY[]::uuid[] AS sensor_ids",
        )
        .bind(identity)
        .bind(&name)
        .bind(&input.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::map_name_conflict(e, &name))?;

        Ok(system)
    }

    /// Detail fetch: the system plus its 10 most recent measurements across
    /// all sensors, independent of any pagination.
    pub async fn retrieve(
        &self,
        identity: Uuid,
        id: Uuid,
    ) -> Result<HydroSystemDetail, ServiceError> {
        let system = self.fetch(id).await?.ok_or(ServiceError::NotFound)?;
        ensure_owned(ResourceOwner::System { owner: system.owner_id }, identity)?;

        let recent_measurements = sqlx::query_as::<_, Measurement>(
            "SELECT m.id, m.sensor_id, m.value, m.measured_at FROM measurements m \
             JOIN sensors se ON se.id = m.sensor_id WHERE se.system_id = $1 \
             ORDER BY m.measured_at DESC LIMIT 10",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(HydroSystemDetail { system, recent_measurements })
    }

    pub async fn update(
        &self,
        identity: Uuid,
        id: Uuid,
        input: UpdateSystem,
    ) -> Result<HydroSystem, ServiceError> {
        let current = self.fetch(id).await?.ok_or(ServiceError::NotFound)?;
        ensure_owned(ResourceOwner::System { owner: current.owner_id }, identity)?;

        let name = input.name.trim().to_string();
        validation::validate_name(&name)?;
        let conflicting = self.find_named(identity, &name).await?;
        validation::validate_unique_system_name(&name, conflicting, Some(id))?;

        sqlx::query("UPDATE systems SET name = $1, description = $2 WHERE id = $3")
            .bind(&name)
            .bind(&input.description)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::map_name_conflict(e, &name))?;

        self.fetch(id).await?.ok_or(ServiceError::NotFound)
    }

    pub async fn delete(&self, identity: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let current = self.fetch(id).await?.ok_or(ServiceError::NotFound)?;
        ensure_owned(ResourceOwner::System { owner: current.owner_id }, identity)?;

        // Sensors and their measurements go with the system (FK cascade).
        sqlx::query("DELETE FROM systems WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<HydroSystem>, ServiceError> {
        let system = sqlx::query_as::<_, HydroSystem>(&format!(
            "SELECT {} FROM systems s WHERE s.id = $1",
            SYSTEM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(system)
    }

    async fn find_named(&self, owner: Uuid, name: &str) -> Result<Option<Uuid>, ServiceError> {
        let id = sqlx::query_scalar("SELECT id FROM systems WHERE owner_id = $1 AND name = $2")
            .bind(owner)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    fn map_name_conflict(err: sqlx::Error, name: &str) -> ServiceError {
        if is_unique_violation(&err, "systems_owner_name_unique") {
            ServiceError::Domain(DomainError::DuplicateSystemName { name: name.to_string() })
        } else {
            ServiceError::Sqlx(err)
        }
    }
}
