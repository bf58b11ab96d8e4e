use anyhow::{Context, Result};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::hash_password;
use crate::database::manager::DatabaseManager;
use crate::database::models::sensor::SensorKind;

/// Seed two users, two systems each, and three sensors per system with one
/// measurement apiece. Safe to re-run: every step is get-or-create.
pub async fn handle() -> Result<()> {
    let pool = DatabaseManager::pool().await.context("database not configured")?;

    for (username, password) in [("user1", "pass1"), ("user2", "pass2")] {
        let user_id = get_or_create_user(&pool, username, password).await?;

        for i in 1..=2 {
            let system_name = format!("{} System{}", capitalize(username), i);
            let system_id = get_or_create_system(&pool, user_id, &system_name).await?;
            seed_sensors(&pool, system_id).await?;
        }
    }

    println!("Test data seeded successfully!");
    Ok(())
}

async fn get_or_create_user(pool: &PgPool, username: &str, password: &str) -> Result<Uuid> {
    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let id = sqlx::query_scalar(
        "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id",
    )
    .bind(username)
    .bind(hash_password(password))
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn get_or_create_system(pool: &PgPool, owner_id: Uuid, name: &str) -> Result<Uuid> {
    let existing: Option<Uuid> =
        sqlx::query_scalar("SELECT id FROM systems WHERE owner_id = $1 AND name = $2")
            .bind(owner_id)
            .bind(name)
            .fetch_optional(pool)
            .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let id = sqlx::query_scalar(
        "INSERT INTO systems (owner_id, name) VALUES ($1, $2) RETURNING id",
    )
    .bind(owner_id)
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn seed_sensors(pool: &PgPool, system_id: Uuid) -> Result<()> {
    let sensors = [
        (SensorKind::Ph, "pH Sensor"),
        (SensorKind::Temp, "Temp Sensor"),
        (SensorKind::Tds, "TDS Sensor"),
    ];

    for (kind, name) in sensors {
        let sensor_id = get_or_create_sensor(pool, system_id, kind, name).await?;

        let has_measurement: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM measurements WHERE sensor_id = $1 LIMIT 1")
                .bind(sensor_id)
                .fetch_optional(pool)
                .await?;
        if has_measurement.is_none() {
            let value = match kind {
                SensorKind::Ph => Decimal::from(7),
                _ => Decimal::from(20),
            };
            sqlx::query("INSERT INTO measurements (sensor_id, value) VALUES ($1, $2)")
                .bind(sensor_id)
                .bind(value)
                .execute(pool)
                .await?;
        }
    }
    Ok(())
}

async fn get_or_create_sensor(
    pool: &PgPool,
    system_id: Uuid,
    kind: SensorKind,
    name: &str,
) -> Result<Uuid> {
    let existing: Option<Uuid> = sqlx::query_scalar(
        "SELECT id FROM sensors WHERE system_id = $1 AND kind = $2 AND name = $3",
    )
    .bind(system_id)
    .bind(kind)
    .bind(name)
    .fetch_optional(pool)
    .await?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let id = sqlx::query_scalar(
        "INSERT INTO sensors (system_id, kind, name) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(system_id)
    .bind(kind)
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
