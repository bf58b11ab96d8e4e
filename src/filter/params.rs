//! Typed list-endpoint parameters. Each struct enumerates exactly the
//! filters a resource supports; `push_predicates` appends the matching SQL
//! conditions to a query whose WHERE clause already anchors the owner scope.
//! Query aliases are fixed per resource: systems `s`, sensors `se` joined to
//! systems `sy`, measurements `m` joined to sensors `se` and systems `sy`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::contains_pattern;
use crate::database::models::sensor::SensorKind;

#[derive(Debug, Default, Deserialize)]
pub struct SystemListParams {
    pub name: Option<String>,
    pub name_contains: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub order: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl SystemListParams {
    pub const ORDER_KEYS: &'static [(&'static str, &'static str)] =
        &[("name", "s.name"), ("created_at", "s.created_at")];
    pub const DEFAULT_ORDER: &'static str = "-created_at";

    pub fn push_predicates(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(name) = &self.name {
            qb.push(" AND s.name = ");
            qb.push_bind(name.clone());
        }
        if let Some(fragment) = &self.name_contains {
            qb.push(" AND s.name ILIKE ");
            qb.push_bind(contains_pattern(fragment));
        }
        if let Some(after) = self.created_after {
            qb.push(" AND s.created_at >= ");
            qb.push_bind(after);
        }
        if let Some(before) = self.created_before {
            qb.push(" AND s.created_at <= ");
            qb.push_bind(before);
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SensorListParams {
    /// Target system id; must be owned by the caller (checked by the service
    /// before the query is built).
    pub system: Option<Uuid>,
    pub system_name: Option<String>,
    pub system_name_contains: Option<String>,
    pub kind: Option<SensorKind>,
    pub name_contains: Option<String>,
    pub order: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl SensorListParams {
    pub const ORDER_KEYS: &'static [(&'static str, &'static str)] = &[
        ("name", "se.name"),
        ("kind", "se.kind"),
        ("system", "se.system_id"),
        ("system_name", "sy.name"),
    ];
    pub const DEFAULT_ORDER: &'static str = "name";

    pub fn push_predicates(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(system) = self.system {
            qb.push(" AND se.system_id = ");
            qb.push_bind(system);
        }
        if let Some(system_name) = &self.system_name {
            qb.push(" AND sy.name = ");
            qb.push_bind(system_name.clone());
        }
        if let Some(fragment) = &self.system_name_contains {
            qb.push(" AND sy.name ILIKE ");
            qb.push_bind(contains_pattern(fragment));
        }
        if let Some(kind) = self.kind {
            qb.push(" AND se.kind = ");
            qb.push_bind(kind);
        }
        if let Some(fragment) = &self.name_contains {
            qb.push(" AND se.name ILIKE ");
            qb.push_bind(contains_pattern(fragment));
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MeasurementListParams {
    /// Target sensor id; must be owned by the caller (checked by the service
    /// before the query is built).
    pub sensor: Option<Uuid>,
    /// Target system id; same ownership rule as `sensor`.
    pub system: Option<Uuid>,
    pub system_name: Option<String>,
    pub system_name_contains: Option<String>,
    pub kind: Option<SensorKind>,
    pub value_min: Option<Decimal>,
    pub value_max: Option<Decimal>,
    pub measured_after: Option<DateTime<Utc>>,
    pub measured_before: Option<DateTime<Utc>>,
    pub order: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl MeasurementListParams {
    pub const ORDER_KEYS: &'static [(&'static str, &'static str)] = &[
        ("value", "m.value"),
        ("measured_at", "m.measured_at"),
        ("sensor", "m.sensor_id"),
        ("sensor_name", "se.name"),
    ];
    pub const DEFAULT_ORDER: &'static str = "-measured_at";

    pub fn push_predicates(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(sensor) = self.sensor {
            qb.push(" AND m.sensor_id = ");
            qb.push_bind(sensor);
        }
        if let Some(system) = self.system {
            qb.push(" AND se.system_id = ");
            qb.push_bind(system);
        }
        if let Some(system_name) = &self.system_name {
            qb.push(" AND sy.name = ");
            qb.push_bind(system_name.clone());
        }
        if let Some(fragment) = &self.system_name_contains {
            qb.push(" AND sy.name ILIKE ");
            qb.push_bind(contains_pattern(fragment));
        }
        if let Some(kind) = self.kind {
            qb.push(" AND se.kind = ");
            qb.push_bind(kind);
        }
        if let Some(min) = self.value_min {
            qb.push(" AND m.value >= ");
            qb.push_bind(min);
        }
        if let Some(max) = self.value_max {
            qb.push(" AND m.value <= ");
            qb.push_bind(max);
        }
        if let Some(after) = self.measured_after {
            qb.push(" AND m.measured_at >= ");
            qb.push_bind(after);
        }
        if let Some(before) = self.measured_before {
            qb.push(" AND m.measured_at <= ");
            qb.push_bind(before);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_scope_precedes_every_filter() {
        let params = SystemListParams {
            name_contains: Some("tank".to_string()),
            ..Default::default()
        };
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM systems s WHERE s.owner_id = ");
        qb.push_bind(Uuid::new_v4());
        params.push_predicates(&mut qb);

        let sql = qb.into_sql();
        let scope = sql.find("s.owner_id = $1").unwrap();
        let filter = sql.find("s.name ILIKE $2").unwrap();
        assert!(scope < filter);
    }

    #[test]
    fn absent_filters_render_no_predicates() {
        let params = SystemListParams::default();
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM systems s WHERE s.owner_id = ");
        qb.push_bind(Uuid::new_v4());
        params.push_predicates(&mut qb);
        assert_eq!(qb.into_sql(), "SELECT * FROM systems s WHERE s.owner_id = $1");
    }

    #[test]
    fn timestamp_bounds_use_inclusive_comparisons() {
        let params = SystemListParams {
            created_after: Some(Utc::now()),
            created_before: Some(Utc::now()),
            ..Default::default()
        };
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("WHERE s.owner_id = ");
        qb.push_bind(Uuid::new_v4());
        params.push_predicates(&mut qb);
        let sql = qb.into_sql();
        assert!(sql.contains("s.created_at >= $2"));
        assert!(sql.contains("s.created_at <= $3"));
    }

    #[test]
    fn sensor_filters_cover_joined_system_columns() {
        let params = SensorListParams {
            system: Some(Uuid::new_v4()),
            system_name_contains: Some("green".to_string()),
            kind: Some(SensorKind::Ph),
            name_contains: Some("probe".to_string()),
            ..Default::default()
        };
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("WHERE sy.owner_id = ");
        qb.push_bind(Uuid::new_v4());
        params.push_predicates(&mut qb);
        let sql = qb.into_sql();
        assert!(sql.contains("se.system_id = $2"));
        assert!(sql.contains("sy.name ILIKE $3"));
        assert!(sql.contains("se.kind = $4"));
        assert!(sql.contains("se.name ILIKE $5"));
    }

    #[test]
    fn measurement_value_range_binds_both_bounds() {
        let params = MeasurementListParams {
            value_min: Some(Decimal::from(2)),
            value_max: Some(Decimal::from(9)),
            ..Default::default()
        };
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("WHERE sy.owner_id = ");
        qb.push_bind(Uuid::new_v4());
        params.push_predicates(&mut qb);
        let sql = qb.into_sql();
        assert!(sql.contains("m.value >= $2"));
        assert!(sql.contains("m.value <= $3"));
    }

    #[test]
    fn order_allow_lists_reject_unknown_keys() {
        use crate::filter::order;

        let specs = order::parse(
            Some("owner_id"),
            SystemListParams::ORDER_KEYS,
            SystemListParams::DEFAULT_ORDER,
        );
        // Unknown key falls back to the default ordering, never an error.
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].column, "s.created_at");
        assert!(specs[0].descending);
    }
}
