use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Fixed sensor kind enumeration. Wire codes are the uppercase forms
/// ("PH", "TEMP", "TDS"); the database stores the matching Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "sensor_kind", rename_all = "lowercase")]
pub enum SensorKind {
    Ph,
    Temp,
    Tds,
}

impl SensorKind {
    pub fn label(self) -> &'static str {
        match self {
            SensorKind::Ph => "pH",
            SensorKind::Temp => "Temperature",
            SensorKind::Tds => "TDS",
        }
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Sensor {
    pub id: Uuid,
    pub system_id: Uuid,
    pub kind: SensorKind,
    pub name: String,
}

/// API representation: the raw kind code plus its human-readable label.
#[derive(Debug, Clone, Serialize)]
pub struct SensorBody {
    pub id: Uuid,
    pub system_id: Uuid,
    pub kind: SensorKind,
    pub kind_display: &'static str,
    pub name: String,
}

impl From<Sensor> for SensorBody {
    fn from(sensor: Sensor) -> Self {
        Self {
            id: sensor.id,
            system_id: sensor.system_id,
            kind: sensor.kind,
            kind_display: sensor.kind.label(),
            name: sensor.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_codes_are_uppercase() {
        assert_eq!(serde_json::to_string(&SensorKind::Ph).unwrap(), "\"PH\"");
        assert_eq!(serde_json::to_string(&SensorKind::Temp).unwrap(), "\"TEMP\"");
        assert_eq!(serde_json::to_string(&SensorKind::Tds).unwrap(), "\"TDS\"");
    }

    #[test]
    fn labels_are_human_readable() {
        assert_eq!(SensorKind::Ph.label(), "pH");
        assert_eq!(SensorKind::Temp.label(), "Temperature");
        assert_eq!(SensorKind::Tds.label(), "TDS");
    }
}
