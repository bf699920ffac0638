//! Machine master data (belongs to a location).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{EntityCode, EntityName, LocationId, MachineId, UserId};

/// Live status snapshot attached to a machine by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MachineStatus {
    pub current_status: String,
    #[serde(default)]
    pub current_operator_id: Option<UserId>,
    #[serde(default)]
    pub current_operator_name: Option<String>,
    #[serde(default)]
    pub status_since: Option<NaiveDateTime>,
    #[serde(default)]
    pub estimated_finish_at: Option<NaiveDateTime>,
}

/// Machine record returned by `/machines`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: MachineId,
    pub location_id: LocationId,
    #[serde(default)]
    pub location_name: Option<String>,
    pub code: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub machine_type: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub maintenance_mode: bool,
    #[serde(default)]
    pub status: Option<MachineStatus>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Machine {
    /// Status label shown in tables; maintenance mode wins over live status.
    pub fn status_label(&self) -> &str {
        if self.maintenance_mode {
            "MAINTENANCE"
        } else {
            self.status
                .as_ref()
                .map(|status| status.current_status.as_str())
                .unwrap_or("IDLE")
        }
    }
}

/// Payload accepted by `POST /machines` and `PUT /machines/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MachineRequest {
    pub location_id: LocationId,
    pub code: EntityCode,
    pub name: EntityName,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub machine_type: Option<String>,
    pub active: bool,
    pub maintenance_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_payload() {
        let json = r#"{
            "id": 4,
            "locationId": 2,
            "locationName": "Hall A",
            "code": "CNC-4",
            "name": "CNC Lathe",
            "type": "LATHE",
            "active": true,
            "maintenanceMode": false,
            "status": {"currentStatus": "RUNNING", "currentOperatorName": "Ayse"},
            "createdAt": "2025-01-10T08:30:00"
        }"#;

        let machine: Machine = serde_json::from_str(json).unwrap();

        assert_eq!(machine.id.get(), 4);
        assert_eq!(machine.machine_type.as_deref(), Some("LATHE"));
        assert_eq!(machine.status_label(), "RUNNING");
    }

    #[test]
    fn maintenance_overrides_status() {
        let machine = Machine {
            id: MachineId::new(1).unwrap(),
            location_id: LocationId::new(1).unwrap(),
            location_name: None,
            code: "M1".to_string(),
            name: "Press".to_string(),
            machine_type: None,
            active: true,
            maintenance_mode: true,
            status: None,
            created_at: None,
            updated_at: None,
        };

        assert_eq!(machine.status_label(), "MAINTENANCE");
    }
}
