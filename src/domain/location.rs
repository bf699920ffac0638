//! Location master data (belongs to a company).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CompanyId, EntityCode, EntityName, LocationId};

/// Location record returned by `/locations`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    pub company_id: CompanyId,
    #[serde(default)]
    pub company_name: Option<String>,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Payload accepted by `POST /locations` and `PUT /locations/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    pub company_id: CompanyId,
    pub name: EntityName,
    pub code: EntityCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub active: bool,
}

/// Returns the rows visible for the given "show inactive" toggle.
///
/// The toggle only filters an already loaded list.
pub fn visible_locations(locations: &[Location], show_inactive: bool) -> Vec<Location> {
    locations
        .iter()
        .filter(|location| show_inactive || location.active)
        .cloned()
        .collect()
}
