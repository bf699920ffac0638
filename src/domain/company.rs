//! Company master data as mirrored from the backend.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CompanyId, EntityCode, EntityName};

/// Company record returned by `/companies`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Payload accepted by `POST /companies` and `PUT /companies/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRequest {
    pub name: EntityName,
    pub code: EntityCode,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}
