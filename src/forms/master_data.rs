//! Forms for companies, locations, machines and products.

use serde::Deserialize;
use validator::Validate;

use crate::domain::company::CompanyRequest;
use crate::domain::location::LocationRequest;
use crate::domain::machine::MachineRequest;
use crate::domain::product::ProductRequest;
use crate::domain::types::{EntityCode, EntityName};
use crate::forms::{FormError, checkbox, optional_text, parse_id};

fn name(raw: &str) -> Result<EntityName, FormError> {
    EntityName::new(raw).map_err(|_| FormError::Required("name"))
}

fn code(raw: &str) -> Result<EntityCode, FormError> {
    if raw.trim().is_empty() {
        return Err(FormError::Required("code"));
    }
    EntityCode::new(raw).map_err(|source| FormError::Invalid {
        field: "code",
        source,
    })
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CompanyForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub code: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub active: Option<String>,
}

impl TryFrom<CompanyForm> for CompanyRequest {
    type Error = FormError;

    fn try_from(form: CompanyForm) -> Result<Self, Self::Error> {
        Ok(Self {
            name: name(&form.name)?,
            code: code(&form.code)?,
            active: checkbox(&form.active),
            logo: optional_text(form.logo),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct LocationForm {
    #[validate(length(min = 1))]
    pub company_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub code: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub active: Option<String>,
}

impl TryFrom<LocationForm> for LocationRequest {
    type Error = FormError;

    fn try_from(form: LocationForm) -> Result<Self, Self::Error> {
        Ok(Self {
            company_id: parse_id("company_id", &form.company_id)?,
            name: name(&form.name)?,
            code: code(&form.code)?,
            address: optional_text(form.address),
            active: checkbox(&form.active),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct MachineForm {
    #[validate(length(min = 1))]
    pub location_id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub code: String,
    #[serde(default)]
    pub machine_type: Option<String>,
    #[serde(default)]
    pub active: Option<String>,
    #[serde(default)]
    pub maintenance_mode: Option<String>,
}

impl TryFrom<MachineForm> for MachineRequest {
    type Error = FormError;

    fn try_from(form: MachineForm) -> Result<Self, Self::Error> {
        Ok(Self {
            location_id: parse_id("location_id", &form.location_id)?,
            code: code(&form.code)?,
            name: name(&form.name)?,
            machine_type: optional_text(form.machine_type),
            active: checkbox(&form.active),
            maintenance_mode: checkbox(&form.maintenance_mode),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub active: Option<String>,
}

impl TryFrom<ProductForm> for ProductRequest {
    type Error = FormError;

    fn try_from(form: ProductForm) -> Result<Self, Self::Error> {
        Ok(Self {
            name: name(&form.name)?,
            code: code(&form.code)?,
            description: optional_text(form.description),
            active: checkbox(&form.active),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_requires_name_and_code() {
        let form = CompanyForm {
            name: "   ".to_string(),
            code: "ACME".to_string(),
            ..CompanyForm::default()
        };
        assert!(matches!(
            CompanyRequest::try_from(form),
            Err(FormError::Required("name"))
        ));

        let form = CompanyForm {
            name: "Acme".to_string(),
            code: " ".to_string(),
            ..CompanyForm::default()
        };
        assert!(matches!(
            CompanyRequest::try_from(form),
            Err(FormError::Required("code"))
        ));
    }

    #[test]
    fn company_form_normalizes_values() {
        let form = CompanyForm {
            name: " Acme Metal ".to_string(),
            code: "acme".to_string(),
            logo: Some("  ".to_string()),
            active: Some("on".to_string()),
        };
        let request = CompanyRequest::try_from(form).unwrap();

        assert_eq!(request.name.as_str(), "Acme Metal");
        assert_eq!(request.code.as_str(), "ACME");
        assert_eq!(request.logo, None);
        assert!(request.active);
    }

    #[test]
    fn location_requires_company() {
        let form = LocationForm {
            company_id: "".to_string(),
            name: "Hall A".to_string(),
            code: "HA".to_string(),
            ..LocationForm::default()
        };
        assert!(matches!(
            LocationRequest::try_from(form),
            Err(FormError::InvalidId("company_id"))
        ));
    }

    #[test]
    fn machine_form_maps_flags() {
        let form = MachineForm {
            location_id: "3".to_string(),
            name: "Press".to_string(),
            code: "PR-1".to_string(),
            machine_type: Some("PRESS".to_string()),
            active: Some("on".to_string()),
            maintenance_mode: None,
        };
        let request = MachineRequest::try_from(form).unwrap();

        assert_eq!(request.location_id.get(), 3);
        assert!(request.active);
        assert!(!request.maintenance_mode);
    }
}
