use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{Email, EntityName, MachineId, Username};
use crate::domain::user::{Role, UserRequest};
use crate::forms::{FormError, checkbox, parse_id};

/// Posted by the user dialog; `machine_ids` may repeat.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    pub role: String,
    #[serde(default)]
    pub active: Option<String>,
    #[serde(default)]
    pub machine_ids: Vec<String>,
}

impl UserForm {
    /// Converts the form; a password is mandatory only for new users.
    pub fn into_request(self, is_new: bool) -> Result<UserRequest, FormError> {
        let password = Some(self.password.trim().to_string()).filter(|p| !p.is_empty());
        if is_new && password.is_none() {
            return Err(FormError::Required("password"));
        }
        let role: Role = self
            .role
            .parse()
            .map_err(|source| FormError::Invalid { field: "role", source })?;
        let machine_ids = self
            .machine_ids
            .iter()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_id::<MachineId>("machine_ids", raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(UserRequest {
            username: Username::new(self.username).map_err(|_| FormError::Required("username"))?,
            password,
            email: Email::new(self.email).map_err(|source| FormError::Invalid {
                field: "email",
                source,
            })?,
            full_name: EntityName::new(self.full_name)
                .map_err(|_| FormError::Required("full_name"))?,
            role,
            active: checkbox(&self.active),
            machine_ids,
        })
    }
}
