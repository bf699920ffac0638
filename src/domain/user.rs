//! Backend users and roles.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::{Email, EntityName, MachineId, TypeConstraintError, UserId, Username};

/// Role assigned to a backend user.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Supervisor,
    Operator,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Supervisor, Role::Operator];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Supervisor => "SUPERVISOR",
            Role::Operator => "OPERATOR",
        }
    }

    /// Whether the role may open the admin console at all.
    pub fn can_review(self) -> bool {
        matches!(self, Role::Admin | Role::Supervisor)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "SUPERVISOR" => Ok(Role::Supervisor),
            "OPERATOR" => Ok(Role::Operator),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown role `{other}`"
            ))),
        }
    }
}

/// User record returned by `/users` and `/auth/me`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub active: bool,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Payload accepted by `POST /users` and `PUT /users/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub username: Username,
    /// Omitted on update to keep the current password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub email: Email,
    pub full_name: EntityName,
    pub role: Role,
    pub active: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub machine_ids: Vec<MachineId>,
}

/// Filters users by free-text search and optional role.
pub fn filter_users(users: &[User], search: Option<&str>, role: Option<Role>) -> Vec<User> {
    let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
    users
        .iter()
        .filter(|user| role.is_none_or(|role| user.role == role))
        .filter(|user| {
            needle.is_empty()
                || user.username.to_lowercase().contains(&needle)
                || user.display_name().to_lowercase().contains(&needle)
                || user
                    .email
                    .as_deref()
                    .is_some_and(|email| email.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
