//! Backend login exchange.

use serde::{Deserialize, Serialize};

use crate::domain::user::User;

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Payload of a successful `POST /auth/login`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Token lifetime in milliseconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: User,
}
