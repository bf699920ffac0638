//! Signed-in user extracted from the identity cookie.
//!
//! After a successful backend login the console stores an HS256 token in the
//! identity cookie. It carries the backend bearer token, so later requests
//! can call the backend on the user's behalf without any server-side session
//! table.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{FromRequest, HttpRequest, web};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::auth::LoginResponse;
use crate::domain::types::UserId;
use crate::domain::user::Role;
use crate::models::config::ServerConfig;

/// Session lifetime used when the backend does not report one.
const DEFAULT_SESSION_MILLIS: i64 = 8 * 60 * 60 * 1000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    /// Backend user id.
    pub sub: UserId,
    pub username: String,
    pub name: String,
    pub role: Role,
    /// Backend bearer token.
    pub token: String,
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn from_login(login: &LoginResponse) -> Self {
        let lifetime = login
            .expires_in
            .filter(|millis| *millis > 0)
            .unwrap_or(DEFAULT_SESSION_MILLIS);
        let exp = Utc::now().timestamp() + lifetime / 1000;

        Self {
            sub: login.user.id,
            username: login.user.username.clone(),
            name: login.user.display_name().to_string(),
            role: login.user.role,
            token: login.token.clone(),
            exp: exp.max(0) as usize,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.sub
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

fn extract_user(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let identity = req.get_identity().map_err(ErrorUnauthorized)?;
    let token = identity.id().map_err(ErrorUnauthorized)?;
    let config = req
        .app_data::<web::Data<ServerConfig>>()
        .ok_or_else(|| ErrorInternalServerError("Server configuration is missing"))?;

    AuthenticatedUser::from_jwt(&token, &config.secret).map_err(|e| {
        log::debug!("Rejected identity token: {e}");
        ErrorUnauthorized(e)
    })
}
