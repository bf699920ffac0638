//! Role-checked operations behind the console pages.
//!
//! Services take the repository by trait bound, so routes pass the live
//! backend client while tests pass in-memory fakes.

use thiserror::Error;

use crate::auth::AuthenticatedUser;
use crate::domain::types::TypeConstraintError;
use crate::domain::user::Role;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod approval;
pub mod auth;
pub mod companies;
pub mod dashboard;
pub mod locations;
pub mod machines;
pub mod operator;
pub mod products;
pub mod qc_records;
pub mod qc_templates;
pub mod settings;
pub mod users;

#[cfg(test)]
pub(crate) mod fake;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// User input was rejected; the payload is a message catalog key.
    #[error("form error: {0}")]
    Form(String),

    #[error("session expired")]
    SessionExpired,

    #[error("backend unreachable: {0}")]
    Connection(String),

    #[error("repository error: {0}")]
    Repository(RepositoryError),

    #[error("type constraint: {0}")]
    TypeConstraint(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::SessionExpired => ServiceError::SessionExpired,
            RepositoryError::ConnectionError(message) => ServiceError::Connection(message),
            other => ServiceError::Repository(other),
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(err.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        log::debug!("Rejected form: {err}");
        ServiceError::Form(err.message_key().to_string())
    }
}

/// Fails with [`ServiceError::Unauthorized`] unless the user holds one of `roles`.
pub fn ensure_role(user: &AuthenticatedUser, roles: &[Role]) -> ServiceResult<()> {
    if user.has_role(roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Logs a failed backend call and converts the error.
pub(crate) fn log_failure(action: &str) -> impl FnOnce(RepositoryError) -> ServiceError + '_ {
    move |err| {
        log::error!("Failed to {action}: {err}");
        ServiceError::from(err)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::auth::AuthenticatedUser;
    use crate::domain::types::UserId;
    use crate::domain::user::Role;

    pub fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: UserId::new(7).unwrap(),
            username: "tester".to_string(),
            name: "Tester".to_string(),
            role,
            token: "token".to_string(),
            exp: usize::MAX,
        }
    }
}
