//! Sign-in against the backend.

use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::domain::user::{Role, User};
use crate::forms::auth::LoginForm;
use crate::repository::AuthGateway;
use crate::repository::errors::RepositoryError;
use crate::services::{ServiceError, ServiceResult, log_failure};

/// Exchanges credentials for a backend token.
pub async fn login<R>(repo: &R, form: LoginForm) -> ServiceResult<AuthenticatedUser>
where
    R: AuthGateway + ?Sized,
{
    form.validate()
        .map_err(|_| ServiceError::Form("form_required_fields".to_string()))?;

    match repo.login(form.username.trim(), &form.password).await {
        Ok(response) => {
            log::info!("User {} signed in", response.user.username);
            Ok(AuthenticatedUser::from_login(&response))
        }
        Err(RepositoryError::InvalidCredentials) => {
            Err(ServiceError::Form("login_invalid_credentials".to_string()))
        }
        Err(err) => Err(log_failure("sign in")(err)),
    }
}

/// Where a freshly signed-in user lands.
pub fn landing_path(user: &AuthenticatedUser) -> &'static str {
    match user.role {
        Role::Operator => "/m/",
        Role::Admin | Role::Supervisor => "/",
    }
}

/// Fresh account data of the signed-in user (`/auth/me`).
pub async fn current_user<R>(repo: &R, _user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: AuthGateway + ?Sized,
{
    repo.current_user()
        .await
        .map_err(log_failure("load the current user"))
}
