//! User administration.

use crate::ADMIN_ROLES;
use crate::auth::AuthenticatedUser;
use crate::domain::types::UserId;
use crate::domain::user::{Role, User, filter_users};
use crate::dto::master_data::{UsersPageData, UsersQuery};
use crate::forms::FormError;
use crate::forms::users::UserForm;
use crate::repository::{MachineReader, UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult, ensure_role, log_failure};

pub async fn list_users<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: UsersQuery,
) -> ServiceResult<UsersPageData>
where
    R: UserReader + MachineReader + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let search = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let role = query
        .role
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .and_then(|r| r.parse::<Role>().ok());

    let (users, machines) = tokio::join!(repo.list_users(), repo.list_machines());
    let users = users.map_err(log_failure("list users"))?;

    Ok(UsersPageData {
        users: filter_users(&users, search.as_deref(), role),
        machines: machines.map_err(log_failure("list machines"))?,
        search,
        role,
    })
}

/// The user dialog posts repeated `machine_ids`, so the raw body is parsed here.
fn parse_form(body: &[u8]) -> ServiceResult<UserForm> {
    serde_html_form::from_bytes(body)
        .map_err(|e| ServiceError::from(FormError::Malformed(e.to_string())))
}

pub async fn create_user<R>(repo: &R, user: &AuthenticatedUser, body: &[u8]) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let request = parse_form(body)?.into_request(true)?;

    repo.create_user(&request)
        .await
        .map_err(log_failure("create the user"))
}

pub async fn update_user<R>(
    repo: &R,
    user: &AuthenticatedUser,
    user_id: i64,
    body: &[u8],
) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let user_id = UserId::new(user_id)?;
    let request = parse_form(body)?.into_request(false)?;

    repo.update_user(user_id, &request)
        .await
        .map_err(log_failure("update the user"))
}

pub async fn delete_user<R>(repo: &R, user: &AuthenticatedUser, user_id: i64) -> ServiceResult<()>
where
    R: UserWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let user_id = UserId::new(user_id)?;
    if user_id == user.user_id() {
        return Err(ServiceError::Form("user_cannot_delete_self".to_string()));
    }

    repo.delete_user(user_id)
        .await
        .map_err(log_failure("delete the user"))
}
