//! Location administration.

use crate::ADMIN_ROLES;
use crate::auth::AuthenticatedUser;
use crate::domain::location::{Location, LocationRequest};
use crate::domain::types::LocationId;
use crate::dto::master_data::LocationsPageData;
use crate::forms::master_data::LocationForm;
use crate::repository::{CompanyReader, LocationReader, LocationWriter};
use crate::services::{ServiceResult, ensure_role, log_failure};

/// Loads every location once; the inactive toggle filters the loaded list.
pub async fn list_locations<R>(
    repo: &R,
    user: &AuthenticatedUser,
    show_inactive: bool,
) -> ServiceResult<LocationsPageData>
where
    R: LocationReader + CompanyReader + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let (locations, companies) = tokio::join!(repo.list_locations(), repo.list_companies());

    Ok(LocationsPageData {
        all: locations.map_err(log_failure("list locations"))?,
        companies: companies.map_err(log_failure("list companies"))?,
        show_inactive,
    })
}

pub async fn create_location<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: LocationForm,
) -> ServiceResult<Location>
where
    R: LocationWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let request = LocationRequest::try_from(form)?;

    repo.create_location(&request)
        .await
        .map_err(log_failure("create the location"))
}

pub async fn update_location<R>(
    repo: &R,
    user: &AuthenticatedUser,
    location_id: i64,
    form: LocationForm,
) -> ServiceResult<Location>
where
    R: LocationWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let location_id = LocationId::new(location_id)?;
    let request = LocationRequest::try_from(form)?;

    repo.update_location(location_id, &request)
        .await
        .map_err(log_failure("update the location"))
}

pub async fn delete_location<R>(
    repo: &R,
    user: &AuthenticatedUser,
    location_id: i64,
) -> ServiceResult<()>
where
    R: LocationWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    repo.delete_location(LocationId::new(location_id)?)
        .await
        .map_err(log_failure("delete the location"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Role;
    use crate::services::fake::{FakeBackend, FakeState, location};
    use crate::services::test_support::user;

    #[actix_web::test]
    async fn inactive_toggle_does_not_query_again() {
        let repo = FakeBackend::new(FakeState {
            locations: vec![location(1, true), location(2, false), location(3, true)],
            ..FakeState::default()
        });

        let mut page = list_locations(&repo, &user(Role::Admin), false)
            .await
            .unwrap();
        let calls_after_load = repo.calls();
        assert_eq!(page.visible().len(), 2);

        let shown = page.toggle_inactive(true);
        assert_eq!(
            shown.iter().map(|l| l.id.get()).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        let hidden = page.toggle_inactive(false);
        assert_eq!(hidden.len(), 2);

        assert_eq!(repo.calls(), calls_after_load);
        assert_eq!(
            calls_after_load
                .iter()
                .filter(|c| c.as_str() == "list_locations")
                .count(),
            1
        );
    }
}
