//! Company administration.

use crate::ADMIN_ROLES;
use crate::auth::AuthenticatedUser;
use crate::domain::company::{Company, CompanyRequest};
use crate::domain::types::CompanyId;
use crate::dto::master_data::CompaniesPageData;
use crate::forms::master_data::CompanyForm;
use crate::repository::{CompanyReader, CompanyWriter};
use crate::services::{ServiceResult, ensure_role, log_failure};

pub async fn list_companies<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<CompaniesPageData>
where
    R: CompanyReader + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let companies = repo
        .list_companies()
        .await
        .map_err(log_failure("list companies"))?;

    Ok(CompaniesPageData { companies })
}

/// Validates the form and creates the company.
///
/// Blank name or code is rejected before the backend is contacted.
pub async fn create_company<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CompanyForm,
) -> ServiceResult<Company>
where
    R: CompanyWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let request = CompanyRequest::try_from(form)?;

    repo.create_company(&request)
        .await
        .map_err(log_failure("create the company"))
}

pub async fn update_company<R>(
    repo: &R,
    user: &AuthenticatedUser,
    company_id: i64,
    form: CompanyForm,
) -> ServiceResult<Company>
where
    R: CompanyWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let company_id = CompanyId::new(company_id)?;
    let request = CompanyRequest::try_from(form)?;

    repo.update_company(company_id, &request)
        .await
        .map_err(log_failure("update the company"))
}

pub async fn delete_company<R>(repo: &R, user: &AuthenticatedUser, company_id: i64) -> ServiceResult<()>
where
    R: CompanyWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    repo.delete_company(CompanyId::new(company_id)?)
        .await
        .map_err(log_failure("delete the company"))
}
