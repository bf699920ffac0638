//! Machine administration, including the maintenance switch.

use crate::ADMIN_ROLES;
use crate::auth::AuthenticatedUser;
use crate::domain::machine::{Machine, MachineRequest};
use crate::domain::types::MachineId;
use crate::dto::master_data::MachinesPageData;
use crate::forms::master_data::MachineForm;
use crate::repository::{LocationReader, MachineReader, MachineWriter};
use crate::services::{ServiceResult, ensure_role, log_failure};

pub async fn list_machines<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<MachinesPageData>
where
    R: MachineReader + LocationReader + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let (machines, locations) = tokio::join!(repo.list_machines(), repo.list_locations());

    Ok(MachinesPageData {
        machines: machines.map_err(log_failure("list machines"))?,
        locations: locations.map_err(log_failure("list locations"))?,
    })
}

pub async fn create_machine<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: MachineForm,
) -> ServiceResult<Machine>
where
    R: MachineWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let request = MachineRequest::try_from(form)?;

    repo.create_machine(&request)
        .await
        .map_err(log_failure("create the machine"))
}

pub async fn update_machine<R>(
    repo: &R,
    user: &AuthenticatedUser,
    machine_id: i64,
    form: MachineForm,
) -> ServiceResult<Machine>
where
    R: MachineWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let machine_id = MachineId::new(machine_id)?;
    let request = MachineRequest::try_from(form)?;

    repo.update_machine(machine_id, &request)
        .await
        .map_err(log_failure("update the machine"))
}

pub async fn set_maintenance<R>(
    repo: &R,
    user: &AuthenticatedUser,
    machine_id: i64,
    enabled: bool,
) -> ServiceResult<Machine>
where
    R: MachineWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let machine = repo
        .set_maintenance_mode(MachineId::new(machine_id)?, enabled)
        .await
        .map_err(log_failure("switch maintenance mode"))?;
    log::info!(
        "Machine {} maintenance mode set to {enabled} by {}",
        machine.code,
        user.username
    );
    Ok(machine)
}

pub async fn delete_machine<R>(repo: &R, user: &AuthenticatedUser, machine_id: i64) -> ServiceResult<()>
where
    R: MachineWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    repo.delete_machine(MachineId::new(machine_id)?)
        .await
        .map_err(log_failure("delete the machine"))
}
