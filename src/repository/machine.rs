use reqwest::Method;

use crate::domain::machine::{Machine, MachineRequest};
use crate::domain::types::MachineId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{BackendRepository, MachineReader, MachineWriter};

impl MachineReader for BackendRepository {
    async fn list_machines(&self) -> RepositoryResult<Vec<Machine>> {
        self.get("/machines").await
    }

    async fn get_machine_by_id(&self, id: MachineId) -> RepositoryResult<Option<Machine>> {
        self.find(&format!("/machines/{id}")).await
    }
}

impl MachineWriter for BackendRepository {
    async fn create_machine(&self, request: &MachineRequest) -> RepositoryResult<Machine> {
        self.post("/machines", request).await
    }

    async fn update_machine(
        &self,
        id: MachineId,
        request: &MachineRequest,
    ) -> RepositoryResult<Machine> {
        self.put(&format!("/machines/{id}"), request).await
    }

    async fn set_maintenance_mode(
        &self,
        id: MachineId,
        enabled: bool,
    ) -> RepositoryResult<Machine> {
        let request = self
            .request(Method::PATCH, &format!("/machines/{id}/maintenance"))
            .query(&[("enabled", enabled)]);
        self.send(request).await
    }

    async fn delete_machine(&self, id: MachineId) -> RepositoryResult<()> {
        self.delete(&format!("/machines/{id}")).await
    }
}
