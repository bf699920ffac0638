use reqwest::Method;

use crate::domain::qc_template::{QcFormTemplate, QcFormTemplateRequest};
use crate::domain::types::TemplateId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{BackendRepository, QcTemplateReader, QcTemplateWriter, TemplateListQuery};

impl QcTemplateReader for BackendRepository {
    async fn list_templates(&self, query: TemplateListQuery) -> RepositoryResult<Vec<QcFormTemplate>> {
        let request = match query.machine_id {
            Some(machine_id) => {
                self.request(Method::GET, &format!("/qc-templates/machine/{machine_id}"))
            }
            None => self.request(Method::GET, "/qc-templates"),
        };
        let request = match query.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => request.query(&[("search", term)]),
            _ => request,
        };
        self.send(request).await
    }

    async fn get_template_by_id(&self, id: TemplateId) -> RepositoryResult<Option<QcFormTemplate>> {
        self.find(&format!("/qc-templates/{id}")).await
    }
}

impl QcTemplateWriter for BackendRepository {
    async fn create_template(
        &self,
        request: &QcFormTemplateRequest,
    ) -> RepositoryResult<QcFormTemplate> {
        self.post("/qc-templates", request).await
    }

    async fn update_template(
        &self,
        id: TemplateId,
        request: &QcFormTemplateRequest,
    ) -> RepositoryResult<QcFormTemplate> {
        self.put(&format!("/qc-templates/{id}"), request).await
    }

    async fn delete_template(&self, id: TemplateId) -> RepositoryResult<()> {
        self.delete(&format!("/qc-templates/{id}")).await
    }
}
