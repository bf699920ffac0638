use reqwest::Method;

use crate::domain::qc_record::{ManualResult, QcFormRecord, QcFormRecordRequest};
use crate::domain::types::{RecordId, RejectionReason};
use crate::repository::errors::RepositoryResult;
use crate::repository::{BackendRepository, QcRecordReader, QcRecordWriter, RecordListQuery};

impl QcRecordReader for BackendRepository {
    async fn list_records(&self, query: RecordListQuery) -> RepositoryResult<Vec<QcFormRecord>> {
        if query.mine {
            return self.get("/qc-records/my").await;
        }
        match query.status {
            Some(status) => self.get(&format!("/qc-records/status/{status}")).await,
            None => self.get("/qc-records").await,
        }
    }

    async fn get_record_by_id(&self, id: RecordId) -> RepositoryResult<Option<QcFormRecord>> {
        self.find(&format!("/qc-records/{id}")).await
    }
}

impl QcRecordWriter for BackendRepository {
    async fn create_record(&self, request: &QcFormRecordRequest) -> RepositoryResult<QcFormRecord> {
        self.post("/qc-records", request).await
    }

    async fn submit_record(&self, id: RecordId) -> RepositoryResult<QcFormRecord> {
        self.send(self.request(Method::POST, &format!("/qc-records/{id}/submit")))
            .await
    }

    async fn approve_record(
        &self,
        id: RecordId,
        result: ManualResult,
    ) -> RepositoryResult<QcFormRecord> {
        let request = self
            .request(Method::POST, &format!("/qc-records/{id}/approve"))
            .query(&[("result", result.as_str())]);
        self.send(request).await
    }

    async fn reject_record(
        &self,
        id: RecordId,
        reason: &RejectionReason,
        result: ManualResult,
    ) -> RepositoryResult<QcFormRecord> {
        let request = self
            .request(Method::POST, &format!("/qc-records/{id}/reject"))
            .query(&[("reason", reason.as_str()), ("result", result.as_str())]);
        self.send(request).await
    }

    async fn update_record_notes(
        &self,
        id: RecordId,
        notes: &str,
    ) -> RepositoryResult<QcFormRecord> {
        self.put_text(&format!("/qc-records/{id}/notes"), notes).await
    }

    async fn delete_record(&self, id: RecordId) -> RepositoryResult<()> {
        self.delete(&format!("/qc-records/{id}")).await
    }
}
