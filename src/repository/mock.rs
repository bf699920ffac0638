//! Mock draft store for isolating services in tests.

use mockall::mock;

use crate::domain::draft::{NewQcDraft, QcDraft};
use crate::domain::types::UserId;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DraftReader, DraftWriter};

mock! {
    pub DraftStore {}

    impl DraftReader for DraftStore {
        fn get_draft(&self, user_id: UserId, draft_key: &str) -> RepositoryResult<Option<QcDraft>>;
        fn list_drafts(&self, user_id: UserId) -> RepositoryResult<Vec<QcDraft>>;
    }

    impl DraftWriter for DraftStore {
        fn save_draft(&self, draft: &NewQcDraft) -> RepositoryResult<QcDraft>;
        fn delete_draft(&self, user_id: UserId, draft_key: &str) -> RepositoryResult<()>;
    }
}
