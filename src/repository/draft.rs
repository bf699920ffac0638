//! Local draft store backed by SQLite.

use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::domain::draft::{NewQcDraft, QcDraft};
use crate::domain::types::UserId;
use crate::models::draft::{NewQcDraft as DbNewQcDraft, QcDraft as DbQcDraft};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, DraftReader, DraftWriter};

impl DraftReader for DieselRepository {
    fn get_draft(&self, user_id: UserId, key: &str) -> RepositoryResult<Option<QcDraft>> {
        use crate::schema::qc_drafts;

        let mut conn = self.conn()?;
        let db_draft = qc_drafts::table
            .filter(qc_drafts::user_id.eq(user_id.get()))
            .filter(qc_drafts::draft_key.eq(key))
            .first::<DbQcDraft>(&mut conn)
            .optional()?;

        match db_draft {
            Some(db_draft) => Ok(Some(
                QcDraft::try_from(db_draft).map_err(RepositoryError::from)?,
            )),
            None => Ok(None),
        }
    }

    fn list_drafts(&self, user_id: UserId) -> RepositoryResult<Vec<QcDraft>> {
        use crate::schema::qc_drafts;

        let mut conn = self.conn()?;
        let db_drafts = qc_drafts::table
            .filter(qc_drafts::user_id.eq(user_id.get()))
            .order(qc_drafts::updated_at.desc())
            .load::<DbQcDraft>(&mut conn)?;

        db_drafts
            .into_iter()
            .map(|draft| QcDraft::try_from(draft).map_err(RepositoryError::from))
            .collect()
    }
}

impl DraftWriter for DieselRepository {
    fn save_draft(&self, draft: &NewQcDraft) -> RepositoryResult<QcDraft> {
        use crate::schema::qc_drafts;

        let mut conn = self.conn()?;
        let db_new_draft = DbNewQcDraft::try_from(draft)?;

        let db_draft = diesel::insert_into(qc_drafts::table)
            .values(&db_new_draft)
            .on_conflict((qc_drafts::user_id, qc_drafts::draft_key))
            .do_update()
            .set((
                qc_drafts::payload.eq(excluded(qc_drafts::payload)),
                qc_drafts::notes.eq(excluded(qc_drafts::notes)),
                qc_drafts::updated_at.eq(excluded(qc_drafts::updated_at)),
            ))
            .get_result::<DbQcDraft>(&mut conn)?;

        QcDraft::try_from(db_draft).map_err(RepositoryError::from)
    }

    fn delete_draft(&self, user_id: UserId, key: &str) -> RepositoryResult<()> {
        use crate::schema::qc_drafts;

        let mut conn = self.conn()?;
        diesel::delete(
            qc_drafts::table
                .filter(qc_drafts::user_id.eq(user_id.get()))
                .filter(qc_drafts::draft_key.eq(key)),
        )
        .execute(&mut conn)?;

        Ok(())
    }
}
