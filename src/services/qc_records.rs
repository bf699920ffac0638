//! Record list, detail page and exports.

use chrono::Local;

use crate::auth::AuthenticatedUser;
use crate::domain::preferences::Language;
use crate::domain::qc_record::{QcFormRecord, search_records};
use crate::domain::types::RecordId;
use crate::dto::qc::{ExportFile, RecordPageData, RecordsPageData};
use crate::export::{self, csv::records_csv, pdf};
use crate::forms::qc_record::RecordListParams;
use crate::i18n::translate;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{QcRecordReader, QcRecordWriter, RecordListQuery};
use crate::services::{ServiceError, ServiceResult, ensure_role, log_failure};
use crate::{ADMIN_ROLES, CONSOLE_ROLES};

const PDF: &str = "application/pdf";
const CSV: &str = "text/csv; charset=utf-8";

/// Records matching the status filter and search term, newest first.
async fn filtered_records<R>(repo: &R, params: &RecordListParams) -> ServiceResult<Vec<QcFormRecord>>
where
    R: QcRecordReader + ?Sized,
{
    let query = match params.status() {
        Some(status) => RecordListQuery::new().status(status),
        None => RecordListQuery::new(),
    };
    let records = repo
        .list_records(query)
        .await
        .map_err(log_failure("list records"))?;

    let mut records = search_records(records, params.search());
    records.sort_by(|a, b| b.display_date().cmp(&a.display_date()));
    Ok(records)
}

pub async fn list_records<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: &RecordListParams,
) -> ServiceResult<RecordsPageData>
where
    R: QcRecordReader + ?Sized,
{
    ensure_role(user, CONSOLE_ROLES)?;

    let records = filtered_records(repo, params).await?;

    Ok(RecordsPageData {
        records: Paginated::from_items(
            records,
            params.page.unwrap_or(1),
            DEFAULT_ITEMS_PER_PAGE,
        ),
        status: params.status(),
        search: params.search().map(str::to_string),
    })
}

async fn load_record<R>(repo: &R, record_id: i64) -> ServiceResult<QcFormRecord>
where
    R: QcRecordReader + ?Sized,
{
    repo.get_record_by_id(RecordId::new(record_id)?)
        .await
        .map_err(log_failure("load the record"))?
        .ok_or(ServiceError::NotFound)
}

pub async fn record_detail<R>(
    repo: &R,
    user: &AuthenticatedUser,
    record_id: i64,
) -> ServiceResult<RecordPageData>
where
    R: QcRecordReader + ?Sized,
{
    ensure_role(user, CONSOLE_ROLES)?;

    let record = load_record(repo, record_id).await?;
    Ok(RecordPageData {
        stepper: record.status.stepper(),
        can_review: record.status.is_reviewable(),
        record,
    })
}

/// The filtered list (every page) as CSV.
pub async fn export_records_csv<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: &RecordListParams,
    lang: Language,
) -> ServiceResult<ExportFile>
where
    R: QcRecordReader + ?Sized,
{
    ensure_role(user, CONSOLE_ROLES)?;

    let records = filtered_records(repo, params).await?;
    let bytes = records_csv(&records, lang).map_err(|e| {
        log::error!("Failed to export records as CSV: {e}");
        ServiceError::Internal(e.to_string())
    })?;

    Ok(ExportFile {
        file_name: export::list_file_name(
            translate(lang, "records_report_title"),
            Local::now().date_naive(),
            "csv",
        ),
        content_type: CSV,
        bytes,
    })
}

/// The filtered list (every page) as a landscape PDF.
pub async fn export_records_pdf<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: &RecordListParams,
    lang: Language,
) -> ServiceResult<ExportFile>
where
    R: QcRecordReader + ?Sized,
{
    ensure_role(user, CONSOLE_ROLES)?;

    let records = filtered_records(repo, params).await?;
    let bytes = pdf::records_list_pdf(&records, lang).map_err(|e| {
        log::error!("Failed to export records as PDF: {e}");
        ServiceError::Internal(e.to_string())
    })?;

    Ok(ExportFile {
        file_name: export::list_file_name(
            translate(lang, "records_report_title"),
            Local::now().date_naive(),
            "pdf",
        ),
        content_type: PDF,
        bytes,
    })
}

pub async fn export_record_pdf<R>(
    repo: &R,
    user: &AuthenticatedUser,
    record_id: i64,
    lang: Language,
) -> ServiceResult<ExportFile>
where
    R: QcRecordReader + ?Sized,
{
    ensure_role(user, CONSOLE_ROLES)?;

    let record = load_record(repo, record_id).await?;
    let bytes = pdf::record_pdf(&record, lang).map_err(|e| {
        log::error!("Failed to export record {}: {e}", record.id);
        ServiceError::Internal(e.to_string())
    })?;

    Ok(ExportFile {
        file_name: export::record_file_name(translate(lang, "record_report_title"), &record),
        content_type: PDF,
        bytes,
    })
}

pub async fn delete_record<R>(
    repo: &R,
    user: &AuthenticatedUser,
    record_id: i64,
) -> ServiceResult<()>
where
    R: QcRecordWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let id = RecordId::new(record_id)?;
    repo.delete_record(id)
        .await
        .map_err(log_failure("delete the record"))?;
    log::info!("Record {id} deleted by {}", user.username);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::qc_record::RecordStatus;
    use crate::domain::user::Role;
    use crate::services::fake::{FakeBackend, FakeState, record};
    use crate::services::test_support::user;

    fn backend() -> FakeBackend {
        let mut records: Vec<QcFormRecord> = (1..=25)
            .map(|id| record(id, RecordStatus::Approved))
            .collect();
        records.push(record(26, RecordStatus::Submitted));
        FakeBackend::new(FakeState {
            records,
            ..FakeState::default()
        })
    }

    #[actix_web::test]
    async fn lists_newest_first_with_pages() {
        let repo = backend();
        let params = RecordListParams {
            page: Some(2),
            ..RecordListParams::default()
        };

        let page = list_records(&repo, &user(Role::Supervisor), &params)
            .await
            .unwrap();

        assert_eq!(page.records.total, 26);
        assert_eq!(page.records.page, 2);
        assert_eq!(page.records.items.len(), 6);
        assert_eq!(page.records.items[0].id.get(), 6);
    }

    #[actix_web::test]
    async fn filters_by_status_and_search() {
        let repo = backend();
        let params = RecordListParams {
            status: Some("APPROVED".to_string()),
            search: Some("qc-12".to_string()),
            page: None,
        };

        let page = list_records(&repo, &user(Role::Admin), &params).await.unwrap();

        assert_eq!(page.status, Some(RecordStatus::Approved));
        assert_eq!(page.records.items.len(), 1);
        assert_eq!(page.records.items[0].id.get(), 12);
    }

    #[actix_web::test]
    async fn detail_offers_review_only_for_submitted() {
        let repo = backend();
        let supervisor = user(Role::Supervisor);

        assert!(record_detail(&repo, &supervisor, 26).await.unwrap().can_review);
        assert!(!record_detail(&repo, &supervisor, 3).await.unwrap().can_review);
        assert!(matches!(
            record_detail(&repo, &supervisor, 99).await,
            Err(ServiceError::NotFound)
        ));
    }

    #[actix_web::test]
    async fn exports_carry_dated_file_names() {
        let repo = backend();
        let admin = user(Role::Admin);
        let params = RecordListParams::default();

        let csv = export_records_csv(&repo, &admin, &params, Language::En)
            .await
            .unwrap();
        assert!(csv.file_name.ends_with(".csv"));
        assert_eq!(String::from_utf8(csv.bytes).unwrap().lines().count(), 27);

        let single = export_record_pdf(&repo, &admin, 12, Language::En)
            .await
            .unwrap();
        assert!(single.file_name.contains("_#12_QC-12"));
        assert!(single.bytes.starts_with(b"%PDF"));
    }

    #[actix_web::test]
    async fn operators_cannot_browse_records() {
        let repo = backend();
        let result = list_records(&repo, &user(Role::Operator), &RecordListParams::default()).await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
        assert!(repo.calls().is_empty());
    }

    #[actix_web::test]
    async fn only_admins_delete() {
        let repo = backend();
        assert!(matches!(
            delete_record(&repo, &user(Role::Supervisor), 1).await,
            Err(ServiceError::Unauthorized)
        ));
        delete_record(&repo, &user(Role::Admin), 1).await.unwrap();
        assert_eq!(repo.with(|s| s.records.len()), 25);
    }
}
