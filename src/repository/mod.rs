//! Data access seams.
//!
//! Backend-owned data is reached through the async reader/writer traits
//! below, implemented by [`backend::BackendRepository`]. The only local state,
//! operator drafts, goes through the sync [`DraftReader`]/[`DraftWriter`]
//! pair implemented by [`DieselRepository`].

#![allow(async_fn_in_trait)]

use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::auth::LoginResponse;
use crate::domain::company::{Company, CompanyRequest};
use crate::domain::dashboard::DashboardData;
use crate::domain::draft::{NewQcDraft, QcDraft};
use crate::domain::location::{Location, LocationRequest};
use crate::domain::machine::{Machine, MachineRequest};
use crate::domain::product::{Product, ProductRequest};
use crate::domain::qc_record::{ManualResult, QcFormRecord, QcFormRecordRequest, RecordStatus};
use crate::domain::qc_template::{QcFormTemplate, QcFormTemplateRequest};
use crate::domain::system_log::SystemErrorLog;
use crate::domain::task::TaskAssignment;
use crate::domain::types::{
    CompanyId, LocationId, MachineId, ProductId, RecordId, RejectionReason, TemplateId, UserId,
};
use crate::domain::user::{User, UserRequest};
use crate::repository::errors::RepositoryResult;

#[cfg(feature = "server")]
pub mod backend;
pub mod draft;
#[cfg(feature = "server")]
pub mod machine;
#[cfg(feature = "server")]
pub mod master_data;
pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
#[cfg(feature = "server")]
pub mod qc_record;
#[cfg(feature = "server")]
pub mod qc_template;
#[cfg(feature = "server")]
pub mod reports;
#[cfg(feature = "server")]
pub mod user;

#[cfg(feature = "server")]
pub use backend::BackendRepository;

/// Diesel-backed store for local operator drafts.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

/// Filters for `GET /qc-templates`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateListQuery {
    pub search: Option<String>,
    pub machine_id: Option<MachineId>,
}

impl TemplateListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Templates attached to a machine (`/qc-templates/machine/{id}`).
    pub fn machine(mut self, machine_id: MachineId) -> Self {
        self.machine_id = Some(machine_id);
        self
    }
}

/// Which record collection to read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordListQuery {
    pub status: Option<RecordStatus>,
    pub mine: bool,
}

impl RecordListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in a given status (`/qc-records/status/{status}`).
    pub fn status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Records filled by the caller (`/qc-records/my`).
    pub fn mine(mut self) -> Self {
        self.mine = true;
        self
    }
}

pub trait AuthGateway {
    async fn login(&self, username: &str, password: &str) -> RepositoryResult<LoginResponse>;
    async fn current_user(&self) -> RepositoryResult<User>;
}

pub trait CompanyReader {
    async fn list_companies(&self) -> RepositoryResult<Vec<Company>>;
    async fn get_company_by_id(&self, id: CompanyId) -> RepositoryResult<Option<Company>>;
}

pub trait CompanyWriter {
    async fn create_company(&self, request: &CompanyRequest) -> RepositoryResult<Company>;
    async fn update_company(
        &self,
        id: CompanyId,
        request: &CompanyRequest,
    ) -> RepositoryResult<Company>;
    async fn delete_company(&self, id: CompanyId) -> RepositoryResult<()>;
}

pub trait LocationReader {
    async fn list_locations(&self) -> RepositoryResult<Vec<Location>>;
    async fn get_location_by_id(&self, id: LocationId) -> RepositoryResult<Option<Location>>;
}

pub trait LocationWriter {
    async fn create_location(&self, request: &LocationRequest) -> RepositoryResult<Location>;
    async fn update_location(
        &self,
        id: LocationId,
        request: &LocationRequest,
    ) -> RepositoryResult<Location>;
    async fn delete_location(&self, id: LocationId) -> RepositoryResult<()>;
}

pub trait MachineReader {
    async fn list_machines(&self) -> RepositoryResult<Vec<Machine>>;
    async fn get_machine_by_id(&self, id: MachineId) -> RepositoryResult<Option<Machine>>;
}

pub trait MachineWriter {
    async fn create_machine(&self, request: &MachineRequest) -> RepositoryResult<Machine>;
    async fn update_machine(
        &self,
        id: MachineId,
        request: &MachineRequest,
    ) -> RepositoryResult<Machine>;
    async fn set_maintenance_mode(&self, id: MachineId, enabled: bool)
    -> RepositoryResult<Machine>;
    async fn delete_machine(&self, id: MachineId) -> RepositoryResult<()>;
}

pub trait ProductReader {
    async fn list_products(&self) -> RepositoryResult<Vec<Product>>;
    async fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
}

pub trait ProductWriter {
    async fn create_product(&self, request: &ProductRequest) -> RepositoryResult<Product>;
    async fn update_product(
        &self,
        id: ProductId,
        request: &ProductRequest,
    ) -> RepositoryResult<Product>;
    async fn delete_product(&self, id: ProductId) -> RepositoryResult<()>;
}

pub trait UserReader {
    async fn list_users(&self) -> RepositoryResult<Vec<User>>;
    async fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
}

pub trait UserWriter {
    async fn create_user(&self, request: &UserRequest) -> RepositoryResult<User>;
    async fn update_user(&self, id: UserId, request: &UserRequest) -> RepositoryResult<User>;
    async fn delete_user(&self, id: UserId) -> RepositoryResult<()>;
}

pub trait QcTemplateReader {
    async fn list_templates(&self, query: TemplateListQuery) -> RepositoryResult<Vec<QcFormTemplate>>;
    async fn get_template_by_id(&self, id: TemplateId) -> RepositoryResult<Option<QcFormTemplate>>;
}

pub trait QcTemplateWriter {
    async fn create_template(
        &self,
        request: &QcFormTemplateRequest,
    ) -> RepositoryResult<QcFormTemplate>;
    async fn update_template(
        &self,
        id: TemplateId,
        request: &QcFormTemplateRequest,
    ) -> RepositoryResult<QcFormTemplate>;
    async fn delete_template(&self, id: TemplateId) -> RepositoryResult<()>;
}

pub trait QcRecordReader {
    async fn list_records(&self, query: RecordListQuery) -> RepositoryResult<Vec<QcFormRecord>>;
    async fn get_record_by_id(&self, id: RecordId) -> RepositoryResult<Option<QcFormRecord>>;
}

pub trait QcRecordWriter {
    async fn create_record(&self, request: &QcFormRecordRequest) -> RepositoryResult<QcFormRecord>;
    async fn submit_record(&self, id: RecordId) -> RepositoryResult<QcFormRecord>;
    async fn approve_record(
        &self,
        id: RecordId,
        result: ManualResult,
    ) -> RepositoryResult<QcFormRecord>;
    async fn reject_record(
        &self,
        id: RecordId,
        reason: &RejectionReason,
        result: ManualResult,
    ) -> RepositoryResult<QcFormRecord>;
    async fn update_record_notes(&self, id: RecordId, notes: &str)
    -> RepositoryResult<QcFormRecord>;
    async fn delete_record(&self, id: RecordId) -> RepositoryResult<()>;
}

pub trait TaskReader {
    async fn list_active_tasks(&self, user_id: UserId) -> RepositoryResult<Vec<TaskAssignment>>;
}

pub trait DashboardReader {
    async fn dashboard_data(&self) -> RepositoryResult<DashboardData>;
}

pub trait SystemLogReader {
    async fn list_system_logs(&self) -> RepositoryResult<Vec<SystemErrorLog>>;
}

pub trait DraftReader {
    fn get_draft(&self, user_id: UserId, draft_key: &str) -> RepositoryResult<Option<QcDraft>>;
    fn list_drafts(&self, user_id: UserId) -> RepositoryResult<Vec<QcDraft>>;
}

pub trait DraftWriter {
    /// Inserts or replaces the draft stored under the same key.
    fn save_draft(&self, draft: &NewQcDraft) -> RepositoryResult<QcDraft>;
    fn delete_draft(&self, user_id: UserId, draft_key: &str) -> RepositoryResult<()>;
}
