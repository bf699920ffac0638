//! In-memory backend used by the service tests.
//!
//! Every trait call is appended to `calls`, so tests can assert which
//! backend requests an operation issued.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDateTime;

use crate::domain::auth::LoginResponse;
use crate::domain::company::{Company, CompanyRequest};
use crate::domain::dashboard::DashboardData;
use crate::domain::draft::{NewQcDraft, QcDraft};
use crate::domain::location::{Location, LocationRequest};
use crate::domain::machine::{Machine, MachineRequest};
use crate::domain::product::{Product, ProductRequest};
use crate::domain::qc_entry::draft_key;
use crate::domain::qc_record::{
    ManualResult, OverallResult, QcFormRecord, QcFormRecordRequest, RecordStatus,
};
use crate::domain::qc_template::{QcFormTemplate, QcFormTemplateRequest};
use crate::domain::system_log::SystemErrorLog;
use crate::domain::task::TaskAssignment;
use crate::domain::types::{
    CompanyId, LocationId, MachineId, ProductId, RecordId, RejectionReason, TemplateId, UserId,
};
use crate::domain::user::{User, UserRequest};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    AuthGateway, CompanyReader, CompanyWriter, DashboardReader, DraftReader, DraftWriter,
    LocationReader, LocationWriter, MachineReader, MachineWriter, ProductReader, ProductWriter,
    QcRecordReader, QcRecordWriter, QcTemplateReader, QcTemplateWriter, RecordListQuery,
    SystemLogReader, TaskReader, TemplateListQuery, UserReader, UserWriter,
};

#[derive(Default)]
pub struct FakeState {
    pub companies: Vec<Company>,
    pub locations: Vec<Location>,
    pub machines: Vec<Machine>,
    pub products: Vec<Product>,
    pub users: Vec<User>,
    pub templates: Vec<QcFormTemplate>,
    pub records: Vec<QcFormRecord>,
    pub tasks: Vec<TaskAssignment>,
    pub logs: Vec<SystemErrorLog>,
    pub dashboard: DashboardData,
    pub login: Option<LoginResponse>,
    /// Status given to records created through `create_record`.
    pub created_status: Option<RecordStatus>,
    pub template_requests: Vec<QcFormTemplateRequest>,
    pub record_requests: Vec<QcFormRecordRequest>,
    pub company_requests: Vec<CompanyRequest>,
    pub notes: Vec<(RecordId, String)>,
    pub reviews: Vec<(RecordId, ManualResult, Option<String>)>,
    pub calls: Vec<String>,
    /// Fails every call with this error when set.
    pub failure: Option<fn() -> RepositoryError>,
}

#[derive(Default)]
pub struct FakeBackend {
    pub state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new(state: FakeState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn with<T>(&self, f: impl FnOnce(&mut FakeState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    fn call(&self, name: &str) -> RepositoryResult<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(name.to_string());
        match state.failure {
            Some(failure) => Err(failure()),
            None => Ok(state),
        }
    }
}

pub fn timestamp(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub fn company(id: i64, name: &str) -> Company {
    Company {
        id: CompanyId::new(id).unwrap(),
        name: name.to_string(),
        code: name.to_uppercase(),
        active: true,
        logo: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn location(id: i64, active: bool) -> Location {
    Location {
        id: LocationId::new(id).unwrap(),
        company_id: CompanyId::new(1).unwrap(),
        company_name: Some("Acme".to_string()),
        name: format!("Hall {id}"),
        code: format!("H{id}"),
        address: None,
        active,
        created_at: None,
        updated_at: None,
    }
}

pub fn machine(id: i64, active: bool, maintenance_mode: bool) -> Machine {
    Machine {
        id: MachineId::new(id).unwrap(),
        location_id: LocationId::new(1).unwrap(),
        location_name: Some("Hall 1".to_string()),
        code: format!("M-{id}"),
        name: format!("Machine {id}"),
        machine_type: None,
        active,
        maintenance_mode,
        status: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn record(id: i64, status: RecordStatus) -> QcFormRecord {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "templateId": 1,
        "templateCode": format!("QC-{id}"),
        "templateName": format!("Template {id}"),
        "machineName": "Press 1",
        "status": status.as_str(),
        "submittedAt": format!("2024-05-{:02}T10:00:00", id.clamp(1, 28)),
    }))
    .unwrap()
}

/// Template 7 with one plain section and one section repeated `repeat_count` times.
pub fn template(repeat_count: u32) -> QcFormTemplate {
    serde_json::from_value(serde_json::json!({
        "id": 7, "code": "QC-7", "name": "Shaft", "contextType": "MACHINE",
        "machineIds": [3], "active": true,
        "sections": [
            {"id": 1, "name": "Control Points", "sectionOrder": 1, "isRepeatable": false,
             "fields": [
                {"id": 10, "fieldKey": "visual", "label": "Visual", "inputType": "PASS_FAIL", "required": true}
             ]},
            {"id": 2, "name": "Repeated Controls", "sectionOrder": 2, "isRepeatable": true,
             "repeatCount": repeat_count,
             "fields": [
                {"id": 20, "fieldKey": "length", "label": "Length", "inputType": "DECIMAL",
                 "minValue": 9.5, "maxValue": 10.5, "required": true}
             ]}
        ]
    }))
    .unwrap()
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}

impl AuthGateway for FakeBackend {
    async fn login(&self, _username: &str, _password: &str) -> RepositoryResult<LoginResponse> {
        let state = self.call("login")?;
        state.login.clone().ok_or(RepositoryError::InvalidCredentials)
    }

    async fn current_user(&self) -> RepositoryResult<User> {
        let state = self.call("current_user")?;
        state
            .login
            .as_ref()
            .map(|login| login.user.clone())
            .ok_or(RepositoryError::SessionExpired)
    }
}

impl CompanyReader for FakeBackend {
    async fn list_companies(&self) -> RepositoryResult<Vec<Company>> {
        Ok(self.call("list_companies")?.companies.clone())
    }

    async fn get_company_by_id(&self, id: CompanyId) -> RepositoryResult<Option<Company>> {
        let state = self.call("get_company_by_id")?;
        Ok(state.companies.iter().find(|c| c.id == id).cloned())
    }
}

impl CompanyWriter for FakeBackend {
    async fn create_company(&self, request: &CompanyRequest) -> RepositoryResult<Company> {
        let mut state = self.call("create_company")?;
        state.company_requests.push(request.clone());
        let created = Company {
            id: CompanyId::new(next_id(state.companies.iter().map(|c| c.id.get())))?,
            name: request.name.to_string(),
            code: request.code.to_string(),
            active: request.active,
            logo: request.logo.clone(),
            created_at: None,
            updated_at: None,
        };
        state.companies.push(created.clone());
        Ok(created)
    }

    async fn update_company(
        &self,
        id: CompanyId,
        request: &CompanyRequest,
    ) -> RepositoryResult<Company> {
        let mut state = self.call("update_company")?;
        state.company_requests.push(request.clone());
        let company = state
            .companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        company.name = request.name.to_string();
        company.code = request.code.to_string();
        company.active = request.active;
        Ok(company.clone())
    }

    async fn delete_company(&self, id: CompanyId) -> RepositoryResult<()> {
        let mut state = self.call("delete_company")?;
        state.companies.retain(|c| c.id != id);
        Ok(())
    }
}

impl LocationReader for FakeBackend {
    async fn list_locations(&self) -> RepositoryResult<Vec<Location>> {
        Ok(self.call("list_locations")?.locations.clone())
    }

    async fn get_location_by_id(&self, id: LocationId) -> RepositoryResult<Option<Location>> {
        let state = self.call("get_location_by_id")?;
        Ok(state.locations.iter().find(|l| l.id == id).cloned())
    }
}

impl LocationWriter for FakeBackend {
    async fn create_location(&self, request: &LocationRequest) -> RepositoryResult<Location> {
        let mut state = self.call("create_location")?;
        let created = Location {
            id: LocationId::new(next_id(state.locations.iter().map(|l| l.id.get())))?,
            company_id: request.company_id,
            company_name: None,
            name: request.name.to_string(),
            code: request.code.to_string(),
            address: request.address.clone(),
            active: request.active,
            created_at: None,
            updated_at: None,
        };
        state.locations.push(created.clone());
        Ok(created)
    }

    async fn update_location(
        &self,
        id: LocationId,
        request: &LocationRequest,
    ) -> RepositoryResult<Location> {
        let mut state = self.call("update_location")?;
        let location = state
            .locations
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(RepositoryError::NotFound)?;
        location.name = request.name.to_string();
        location.active = request.active;
        Ok(location.clone())
    }

    async fn delete_location(&self, id: LocationId) -> RepositoryResult<()> {
        let mut state = self.call("delete_location")?;
        state.locations.retain(|l| l.id != id);
        Ok(())
    }
}

impl MachineReader for FakeBackend {
    async fn list_machines(&self) -> RepositoryResult<Vec<Machine>> {
        Ok(self.call("list_machines")?.machines.clone())
    }

    async fn get_machine_by_id(&self, id: MachineId) -> RepositoryResult<Option<Machine>> {
        let state = self.call("get_machine_by_id")?;
        Ok(state.machines.iter().find(|m| m.id == id).cloned())
    }
}

impl MachineWriter for FakeBackend {
    async fn create_machine(&self, request: &MachineRequest) -> RepositoryResult<Machine> {
        let mut state = self.call("create_machine")?;
        let mut created = machine(
            next_id(state.machines.iter().map(|m| m.id.get())),
            request.active,
            request.maintenance_mode,
        );
        created.location_id = request.location_id;
        created.code = request.code.to_string();
        created.name = request.name.to_string();
        state.machines.push(created.clone());
        Ok(created)
    }

    async fn update_machine(
        &self,
        id: MachineId,
        request: &MachineRequest,
    ) -> RepositoryResult<Machine> {
        let mut state = self.call("update_machine")?;
        let machine = state
            .machines
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(RepositoryError::NotFound)?;
        machine.name = request.name.to_string();
        machine.active = request.active;
        Ok(machine.clone())
    }

    async fn set_maintenance_mode(
        &self,
        id: MachineId,
        enabled: bool,
    ) -> RepositoryResult<Machine> {
        let mut state = self.call("set_maintenance_mode")?;
        let machine = state
            .machines
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(RepositoryError::NotFound)?;
        machine.maintenance_mode = enabled;
        Ok(machine.clone())
    }

    async fn delete_machine(&self, id: MachineId) -> RepositoryResult<()> {
        let mut state = self.call("delete_machine")?;
        state.machines.retain(|m| m.id != id);
        Ok(())
    }
}

impl ProductReader for FakeBackend {
    async fn list_products(&self) -> RepositoryResult<Vec<Product>> {
        Ok(self.call("list_products")?.products.clone())
    }

    async fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        let state = self.call("get_product_by_id")?;
        Ok(state.products.iter().find(|p| p.id == id).cloned())
    }
}

impl ProductWriter for FakeBackend {
    async fn create_product(&self, request: &ProductRequest) -> RepositoryResult<Product> {
        let mut state = self.call("create_product")?;
        let created = Product {
            id: ProductId::new(next_id(state.products.iter().map(|p| p.id.get())))?,
            name: request.name.to_string(),
            code: request.code.to_string(),
            description: request.description.clone(),
            active: request.active,
            created_at: None,
            updated_at: None,
        };
        state.products.push(created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        id: ProductId,
        request: &ProductRequest,
    ) -> RepositoryResult<Product> {
        let mut state = self.call("update_product")?;
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        product.name = request.name.to_string();
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> RepositoryResult<()> {
        let mut state = self.call("delete_product")?;
        state.products.retain(|p| p.id != id);
        Ok(())
    }
}

impl UserReader for FakeBackend {
    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.call("list_users")?.users.clone())
    }

    async fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let state = self.call("get_user_by_id")?;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }
}

impl UserWriter for FakeBackend {
    async fn create_user(&self, request: &UserRequest) -> RepositoryResult<User> {
        let mut state = self.call("create_user")?;
        let created = User {
            id: UserId::new(next_id(state.users.iter().map(|u| u.id.get())))?,
            username: request.username.to_string(),
            email: Some(request.email.to_string()),
            full_name: Some(request.full_name.to_string()),
            role: request.role,
            active: request.active,
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn update_user(&self, id: UserId, request: &UserRequest) -> RepositoryResult<User> {
        let mut state = self.call("update_user")?;
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepositoryError::NotFound)?;
        user.role = request.role;
        user.active = request.active;
        Ok(user.clone())
    }

    async fn delete_user(&self, id: UserId) -> RepositoryResult<()> {
        let mut state = self.call("delete_user")?;
        state.users.retain(|u| u.id != id);
        Ok(())
    }
}

impl QcTemplateReader for FakeBackend {
    async fn list_templates(&self, query: TemplateListQuery) -> RepositoryResult<Vec<QcFormTemplate>> {
        let state = self.call("list_templates")?;
        Ok(state
            .templates
            .iter()
            .filter(|t| query.machine_id.is_none_or(|id| t.machine_ids.contains(&id)))
            .filter(|t| query.search.as_deref().is_none_or(|term| t.matches(term)))
            .cloned()
            .collect())
    }

    async fn get_template_by_id(&self, id: TemplateId) -> RepositoryResult<Option<QcFormTemplate>> {
        let state = self.call("get_template_by_id")?;
        Ok(state.templates.iter().find(|t| t.id == id).cloned())
    }
}

impl QcTemplateWriter for FakeBackend {
    async fn create_template(
        &self,
        request: &QcFormTemplateRequest,
    ) -> RepositoryResult<QcFormTemplate> {
        let mut state = self.call("create_template")?;
        state.template_requests.push(request.clone());
        let mut created = template(1);
        created.id = TemplateId::new(next_id(state.templates.iter().map(|t| t.id.get())))?;
        created.code = request.code.to_string();
        created.name = request.name.to_string();
        state.templates.push(created.clone());
        Ok(created)
    }

    async fn update_template(
        &self,
        id: TemplateId,
        request: &QcFormTemplateRequest,
    ) -> RepositoryResult<QcFormTemplate> {
        let mut state = self.call("update_template")?;
        state.template_requests.push(request.clone());
        let template = state
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(RepositoryError::NotFound)?;
        template.name = request.name.to_string();
        Ok(template.clone())
    }

    async fn delete_template(&self, id: TemplateId) -> RepositoryResult<()> {
        let mut state = self.call("delete_template")?;
        state.templates.retain(|t| t.id != id);
        Ok(())
    }
}

impl QcRecordReader for FakeBackend {
    async fn list_records(&self, query: RecordListQuery) -> RepositoryResult<Vec<QcFormRecord>> {
        let state = self.call("list_records")?;
        Ok(state
            .records
            .iter()
            .filter(|r| query.status.is_none_or(|status| r.status == status))
            .cloned()
            .collect())
    }

    async fn get_record_by_id(&self, id: RecordId) -> RepositoryResult<Option<QcFormRecord>> {
        let state = self.call("get_record_by_id")?;
        Ok(state.records.iter().find(|r| r.id == id).cloned())
    }
}

fn find_record(state: &mut FakeState, id: RecordId) -> RepositoryResult<&mut QcFormRecord> {
    state
        .records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or(RepositoryError::NotFound)
}

impl QcRecordWriter for FakeBackend {
    async fn create_record(&self, request: &QcFormRecordRequest) -> RepositoryResult<QcFormRecord> {
        let mut state = self.call("create_record")?;
        state.record_requests.push(request.clone());
        let mut created = record(
            next_id(state.records.iter().map(|r| r.id.get())),
            state.created_status.unwrap_or(RecordStatus::Draft),
        );
        created.template_id = request.template_id;
        created.machine_id = request.machine_id;
        created.notes = request.notes.clone();
        state.records.push(created.clone());
        Ok(created)
    }

    async fn submit_record(&self, id: RecordId) -> RepositoryResult<QcFormRecord> {
        let mut state = self.call("submit_record")?;
        let record = find_record(&mut state, id)?;
        record.status = RecordStatus::Submitted;
        Ok(record.clone())
    }

    async fn approve_record(
        &self,
        id: RecordId,
        result: ManualResult,
    ) -> RepositoryResult<QcFormRecord> {
        let mut state = self.call("approve_record")?;
        state.reviews.push((id, result, None));
        let record = find_record(&mut state, id)?;
        record.status = RecordStatus::Approved;
        record.overall_result = Some(OverallResult::Pass);
        Ok(record.clone())
    }

    async fn reject_record(
        &self,
        id: RecordId,
        reason: &RejectionReason,
        result: ManualResult,
    ) -> RepositoryResult<QcFormRecord> {
        let mut state = self.call("reject_record")?;
        state.reviews.push((id, result, Some(reason.to_string())));
        let record = find_record(&mut state, id)?;
        record.status = RecordStatus::Rejected;
        record.rejection_reason = Some(reason.to_string());
        Ok(record.clone())
    }

    async fn update_record_notes(
        &self,
        id: RecordId,
        notes: &str,
    ) -> RepositoryResult<QcFormRecord> {
        let mut state = self.call("update_record_notes")?;
        state.notes.push((id, notes.to_string()));
        let record = find_record(&mut state, id)?;
        record.notes = Some(notes.to_string());
        Ok(record.clone())
    }

    async fn delete_record(&self, id: RecordId) -> RepositoryResult<()> {
        let mut state = self.call("delete_record")?;
        state.records.retain(|r| r.id != id);
        Ok(())
    }
}

impl TaskReader for FakeBackend {
    async fn list_active_tasks(&self, _user_id: UserId) -> RepositoryResult<Vec<TaskAssignment>> {
        Ok(self.call("list_active_tasks")?.tasks.clone())
    }
}

impl DashboardReader for FakeBackend {
    async fn dashboard_data(&self) -> RepositoryResult<DashboardData> {
        Ok(self.call("dashboard_data")?.dashboard.clone())
    }
}

impl SystemLogReader for FakeBackend {
    async fn list_system_logs(&self) -> RepositoryResult<Vec<SystemErrorLog>> {
        Ok(self.call("list_system_logs")?.logs.clone())
    }
}

/// Draft store keeping drafts in a map keyed by user and draft key.
#[derive(Default)]
pub struct FakeDrafts {
    pub drafts: Mutex<HashMap<(UserId, String), QcDraft>>,
}

impl DraftReader for FakeDrafts {
    fn get_draft(&self, user_id: UserId, key: &str) -> RepositoryResult<Option<QcDraft>> {
        Ok(self
            .drafts
            .lock()
            .unwrap()
            .get(&(user_id, key.to_string()))
            .cloned())
    }

    fn list_drafts(&self, user_id: UserId) -> RepositoryResult<Vec<QcDraft>> {
        Ok(self
            .drafts
            .lock()
            .unwrap()
            .values()
            .filter(|draft| draft.user_id == user_id)
            .cloned()
            .collect())
    }
}

impl DraftWriter for FakeDrafts {
    fn save_draft(&self, draft: &NewQcDraft) -> RepositoryResult<QcDraft> {
        let key = draft_key(draft.template_id, draft.machine_id);
        let mut drafts = self.drafts.lock().unwrap();
        let id = drafts.len() as i32 + 1;
        let stored = QcDraft {
            id,
            user_id: draft.user_id,
            draft_key: key.clone(),
            template_id: draft.template_id,
            machine_id: draft.machine_id,
            values: draft.values.clone(),
            notes: draft.notes.clone(),
            updated_at: draft.updated_at,
        };
        drafts.insert((draft.user_id, key), stored.clone());
        Ok(stored)
    }

    fn delete_draft(&self, user_id: UserId, key: &str) -> RepositoryResult<()> {
        self.drafts.lock().unwrap().remove(&(user_id, key.to_string()));
        Ok(())
    }
}
