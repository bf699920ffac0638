//! Page data for templates, records, approvals and the dashboard.

use crate::domain::machine::Machine;
use crate::domain::product::Product;
use crate::domain::qc_record::{QcFormRecord, RecordStatus, StepperStep};
use crate::domain::qc_template::{ControlPoint, QcFormTemplate, TemplateHeader};
use crate::domain::types::TemplateId;
use crate::pagination::Paginated;

#[derive(Debug)]
pub struct TemplatesPageData {
    pub templates: Vec<QcFormTemplate>,
    pub search: Option<String>,
}

/// State of the template builder page.
#[derive(Debug)]
pub struct BuilderPageData {
    /// `None` while creating a new template.
    pub template_id: Option<TemplateId>,
    pub header: TemplateHeader,
    pub points: Vec<ControlPoint>,
    pub products: Vec<Product>,
    pub machines: Vec<Machine>,
}

/// Result of posting the builder.
#[derive(Debug)]
pub enum BuilderOutcome {
    Saved(QcFormTemplate),
    /// Show the builder again, optionally with a message catalog key.
    Rerender {
        page: BuilderPageData,
        error: Option<&'static str>,
    },
}

#[derive(Debug)]
pub struct RecordsPageData {
    pub records: Paginated<QcFormRecord>,
    pub status: Option<RecordStatus>,
    pub search: Option<String>,
}

#[derive(Debug)]
pub struct RecordPageData {
    pub record: QcFormRecord,
    pub stepper: Vec<StepperStep>,
    pub can_review: bool,
}

#[derive(Debug)]
pub struct ApprovalPageData {
    pub records: Vec<QcFormRecord>,
}

/// A generated export ready to be sent as an attachment.
#[derive(Debug)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}
