//! Page data for the operator console.

use serde::Serialize;

use crate::domain::draft::QcDraft;
use crate::domain::machine::Machine;
use crate::domain::qc_entry::{EntryValues, Progress, SampleSummary};
use crate::domain::qc_record::QcFormRecord;
use crate::domain::qc_template::{QcFormSection, QcFormTemplate};
use crate::domain::task::{TaskAssignment, TimeInfo};
use crate::pagination::Paginated;

/// A task with its countdown as of the request time.
#[derive(Clone, Debug, Serialize)]
pub struct TaskCard {
    pub task: TaskAssignment,
    pub time: TimeInfo,
}

#[derive(Debug)]
pub struct OperatorDashboardData {
    pub tasks: Vec<TaskCard>,
    pub machines: Vec<Machine>,
    pub drafts: Vec<QcDraft>,
}

#[derive(Debug)]
pub struct MachineTemplatesData {
    pub machine: Machine,
    pub templates: Vec<QcFormTemplate>,
}

/// A repeating section with the sample currently shown.
#[derive(Clone, Debug, Serialize)]
pub struct SampleGrid {
    pub section: QcFormSection,
    pub samples: Vec<SampleSummary>,
    pub current: u32,
}

#[derive(Debug)]
pub struct EntryPageData {
    pub template: QcFormTemplate,
    pub machine: Machine,
    pub task: Option<TaskCard>,
    pub plain_sections: Vec<QcFormSection>,
    pub grids: Vec<SampleGrid>,
    pub values: EntryValues,
    pub notes: Option<String>,
    pub progress: Progress,
    pub has_draft: bool,
}

impl EntryPageData {
    /// Whether the task window, grace included, is still open. Late entries
    /// may still be submitted; the backend has the final word.
    pub fn window_open(&self) -> bool {
        self.task
            .as_ref()
            .is_none_or(|card| card.time.state.can_start())
    }
}

/// Result of posting the entry form.
#[derive(Debug)]
pub enum EntryOutcome {
    DraftSaved { sample: Option<u32> },
    /// The backend accepted the record. `missing` lists required fields
    /// left empty and `late` is set when the task window had closed.
    Submitted {
        record: QcFormRecord,
        missing: Vec<String>,
        late: bool,
    },
}

#[derive(Debug)]
pub struct HistoryPageData {
    pub records: Paginated<QcFormRecord>,
}
