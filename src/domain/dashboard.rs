//! Admin dashboard aggregates.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::qc_record::{QcFormRecord, filter_pending};

/// Number of pending records listed on the dashboard.
pub const PENDING_PREVIEW: usize = 5;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub total_companies: u64,
    pub total_locations: u64,
    pub total_machines: u64,
    pub total_products: u64,
    pub total_users: u64,
    pub total_qc_templates: u64,
    pub active_tasks: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyMetric {
    pub date: String,
    pub passed: u64,
    pub failed: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct QcMetrics {
    pub total_records: u64,
    pub passed_count: u64,
    pub failed_count: u64,
    pub pass_rate: f64,
    pub weekly_trend: Vec<DailyMetric>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MachineMetrics {
    pub status_distribution: Vec<StatusCount>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPerformance {
    pub product_name: String,
    pub total_qc: u64,
    pub pass_rate: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CriticalAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub title: String,
    pub message: String,
    pub timestamp: Option<NaiveDateTime>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RecentActivity {
    pub id: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub description: String,
    pub user_name: Option<String>,
    pub timestamp: Option<NaiveDateTime>,
    pub status: Option<String>,
}

/// `GET /dashboard/data`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardData {
    pub summary: DashboardSummary,
    pub qc_metrics: QcMetrics,
    pub machine_metrics: MachineMetrics,
    pub product_performance: Vec<ProductPerformance>,
    pub alerts: Vec<CriticalAlert>,
    pub activities: Vec<RecentActivity>,
}

/// Dashboard data combined with the approval backlog.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct AdminDashboard {
    pub data: DashboardData,
    pub pending_count: usize,
    pub pending: Vec<QcFormRecord>,
}

impl DashboardData {
    /// Merges the independently fetched record list into the dashboard.
    pub fn merge(self, records: Vec<QcFormRecord>) -> AdminDashboard {
        let mut pending = filter_pending(records);
        pending.sort_by(|a, b| b.display_date().cmp(&a.display_date()));
        let pending_count = pending.len();
        pending.truncate(PENDING_PREVIEW);
        AdminDashboard {
            data: self,
            pending_count,
            pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerates_partial_payload() {
        let data: DashboardData =
            serde_json::from_str(r#"{"summary": {"totalMachines": 4}}"#).unwrap();
        assert_eq!(data.summary.total_machines, 4);
        assert!(data.alerts.is_empty());
    }

    #[test]
    fn merge_counts_all_pending_but_previews_few() {
        let records: Vec<QcFormRecord> = (1..=8)
            .map(|id| {
                serde_json::from_value(serde_json::json!({
                    "id": id,
                    "templateId": 1,
                    "status": if id % 4 == 0 { "APPROVED" } else { "SUBMITTED" },
                    "submittedAt": format!("2024-05-0{id}T10:00:00"),
                }))
                .unwrap()
            })
            .collect();

        let dashboard = DashboardData::default().merge(records);

        assert_eq!(dashboard.pending_count, 6);
        assert_eq!(dashboard.pending.len(), PENDING_PREVIEW);
        assert_eq!(dashboard.pending[0].id.get(), 7);
    }
}
