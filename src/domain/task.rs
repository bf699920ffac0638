//! Task assignments and their time windows.
//!
//! The countdown is advisory; the backend remains the authority on whether a
//! late submission is accepted.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{MachineId, ProductId, TaskId, TemplateId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskSchedule {
    #[serde(default)]
    pub id: Option<i64>,
    /// ISO weekday, Monday = 1.
    #[serde(default)]
    pub day_of_week: Option<u32>,
    #[serde(default)]
    pub specific_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TaskSchedule {
    fn applies_to(&self, date: NaiveDate) -> bool {
        self.specific_date == Some(date)
            || (self.specific_date.is_none()
                && self.day_of_week == Some(date.weekday().number_from_monday()))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignment {
    pub id: TaskId,
    pub template_id: TemplateId,
    #[serde(default)]
    pub template_name: Option<String>,
    #[serde(default)]
    pub template_code: Option<String>,
    #[serde(default, rename = "type")]
    pub task_type: Option<String>,
    #[serde(default)]
    pub machine_id: Option<MachineId>,
    #[serde(default)]
    pub machine_name: Option<String>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub schedules: Vec<TaskSchedule>,
    #[serde(default)]
    pub active: bool,
}

impl TaskAssignment {
    /// Today's window: a dated schedule wins over a weekly one.
    pub fn schedule_for(&self, date: NaiveDate) -> Option<&TaskSchedule> {
        self.schedules
            .iter()
            .find(|s| s.specific_date == Some(date))
            .or_else(|| self.schedules.iter().find(|s| s.applies_to(date)))
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskTimeState {
    Early,
    Active,
    Grace,
    Expired,
}

impl TaskTimeState {
    /// Entry is allowed until the grace period ends.
    pub fn can_start(self) -> bool {
        !matches!(self, TaskTimeState::Expired)
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TimeInfo {
    pub state: TaskTimeState,
    pub remaining_secs: Option<i64>,
    pub countdown: Option<String>,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

impl TimeInfo {
    fn new(state: TaskTimeState, remaining: Option<Duration>, schedule: Option<&TaskSchedule>) -> Self {
        let remaining_secs = remaining.map(|d| d.num_seconds().max(0));
        Self {
            state,
            remaining_secs,
            countdown: remaining_secs.map(format_countdown),
            start: schedule.map(|s| s.start_time),
            end: schedule.map(|s| s.end_time),
        }
    }

    /// Places `now` relative to today's window of the task.
    ///
    /// Before the start the task is `Early`; inside the window `Active`;
    /// up to `grace` after the end `Grace`; after that `Expired`. A task
    /// without a window today is `Active` with no countdown.
    pub fn evaluate(task: &TaskAssignment, now: NaiveDateTime, grace: Duration) -> Self {
        let Some(schedule) = task.schedule_for(now.date()) else {
            return Self::new(TaskTimeState::Active, None, None);
        };
        let start = now.date().and_time(schedule.start_time);
        let end = now.date().and_time(schedule.end_time);
        let hard_end = end + grace;

        if now < start {
            Self::new(TaskTimeState::Early, Some(start - now), Some(schedule))
        } else if now <= end {
            Self::new(TaskTimeState::Active, Some(end - now), Some(schedule))
        } else if now <= hard_end {
            Self::new(TaskTimeState::Grace, Some(hard_end - now), Some(schedule))
        } else {
            Self::new(TaskTimeState::Expired, None, Some(schedule))
        }
    }
}

/// Formats seconds as `HH:MM:SS`; hours may exceed 24.
pub fn format_countdown(secs: i64) -> String {
    let secs = secs.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(schedules: serde_json::Value) -> TaskAssignment {
        serde_json::from_value(serde_json::json!({
            "id": 1, "templateId": 2, "templateName": "Daily check", "active": true,
            "schedules": schedules
        }))
        .unwrap()
    }

    // 2024-05-15 is a Wednesday.
    fn at(time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("2024-05-15 {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn weekly() -> TaskAssignment {
        task(serde_json::json!([
            {"dayOfWeek": 3, "startTime": "08:00:00", "endTime": "10:00:00"}
        ]))
    }

    #[test]
    fn early_active_grace_expired() {
        let grace = Duration::minutes(30);

        let info = TimeInfo::evaluate(&weekly(), at("07:59:30"), grace);
        assert_eq!(info.state, TaskTimeState::Early);
        assert_eq!(info.countdown.as_deref(), Some("00:00:30"));

        let info = TimeInfo::evaluate(&weekly(), at("08:30:00"), grace);
        assert_eq!(info.state, TaskTimeState::Active);
        assert_eq!(info.countdown.as_deref(), Some("01:30:00"));

        let info = TimeInfo::evaluate(&weekly(), at("10:10:00"), grace);
        assert_eq!(info.state, TaskTimeState::Grace);
        assert_eq!(info.remaining_secs, Some(20 * 60));

        let info = TimeInfo::evaluate(&weekly(), at("10:30:01"), grace);
        assert_eq!(info.state, TaskTimeState::Expired);
        assert!(!info.state.can_start());
        assert_eq!(info.countdown, None);
    }

    #[test]
    fn no_schedule_today_is_active_without_countdown() {
        let monday_only = task(serde_json::json!([
            {"dayOfWeek": 1, "startTime": "08:00:00", "endTime": "10:00:00"}
        ]));
        let info = TimeInfo::evaluate(&monday_only, at("12:00:00"), Duration::zero());
        assert_eq!(info.state, TaskTimeState::Active);
        assert_eq!(info.countdown, None);
    }

    #[test]
    fn specific_date_wins_over_weekday() {
        let t = task(serde_json::json!([
            {"dayOfWeek": 3, "startTime": "08:00:00", "endTime": "10:00:00"},
            {"specificDate": "2024-05-15", "startTime": "13:00:00", "endTime": "14:00:00"}
        ]));
        let info = TimeInfo::evaluate(&t, at("12:00:00"), Duration::zero());
        assert_eq!(info.state, TaskTimeState::Early);
        assert_eq!(info.start, NaiveTime::from_hms_opt(13, 0, 0));
    }

    #[test]
    fn countdown_format() {
        assert_eq!(format_countdown(0), "00:00:00");
        assert_eq!(format_countdown(3661), "01:01:01");
        assert_eq!(format_countdown(-5), "00:00:00");
        assert_eq!(format_countdown(90_000), "25:00:00");
    }
}
