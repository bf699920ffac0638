use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Entry of `GET /system/logs`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemErrorLog {
    pub id: i64,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub source_class: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

impl SystemErrorLog {
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || [
                self.source_class.as_deref(),
                self.description.as_deref(),
                self.ip_address.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}
