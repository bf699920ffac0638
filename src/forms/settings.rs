use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PreferencesForm {
    pub language: Option<String>,
    pub theme: Option<String>,
    #[serde(default)]
    pub sidebar_collapsed: Option<String>,
    /// Where to return after saving.
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DismissTourForm {
    pub page: String,
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}
