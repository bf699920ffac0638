//! Per-session UI preferences.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Tr,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Tr];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Tr => "tr",
        }
    }

    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("language `{value}`")))
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        match value.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(TypeConstraintError::InvalidValue(format!("theme `{other}`"))),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UiPreferences {
    pub language: Language,
    pub theme: Theme,
    pub sidebar_collapsed: bool,
    /// Pages whose onboarding tour was dismissed.
    pub dismissed_tours: BTreeSet<String>,
}

impl UiPreferences {
    pub fn show_tour(&self, page: &str) -> bool {
        !self.dismissed_tours.contains(page)
    }

    pub fn dismiss_tour(&mut self, page: &str) {
        self.dismissed_tours.insert(page.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_parsing() {
        let prefs = UiPreferences::default();
        assert_eq!(prefs.language, Language::En);
        assert_eq!(prefs.theme, Theme::Light);
        assert_eq!(Language::parse("TR"), Ok(Language::Tr));
        assert!(Theme::parse("blue").is_err());
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn tours_are_dismissed_per_page() {
        let mut prefs = UiPreferences::default();
        assert!(prefs.show_tour("dashboard"));
        prefs.dismiss_tour("dashboard");
        assert!(!prefs.show_tour("dashboard"));
        assert!(prefs.show_tour("machines"));
    }
}
