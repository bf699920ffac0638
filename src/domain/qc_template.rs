//! QC form templates and the control-point builder.
//!
//! A template is authored in the admin console as a flat list of control
//! points. [`build_template_request`] turns that list into the nested
//! section/field payload the backend expects, grouping fields that share a
//! repeat count into one synthetic section.

use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::domain::types::{
    CompanyId, EntityCode, EntityName, FieldId, FieldLabel, MachineId, ProductId, SectionId,
    TemplateId, TypeConstraintError, parse_optional_number,
};

/// What a template is attached to.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContextType {
    Machine,
    #[default]
    Product,
    Process,
    General,
}

impl ContextType {
    pub const ALL: [ContextType; 4] = [
        ContextType::Machine,
        ContextType::Product,
        ContextType::Process,
        ContextType::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContextType::Machine => "MACHINE",
            ContextType::Product => "PRODUCT",
            ContextType::Process => "PROCESS",
            ContextType::General => "GENERAL",
        }
    }

    pub fn parse(value: &str) -> Result<Self, TypeConstraintError> {
        Self::ALL
            .into_iter()
            .find(|ctx| ctx.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("context type `{value}`")))
    }
}

/// Input widget of a field. Unknown backend values are preserved verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InputType {
    Number,
    Decimal,
    Boolean,
    YesNo,
    PassFail,
    Text,
    TextArea,
    Select,
    MultiSelect,
    Date,
    Time,
    DateTime,
    Photo,
    Signature,
    Other(String),
}

impl InputType {
    /// Input types offered by the template builder.
    pub const AUTHORING: [InputType; 8] = [
        InputType::Number,
        InputType::Decimal,
        InputType::Boolean,
        InputType::PassFail,
        InputType::Text,
        InputType::Select,
        InputType::Photo,
        InputType::Signature,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            InputType::Number => "NUMBER",
            InputType::Decimal => "DECIMAL",
            InputType::Boolean => "BOOLEAN",
            InputType::YesNo => "YES_NO",
            InputType::PassFail => "PASS_FAIL",
            InputType::Text => "TEXT",
            InputType::TextArea => "TEXTAREA",
            InputType::Select => "SELECT",
            InputType::MultiSelect => "MULTI_SELECT",
            InputType::Date => "DATE",
            InputType::Time => "TIME",
            InputType::DateTime => "DATETIME",
            InputType::Photo => "PHOTO",
            InputType::Signature => "SIGNATURE",
            InputType::Other(raw) => raw,
        }
    }

    /// Rendered as a yes/no (pass/fail) toggle.
    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            InputType::Boolean | InputType::YesNo | InputType::PassFail
        ) || matches!(self, InputType::Other(raw) if raw == "PASSFAIL")
    }

    /// Rendered as a numeric input checked against min/max.
    pub fn is_numeric(&self) -> bool {
        matches!(self, InputType::Number | InputType::Decimal)
            || matches!(self, InputType::Other(raw) if raw == "NUMERIC")
    }
}

impl From<String> for InputType {
    fn from(value: String) -> Self {
        match value.trim().to_uppercase().as_str() {
            "NUMBER" => InputType::Number,
            "DECIMAL" => InputType::Decimal,
            "BOOLEAN" => InputType::Boolean,
            "YES_NO" => InputType::YesNo,
            "PASS_FAIL" => InputType::PassFail,
            "TEXT" => InputType::Text,
            "TEXTAREA" => InputType::TextArea,
            "SELECT" => InputType::Select,
            "MULTI_SELECT" => InputType::MultiSelect,
            "DATE" => InputType::Date,
            "TIME" => InputType::Time,
            "DATETIME" => InputType::DateTime,
            "PHOTO" => InputType::Photo,
            "SIGNATURE" => InputType::Signature,
            other => InputType::Other(other.to_string()),
        }
    }
}

impl From<InputType> for String {
    fn from(value: InputType) -> Self {
        value.as_str().to_string()
    }
}

impl Display for InputType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits option text on newlines and commas, dropping blanks.
pub fn split_options(raw: &str) -> Vec<String> {
    raw.split(['\n', ','])
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(str::to_string)
        .collect()
}

/// The backend sends SELECT options either as a list or as raw text.
fn deserialize_options<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Options {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Option::<Options>::deserialize(deserializer)? {
        Some(Options::List(list)) => list
            .into_iter()
            .map(|option| option.trim().to_string())
            .filter(|option| !option.is_empty())
            .collect(),
        Some(Options::Text(text)) => split_options(&text),
        None => Vec::new(),
    })
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QcFormField {
    pub id: FieldId,
    pub field_key: String,
    pub label: String,
    pub input_type: InputType,
    #[serde(default)]
    pub field_order: i32,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub target_value: Option<f64>,
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "deserialize_options")]
    pub options: Vec<String>,
}

impl QcFormField {
    /// Whether a numeric reading falls outside the configured limits.
    pub fn out_of_range(&self, value: f64) -> bool {
        self.min_value.is_some_and(|min| value < min)
            || self.max_value.is_some_and(|max| value > max)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QcFormSection {
    pub id: SectionId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "displayOrder")]
    pub section_order: i32,
    #[serde(default, alias = "repeatable")]
    pub is_repeatable: bool,
    #[serde(default)]
    pub repeat_count: Option<u32>,
    #[serde(default)]
    pub fields: Vec<QcFormField>,
}

impl QcFormSection {
    /// Sections are filled per sample only when repeatable more than once.
    pub fn is_repeating(&self) -> bool {
        self.is_repeatable && self.repeat_count.is_some_and(|count| count > 1)
    }

    /// Number of samples to capture; 1 for plain sections.
    pub fn sample_count(&self) -> u32 {
        if self.is_repeating() {
            self.repeat_count.unwrap_or(1)
        } else {
            1
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QcFormTemplate {
    pub id: TemplateId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub context_type: ContextType,
    #[serde(default)]
    pub schedule_type: Option<String>,
    #[serde(default)]
    pub version: i32,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default)]
    pub allow_partial_save: bool,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub machine_ids: Vec<MachineId>,
    #[serde(default)]
    pub machine_names: Option<String>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub sections: Vec<QcFormSection>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl QcFormTemplate {
    pub fn control_point_count(&self) -> usize {
        self.sections.iter().map(|section| section.fields.len()).sum()
    }

    pub fn section(&self, id: SectionId) -> Option<&QcFormSection> {
        self.sections.iter().find(|section| section.id == id)
    }

    /// Sections rendered inline as a single form.
    pub fn plain_sections(&self) -> impl Iterator<Item = &QcFormSection> {
        self.sections.iter().filter(|section| !section.is_repeating())
    }

    /// Sections rendered as sample grids.
    pub fn repeating_sections(&self) -> impl Iterator<Item = &QcFormSection> {
        self.sections.iter().filter(|section| section.is_repeating())
    }

    /// Product or machine the template is attached to, for list views.
    pub fn subject(&self) -> &str {
        self.product_name
            .as_deref()
            .or(self.machine_names.as_deref())
            .unwrap_or("-")
    }

    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.name.to_lowercase().contains(&needle)
            || self.code.to_lowercase().contains(&needle)
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QcFormFieldRequest {
    pub field_order: i32,
    pub field_key: String,
    pub label: String,
    pub input_type: InputType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QcFormSectionRequest {
    pub section_order: i32,
    pub name: String,
    pub is_repeatable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_count: Option<u32>,
    pub fields: Vec<QcFormFieldRequest>,
}

/// Payload accepted by `POST /qc-templates` and `PUT /qc-templates/{id}`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QcFormTemplateRequest {
    pub code: EntityCode,
    pub name: EntityName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub context_type: ContextType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub machine_ids: Vec<MachineId>,
    pub requires_approval: bool,
    pub allow_partial_save: bool,
    pub active: bool,
    pub sections: Vec<QcFormSectionRequest>,
}

/// Template-level settings edited above the control point list.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct TemplateHeader {
    pub code: String,
    pub name: String,
    pub description: String,
    pub context_type: ContextType,
    pub product_id: Option<ProductId>,
    pub machine_id: Option<MachineId>,
    pub requires_approval: bool,
    pub allow_partial_save: bool,
}

/// One row of the builder: a field being authored.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ControlPoint {
    pub label: String,
    pub input_type: InputType,
    pub unit: String,
    pub target_value: String,
    pub min_value: String,
    pub max_value: String,
    pub repeat_count: u32,
    pub required: bool,
    pub options: String,
}

impl Default for ControlPoint {
    fn default() -> Self {
        Self {
            label: String::new(),
            input_type: InputType::Number,
            unit: String::new(),
            target_value: String::new(),
            min_value: String::new(),
            max_value: String::new(),
            repeat_count: 1,
            required: true,
            options: String::new(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TemplateBuildError {
    #[error("template code is required")]
    MissingCode,
    #[error("template name is required")]
    MissingName,
    #[error("invalid template code: {0}")]
    InvalidCode(TypeConstraintError),
    #[error("add at least one control point")]
    NoControlPoints,
    #[error("control point #{0} has no label")]
    MissingLabel(usize),
    #[error("control point `{label}` has an invalid number `{value}`")]
    InvalidNumber { label: String, value: String },
}

/// Derives the backend field key from a label: lower-cased, whitespace runs
/// collapsed to `_`.
pub fn field_key(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn section_name(repeat_count: u32) -> String {
    if repeat_count > 1 {
        format!("Repeated Controls ({repeat_count}x)")
    } else {
        "Control Points".to_string()
    }
}

fn parse_point_number(label: &str, raw: &str) -> Result<Option<f64>, TemplateBuildError> {
    parse_optional_number(raw).map_err(|_| TemplateBuildError::InvalidNumber {
        label: label.to_string(),
        value: raw.trim().to_string(),
    })
}

/// Converts the builder state into the nested request shape.
pub fn build_template_request(
    header: &TemplateHeader,
    points: &[ControlPoint],
) -> Result<QcFormTemplateRequest, TemplateBuildError> {
    if header.code.trim().is_empty() {
        return Err(TemplateBuildError::MissingCode);
    }
    let code = EntityCode::new(header.code.as_str()).map_err(TemplateBuildError::InvalidCode)?;
    let name = EntityName::new(header.name.as_str()).map_err(|_| TemplateBuildError::MissingName)?;
    if points.is_empty() {
        return Err(TemplateBuildError::NoControlPoints);
    }

    // Sections keep the order in which each repeat count first appears.
    let mut groups: Vec<(u32, Vec<QcFormFieldRequest>)> = Vec::new();

    for (index, point) in points.iter().enumerate() {
        let label = FieldLabel::new(point.label.as_str())
            .map_err(|_| TemplateBuildError::MissingLabel(index + 1))?;
        let options = split_options(&point.options);
        let field = QcFormFieldRequest {
            field_order: index as i32 + 1,
            field_key: field_key(&label),
            label: label.to_string(),
            input_type: point.input_type.clone(),
            min_value: parse_point_number(&label, &point.min_value)?,
            max_value: parse_point_number(&label, &point.max_value)?,
            target_value: parse_point_number(&label, &point.target_value)?,
            unit: Some(point.unit.trim().to_string()).filter(|unit| !unit.is_empty()),
            required: point.required,
            options: (!options.is_empty()).then_some(options),
        };

        let repeat_count = point.repeat_count.max(1);
        match groups.iter_mut().find(|(count, _)| *count == repeat_count) {
            Some((_, fields)) => fields.push(field),
            None => groups.push((repeat_count, vec![field])),
        }
    }

    let sections = groups
        .into_iter()
        .enumerate()
        .map(|(index, (repeat_count, fields))| QcFormSectionRequest {
            section_order: index as i32 + 1,
            name: section_name(repeat_count),
            is_repeatable: repeat_count > 1,
            repeat_count: (repeat_count > 1).then_some(repeat_count),
            fields,
        })
        .collect();

    let description = Some(header.description.trim().to_string()).filter(|d| !d.is_empty());

    Ok(QcFormTemplateRequest {
        code,
        name,
        description,
        context_type: header.context_type,
        product_id: header
            .product_id
            .filter(|_| header.context_type == ContextType::Product),
        machine_ids: header
            .machine_id
            .filter(|_| header.context_type == ContextType::Machine)
            .into_iter()
            .collect(),
        requires_approval: header.requires_approval,
        allow_partial_save: header.allow_partial_save,
        active: true,
        sections,
    })
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Flattens an existing template back into builder rows for editing.
pub fn control_points_from_template(template: &QcFormTemplate) -> Vec<ControlPoint> {
    template
        .sections
        .iter()
        .flat_map(|section| {
            section.fields.iter().map(move |field| ControlPoint {
                label: field.label.clone(),
                input_type: field.input_type.clone(),
                unit: field.unit.clone().unwrap_or_default(),
                target_value: format_number(field.target_value),
                min_value: format_number(field.min_value),
                max_value: format_number(field.max_value),
                repeat_count: section.repeat_count.unwrap_or(1).max(1),
                required: field.required,
                options: field.options.join("\n"),
            })
        })
        .collect()
}

/// Builder header pre-filled from an existing template.
pub fn header_from_template(template: &QcFormTemplate) -> TemplateHeader {
    TemplateHeader {
        code: template.code.clone(),
        name: template.name.clone(),
        description: template.description.clone().unwrap_or_default(),
        context_type: template.context_type,
        product_id: template.product_id,
        machine_id: template.machine_ids.first().copied(),
        requires_approval: template.requires_approval,
        allow_partial_save: template.allow_partial_save,
    }
}
