//! The template builder form.
//!
//! Control points are posted as parallel repeated fields (`label=..&label=..`)
//! and therefore parsed with `serde_html_form` rather than `web::Form`.

use serde::Deserialize;

use crate::domain::qc_template::{ContextType, ControlPoint, InputType, TemplateHeader};
use crate::domain::types::{MachineId, ProductId};
use crate::forms::{FormError, checkbox, parse_optional_id};

/// What the builder submit button asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderAction {
    Save,
    AddPoint,
    RemovePoint(usize),
}

impl BuilderAction {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("add") => BuilderAction::AddPoint,
            Some(other) => other
                .strip_prefix("remove:")
                .and_then(|index| index.parse().ok())
                .map(BuilderAction::RemovePoint)
                .unwrap_or(BuilderAction::Save),
            None => BuilderAction::Save,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TemplateBuilderForm {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub context_type: String,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub machine_id: Option<String>,
    #[serde(default)]
    pub requires_approval: Option<String>,
    #[serde(default)]
    pub allow_partial_save: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub label: Vec<String>,
    #[serde(default)]
    pub input_type: Vec<String>,
    #[serde(default)]
    pub unit: Vec<String>,
    #[serde(default)]
    pub target_value: Vec<String>,
    #[serde(default)]
    pub min_value: Vec<String>,
    #[serde(default)]
    pub max_value: Vec<String>,
    #[serde(default)]
    pub repeat_count: Vec<String>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Builder state reconstructed from a post.
#[derive(Clone, Debug, PartialEq)]
pub struct BuilderSubmission {
    pub header: TemplateHeader,
    pub points: Vec<ControlPoint>,
    pub action: BuilderAction,
}

impl TemplateBuilderForm {
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(body).map_err(|e| FormError::Malformed(e.to_string()))
    }
}

fn column<'a>(values: &'a [String], index: usize) -> &'a str {
    values.get(index).map(String::as_str).unwrap_or_default()
}

impl TryFrom<TemplateBuilderForm> for BuilderSubmission {
    type Error = FormError;

    fn try_from(form: TemplateBuilderForm) -> Result<Self, Self::Error> {
        let rows = form.label.len();
        if form.input_type.len() != rows {
            return Err(FormError::Malformed(
                "control point columns have different lengths".to_string(),
            ));
        }

        let context_type = if form.context_type.trim().is_empty() {
            ContextType::default()
        } else {
            ContextType::parse(&form.context_type).map_err(|source| FormError::Invalid {
                field: "context_type",
                source,
            })?
        };

        let header = TemplateHeader {
            code: form.code.trim().to_string(),
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
            context_type,
            product_id: parse_optional_id::<ProductId>("product_id", form.product_id.as_deref())?,
            machine_id: parse_optional_id::<MachineId>("machine_id", form.machine_id.as_deref())?,
            requires_approval: checkbox(&form.requires_approval),
            allow_partial_save: checkbox(&form.allow_partial_save),
        };

        let points = (0..rows)
            .map(|i| ControlPoint {
                label: column(&form.label, i).to_string(),
                input_type: InputType::from(column(&form.input_type, i).to_string()),
                unit: column(&form.unit, i).to_string(),
                target_value: column(&form.target_value, i).to_string(),
                min_value: column(&form.min_value, i).to_string(),
                max_value: column(&form.max_value, i).to_string(),
                repeat_count: column(&form.repeat_count, i)
                    .trim()
                    .parse::<u32>()
                    .unwrap_or(1)
                    .clamp(1, 100),
                required: column(&form.required, i) != "false",
                options: column(&form.options, i).to_string(),
            })
            .collect();

        Ok(Self {
            header,
            points,
            action: BuilderAction::parse(form.action.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repeated_columns() {
        let body = b"code=qc-1&name=Shaft&context_type=MACHINE&machine_id=4&product_id=\
&label=Length&input_type=DECIMAL&unit=mm&target_value=10&min_value=9.5&max_value=10.5\
&repeat_count=5&required=true&options=\
&label=Visual&input_type=PASS_FAIL&unit=&target_value=&min_value=&max_value=\
&repeat_count=1&required=false&options=";

        let form = TemplateBuilderForm::parse(body).unwrap();
        let submission = BuilderSubmission::try_from(form).unwrap();

        assert_eq!(submission.action, BuilderAction::Save);
        assert_eq!(submission.header.context_type, ContextType::Machine);
        assert_eq!(submission.header.machine_id, Some(MachineId::new(4).unwrap()));
        assert_eq!(submission.header.product_id, None);
        assert_eq!(submission.points.len(), 2);
        assert_eq!(submission.points[0].repeat_count, 5);
        assert_eq!(submission.points[0].input_type, InputType::Decimal);
        assert!(submission.points[0].required);
        assert!(!submission.points[1].required);
    }

    #[test]
    fn parses_builder_actions() {
        let form = TemplateBuilderForm::parse(b"code=A&name=B&action=remove:1").unwrap();
        let submission = BuilderSubmission::try_from(form).unwrap();
        assert_eq!(submission.action, BuilderAction::RemovePoint(1));
        assert!(submission.points.is_empty());

        let form = TemplateBuilderForm::parse(b"action=add").unwrap();
        assert_eq!(
            BuilderSubmission::try_from(form).unwrap().action,
            BuilderAction::AddPoint
        );
    }

    #[test]
    fn rejects_misaligned_columns() {
        let form = TemplateBuilderForm::parse(b"label=A&label=B&input_type=TEXT").unwrap();
        assert!(matches!(
            BuilderSubmission::try_from(form),
            Err(FormError::Malformed(_))
        ));
    }
}
