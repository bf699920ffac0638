//! Template list and the control-point builder.

use crate::ADMIN_ROLES;
use crate::auth::AuthenticatedUser;
use crate::domain::qc_template::{
    ControlPoint, QcFormTemplate, TemplateBuildError, TemplateHeader, build_template_request,
    control_points_from_template, header_from_template,
};
use crate::domain::types::TemplateId;
use crate::dto::qc::{BuilderOutcome, BuilderPageData, TemplatesPageData};
use crate::forms::qc_template::{BuilderAction, BuilderSubmission, TemplateBuilderForm};
use crate::repository::{
    MachineReader, ProductReader, QcTemplateReader, QcTemplateWriter, TemplateListQuery,
};
use crate::services::{ServiceError, ServiceResult, ensure_role, log_failure};

pub async fn list_templates<R>(
    repo: &R,
    user: &AuthenticatedUser,
    search: Option<String>,
) -> ServiceResult<TemplatesPageData>
where
    R: QcTemplateReader + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let search = search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let query = match &search {
        Some(term) => TemplateListQuery::new().search(term.clone()),
        None => TemplateListQuery::new(),
    };

    let templates = repo
        .list_templates(query)
        .await
        .map_err(log_failure("list templates"))?;

    Ok(TemplatesPageData { templates, search })
}

async fn builder_page<R>(
    repo: &R,
    template_id: Option<TemplateId>,
    header: TemplateHeader,
    points: Vec<ControlPoint>,
) -> ServiceResult<BuilderPageData>
where
    R: ProductReader + MachineReader + ?Sized,
{
    let (products, machines) = tokio::join!(repo.list_products(), repo.list_machines());

    Ok(BuilderPageData {
        template_id,
        header,
        points,
        products: products.map_err(log_failure("list products"))?,
        machines: machines.map_err(log_failure("list machines"))?,
    })
}

/// Builder state for a new template (`None`) or an existing one.
pub async fn load_builder<R>(
    repo: &R,
    user: &AuthenticatedUser,
    template_id: Option<i64>,
) -> ServiceResult<BuilderPageData>
where
    R: QcTemplateReader + ProductReader + MachineReader + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    match template_id {
        Some(id) => {
            let id = TemplateId::new(id)?;
            let template = repo
                .get_template_by_id(id)
                .await
                .map_err(log_failure("load the template"))?
                .ok_or(ServiceError::NotFound)?;
            builder_page(
                repo,
                Some(id),
                header_from_template(&template),
                control_points_from_template(&template),
            )
            .await
        }
        None => {
            builder_page(repo, None, TemplateHeader::default(), vec![ControlPoint::default()])
                .await
        }
    }
}

fn build_error_key(err: &TemplateBuildError) -> &'static str {
    match err {
        TemplateBuildError::MissingCode | TemplateBuildError::MissingName => "form_required_fields",
        TemplateBuildError::NoControlPoints => "template_no_points",
        TemplateBuildError::MissingLabel(_) => "template_point_label_required",
        TemplateBuildError::InvalidCode(_) | TemplateBuildError::InvalidNumber { .. } => {
            "form_invalid_values"
        }
    }
}

/// Handles a builder post: row edits re-render, save creates or updates.
pub async fn save_template<R>(
    repo: &R,
    user: &AuthenticatedUser,
    template_id: Option<i64>,
    body: &[u8],
) -> ServiceResult<BuilderOutcome>
where
    R: QcTemplateWriter + ProductReader + MachineReader + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    let template_id = template_id.map(TemplateId::new).transpose()?;
    let BuilderSubmission {
        header,
        mut points,
        action,
    } = BuilderSubmission::try_from(TemplateBuilderForm::parse(body)?)?;

    match action {
        BuilderAction::AddPoint => {
            points.push(ControlPoint::default());
            let page = builder_page(repo, template_id, header, points).await?;
            return Ok(BuilderOutcome::Rerender { page, error: None });
        }
        BuilderAction::RemovePoint(index) => {
            if index < points.len() {
                points.remove(index);
            }
            let page = builder_page(repo, template_id, header, points).await?;
            return Ok(BuilderOutcome::Rerender { page, error: None });
        }
        BuilderAction::Save => {}
    }

    let request = match build_template_request(&header, &points) {
        Ok(request) => request,
        Err(err) => {
            log::debug!("Template rejected: {err}");
            let page = builder_page(repo, template_id, header, points).await?;
            return Ok(BuilderOutcome::Rerender {
                page,
                error: Some(build_error_key(&err)),
            });
        }
    };

    let saved: QcFormTemplate = match template_id {
        Some(id) => repo
            .update_template(id, &request)
            .await
            .map_err(log_failure("update the template"))?,
        None => repo
            .create_template(&request)
            .await
            .map_err(log_failure("create the template"))?,
    };
    log::info!(
        "Template {} saved by {} with {} sections",
        saved.code,
        user.username,
        request.sections.len()
    );

    Ok(BuilderOutcome::Saved(saved))
}

pub async fn delete_template<R>(
    repo: &R,
    user: &AuthenticatedUser,
    template_id: i64,
) -> ServiceResult<()>
where
    R: QcTemplateWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLES)?;

    repo.delete_template(TemplateId::new(template_id)?)
        .await
        .map_err(log_failure("delete the template"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Role;
    use crate::services::fake::{FakeBackend, FakeState, template};
    use crate::services::test_support::user;

    const TWO_POINTS: &[u8] = b"code=qc-9&name=Flange&context_type=PRODUCT&product_id=2\
&label=Outer+diameter&input_type=DECIMAL&unit=mm&target_value=50&min_value=49.8&max_value=50.2\
&repeat_count=5&required=true&options=\
&label=Visual&input_type=PASS_FAIL&unit=&target_value=&min_value=&max_value=\
&repeat_count=1&required=true&options=";

    #[actix_web::test]
    async fn saves_grouped_template() {
        let repo = FakeBackend::default();

        let outcome = save_template(&repo, &user(Role::Admin), None, TWO_POINTS)
            .await
            .unwrap();

        assert!(matches!(outcome, BuilderOutcome::Saved(ref t) if t.code == "QC-9"));
        let request = repo.with(|state| state.template_requests[0].clone());
        assert_eq!(request.sections.len(), 2);
        assert_eq!(request.sections[0].repeat_count, Some(5));
        assert_eq!(request.sections[1].name, "Control Points");
        assert_eq!(request.product_id.map(|id| id.get()), Some(2));
    }

    #[actix_web::test]
    async fn empty_point_list_rerenders_with_message() {
        let repo = FakeBackend::default();

        let outcome = save_template(&repo, &user(Role::Admin), None, b"code=A&name=B")
            .await
            .unwrap();

        match outcome {
            BuilderOutcome::Rerender { page, error } => {
                assert_eq!(error, Some("template_no_points"));
                assert!(page.points.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!repo.calls().contains(&"create_template".to_string()));
    }

    #[actix_web::test]
    async fn add_and_remove_rows_without_saving() {
        let repo = FakeBackend::default();
        let admin = user(Role::Admin);

        let mut body = TWO_POINTS.to_vec();
        body.extend_from_slice(b"&action=add");
        let BuilderOutcome::Rerender { page, .. } =
            save_template(&repo, &admin, None, &body).await.unwrap()
        else {
            panic!("expected rerender");
        };
        assert_eq!(page.points.len(), 3);

        let mut body = TWO_POINTS.to_vec();
        body.extend_from_slice(b"&action=remove:0");
        let BuilderOutcome::Rerender { page, .. } =
            save_template(&repo, &admin, None, &body).await.unwrap()
        else {
            panic!("expected rerender");
        };
        assert_eq!(page.points.len(), 1);
        assert_eq!(page.points[0].label, "Visual");

        assert!(repo.with(|state| state.template_requests.is_empty()));
    }

    #[actix_web::test]
    async fn edit_loads_existing_points() {
        let repo = FakeBackend::new(FakeState {
            templates: vec![template(5)],
            ..FakeState::default()
        });

        let page = load_builder(&repo, &user(Role::Admin), Some(7)).await.unwrap();

        assert_eq!(page.template_id.map(|id| id.get()), Some(7));
        assert_eq!(page.points.len(), 2);
        assert_eq!(page.points[1].repeat_count, 5);
        assert_eq!(page.header.code, "QC-7");
    }
}
