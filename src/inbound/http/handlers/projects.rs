use crate::core::application::ApplicationServices;
use crate::domain::task_manager::data::ProjectDetails;
use crate::domain::task_manager::forms::ProjectForm;
use crate::domain::task_manager::{
    CreateProjectServiceParams, TaskManagerService, UpdateProjectServiceParams,
};
use crate::errors::{AppError, form_error};
use crate::inbound::http::extractors::{
    Navigation, NextQuery, Submission, parse_id, redirect_after_write, safe_next,
};
use crate::inbound::http::responses::shared::{
    FormPageData, ResponseType, Segment, page_response,
};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect};

const PROJECT_LIST_PATH: &str = "/projects/";

pub async fn list_projects<S: ApplicationServices>(
    State(state): State<S>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let projects = state.task_manager_service().list_projects().await?;

    Ok(Json(page_response(
        projects,
        ResponseType::Project,
        Segment::List,
        navigation,
    )))
}

pub async fn project_detail<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let project = state.task_manager_service().get_project(parse_id(&id)?).await?;

    Ok(Json(page_response(
        project,
        ResponseType::Project,
        Segment::Detail,
        navigation,
    )))
}

pub async fn create_project_page<S: ApplicationServices>(
    State(state): State<S>,
    Navigation(navigation): Navigation,
    Query(query): Query<NextQuery>,
) -> Result<impl IntoResponse, AppError> {
    let choices = state.task_manager_service().project_form_choices().await?;

    Ok(Json(page_response(
        FormPageData::<ProjectDetails> {
            object: None,
            choices,
            next: safe_next(query.next),
        },
        ResponseType::Project,
        Segment::Create,
        navigation,
    )))
}

pub async fn create_project<S: ApplicationServices>(
    State(state): State<S>,
    Submission { form, next }: Submission<ProjectForm>,
) -> Result<Redirect, AppError> {
    let input = form.clone();
    let project = state
        .task_manager_service()
        .create_project(CreateProjectServiceParams { form })
        .await
        .map_err(|e| form_error(e, &input))?;

    tracing::debug!(project_id = %project.id, "project created");
    Ok(redirect_after_write(next, PROJECT_LIST_PATH))
}

pub async fn update_project_page<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
    Query(query): Query<NextQuery>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.task_manager_service();
    let project = service.get_project(parse_id(&id)?).await?;
    let choices = service.project_form_choices().await?;

    Ok(Json(page_response(
        FormPageData {
            object: Some(project),
            choices,
            next: safe_next(query.next),
        },
        ResponseType::Project,
        Segment::Update,
        navigation,
    )))
}

pub async fn update_project<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Submission { form, next }: Submission<ProjectForm>,
) -> Result<Redirect, AppError> {
    let project_id = parse_id(&id)?;
    let input = form.clone();
    state
        .task_manager_service()
        .update_project(UpdateProjectServiceParams { project_id, form })
        .await
        .map_err(|e| form_error(e, &input))?;

    Ok(redirect_after_write(next, PROJECT_LIST_PATH))
}

pub async fn delete_project_page<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let project = state.task_manager_service().get_project(parse_id(&id)?).await?;

    Ok(Json(page_response(
        project,
        ResponseType::Project,
        Segment::Delete,
        navigation,
    )))
}

pub async fn delete_project<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Submission { next, .. }: Submission<NextQuery>,
) -> Result<Redirect, AppError> {
    let project_id = parse_id(&id)?;
    state.task_manager_service().delete_project(project_id).await?;

    Ok(redirect_after_write(next, PROJECT_LIST_PATH))
}
