use crate::core::application::ApplicationServices;
use crate::domain::task_manager::data::TaskDetails;
use crate::domain::task_manager::forms::TaskForm;
use crate::domain::task_manager::{
    CreateTaskServiceParams, TaskManagerService, UpdateTaskServiceParams,
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

const TASK_LIST_PATH: &str = "/tasks/";

pub async fn list_tasks<S: ApplicationServices>(
    State(state): State<S>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let tasks = state.task_manager_service().list_tasks().await?;

    Ok(Json(page_response(
        tasks,
        ResponseType::Task,
        Segment::List,
        navigation,
    )))
}

pub async fn task_detail<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let task = state.task_manager_service().get_task(parse_id(&id)?).await?;

    Ok(Json(page_response(
        task,
        ResponseType::Task,
        Segment::Detail,
        navigation,
    )))
}

pub async fn create_task_page<S: ApplicationServices>(
    State(state): State<S>,
    Navigation(navigation): Navigation,
    Query(query): Query<NextQuery>,
) -> Result<impl IntoResponse, AppError> {
    let choices = state.task_manager_service().task_form_choices().await?;

    Ok(Json(page_response(
        FormPageData::<TaskDetails> {
            object: None,
            choices,
            next: safe_next(query.next),
        },
        ResponseType::Task,
        Segment::Create,
        navigation,
    )))
}

pub async fn create_task<S: ApplicationServices>(
    State(state): State<S>,
    Submission { form, next }: Submission<TaskForm>,
) -> Result<Redirect, AppError> {
    let input = form.clone();
    let task = state
        .task_manager_service()
        .create_task(CreateTaskServiceParams { form })
        .await
        .map_err(|e| form_error(e, &input))?;

    tracing::debug!(task_id = %task.id, "task created");
    Ok(redirect_after_write(next, TASK_LIST_PATH))
}

pub async fn update_task_page<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
    Query(query): Query<NextQuery>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.task_manager_service();
    let task = service.get_task(parse_id(&id)?).await?;
    let choices = service.task_form_choices().await?;

    Ok(Json(page_response(
        FormPageData {
            object: Some(task),
            choices,
            next: safe_next(query.next),
        },
        ResponseType::Task,
        Segment::Update,
        navigation,
    )))
}

pub async fn update_task<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Submission { form, next }: Submission<TaskForm>,
) -> Result<Redirect, AppError> {
    let task_id = parse_id(&id)?;
    let input = form.clone();
    state
        .task_manager_service()
        .update_task(UpdateTaskServiceParams { task_id, form })
        .await
        .map_err(|e| form_error(e, &input))?;

    Ok(redirect_after_write(next, TASK_LIST_PATH))
}

pub async fn delete_task_page<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let task = state.task_manager_service().get_task(parse_id(&id)?).await?;

    Ok(Json(page_response(
        task,
        ResponseType::Task,
        Segment::Delete,
        navigation,
    )))
}

pub async fn delete_task<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Submission { next, .. }: Submission<NextQuery>,
) -> Result<Redirect, AppError> {
    let task_id = parse_id(&id)?;
    state.task_manager_service().delete_task(task_id).await?;

    Ok(redirect_after_write(next, TASK_LIST_PATH))
}
