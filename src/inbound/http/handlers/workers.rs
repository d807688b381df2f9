use crate::core::application::ApplicationServices;
use crate::domain::task_manager::data::WorkerProfile;
use crate::domain::task_manager::forms::{WorkerCreationForm, WorkerUpdateForm};
use crate::domain::task_manager::{
    CreateWorkerServiceParams, TaskManagerService, UpdateWorkerServiceParams,
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

const WORKER_LIST_PATH: &str = "/workers/";

pub async fn list_workers<S: ApplicationServices>(
    State(state): State<S>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let workers = state.task_manager_service().list_workers().await?;

    Ok(Json(page_response(
        workers,
        ResponseType::Worker,
        Segment::List,
        navigation,
    )))
}

pub async fn worker_detail<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let worker = state.task_manager_service().get_worker(parse_id(&id)?).await?;

    Ok(Json(page_response(
        worker,
        ResponseType::Worker,
        Segment::Detail,
        navigation,
    )))
}

pub async fn create_worker_page<S: ApplicationServices>(
    State(state): State<S>,
    Navigation(navigation): Navigation,
    Query(query): Query<NextQuery>,
) -> Result<impl IntoResponse, AppError> {
    let choices = state.task_manager_service().worker_form_choices().await?;

    Ok(Json(page_response(
        FormPageData::<WorkerProfile> {
            object: None,
            choices,
            next: safe_next(query.next),
        },
        ResponseType::Worker,
        Segment::Create,
        navigation,
    )))
}

pub async fn create_worker<S: ApplicationServices>(
    State(state): State<S>,
    Submission { form, next }: Submission<WorkerCreationForm>,
) -> Result<Redirect, AppError> {
    let input = form.clone();
    let worker = state
        .task_manager_service()
        .create_worker(CreateWorkerServiceParams { form })
        .await
        .map_err(|e| form_error(e, &input))?;

    tracing::debug!(worker_id = %worker.id, "worker created");
    Ok(redirect_after_write(next, WORKER_LIST_PATH))
}

pub async fn update_worker_page<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
    Query(query): Query<NextQuery>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.task_manager_service();
    let worker = service.get_worker(parse_id(&id)?).await?;
    let choices = service.worker_form_choices().await?;

    Ok(Json(page_response(
        FormPageData {
            object: Some(worker),
            choices,
            next: safe_next(query.next),
        },
        ResponseType::Worker,
        Segment::Update,
        navigation,
    )))
}

pub async fn update_worker<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Submission { form, next }: Submission<WorkerUpdateForm>,
) -> Result<Redirect, AppError> {
    let worker_id = parse_id(&id)?;
    let input = form.clone();
    state
        .task_manager_service()
        .update_worker(UpdateWorkerServiceParams { worker_id, form })
        .await
        .map_err(|e| form_error(e, &input))?;

    Ok(redirect_after_write(next, WORKER_LIST_PATH))
}

pub async fn delete_worker_page<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let worker = state.task_manager_service().get_worker(parse_id(&id)?).await?;

    Ok(Json(page_response(
        worker,
        ResponseType::Worker,
        Segment::Delete,
        navigation,
    )))
}

pub async fn delete_worker<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Submission { next, .. }: Submission<NextQuery>,
) -> Result<Redirect, AppError> {
    let worker_id = parse_id(&id)?;
    state.task_manager_service().delete_worker(worker_id).await?;

    Ok(redirect_after_write(next, WORKER_LIST_PATH))
}
