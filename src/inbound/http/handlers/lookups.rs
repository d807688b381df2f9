use crate::core::application::ApplicationServices;
use crate::domain::task_manager::data::{FormChoices, Lookup, LookupKind};
use crate::domain::task_manager::forms::LookupForm;
use crate::domain::task_manager::{
    CreateLookupServiceParams, TaskManagerService, UpdateLookupServiceParams,
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

/// Binds one name-only lookup table to its routes.
pub trait LookupRoute: Send + Sync + 'static {
    const KIND: LookupKind;
    const RESPONSE_TYPE: ResponseType;
    const LIST_PATH: &'static str;
}

pub struct Tags;

impl LookupRoute for Tags {
    const KIND: LookupKind = LookupKind::Tag;
    const RESPONSE_TYPE: ResponseType = ResponseType::Tag;
    const LIST_PATH: &'static str = "/tags/";
}

pub struct TaskTypes;

impl LookupRoute for TaskTypes {
    const KIND: LookupKind = LookupKind::TaskType;
    const RESPONSE_TYPE: ResponseType = ResponseType::TaskType;
    const LIST_PATH: &'static str = "/task-types/";
}

pub struct Positions;

impl LookupRoute for Positions {
    const KIND: LookupKind = LookupKind::Position;
    const RESPONSE_TYPE: ResponseType = ResponseType::Position;
    const LIST_PATH: &'static str = "/positions/";
}

pub async fn list_lookups<S: ApplicationServices, L: LookupRoute>(
    State(state): State<S>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let lookups = state.task_manager_service().list_lookups(L::KIND).await?;

    Ok(Json(page_response(
        lookups,
        L::RESPONSE_TYPE,
        Segment::List,
        navigation,
    )))
}

pub async fn lookup_detail<S: ApplicationServices, L: LookupRoute>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let lookup = state
        .task_manager_service()
        .get_lookup(L::KIND, parse_id(&id)?)
        .await?;

    Ok(Json(page_response(
        lookup,
        L::RESPONSE_TYPE,
        Segment::Detail,
        navigation,
    )))
}

pub async fn create_lookup_page<L: LookupRoute>(
    Navigation(navigation): Navigation,
    Query(query): Query<NextQuery>,
) -> impl IntoResponse {
    Json(page_response(
        FormPageData::<Lookup> {
            object: None,
            choices: FormChoices::default(),
            next: safe_next(query.next),
        },
        L::RESPONSE_TYPE,
        Segment::Create,
        navigation,
    ))
}

pub async fn create_lookup<S: ApplicationServices, L: LookupRoute>(
    State(state): State<S>,
    Submission { form, next }: Submission<LookupForm>,
) -> Result<Redirect, AppError> {
    let input = form.clone();
    state
        .task_manager_service()
        .create_lookup(CreateLookupServiceParams {
            kind: L::KIND,
            form,
        })
        .await
        .map_err(|e| form_error(e, &input))?;

    Ok(redirect_after_write(next, L::LIST_PATH))
}

pub async fn update_lookup_page<S: ApplicationServices, L: LookupRoute>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
    Query(query): Query<NextQuery>,
) -> Result<impl IntoResponse, AppError> {
    let lookup = state
        .task_manager_service()
        .get_lookup(L::KIND, parse_id(&id)?)
        .await?;

    Ok(Json(page_response(
        FormPageData {
            object: Some(lookup),
            choices: FormChoices::default(),
            next: safe_next(query.next),
        },
        L::RESPONSE_TYPE,
        Segment::Update,
        navigation,
    )))
}

pub async fn update_lookup<S: ApplicationServices, L: LookupRoute>(
    State(state): State<S>,
    Path(id): Path<String>,
    Submission { form, next }: Submission<LookupForm>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id)?;
    let input = form.clone();
    state
        .task_manager_service()
        .update_lookup(UpdateLookupServiceParams {
            kind: L::KIND,
            id,
            form,
        })
        .await
        .map_err(|e| form_error(e, &input))?;

    Ok(redirect_after_write(next, L::LIST_PATH))
}

pub async fn delete_lookup_page<S: ApplicationServices, L: LookupRoute>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let lookup = state
        .task_manager_service()
        .get_lookup(L::KIND, parse_id(&id)?)
        .await?;

    Ok(Json(page_response(
        lookup,
        L::RESPONSE_TYPE,
        Segment::Delete,
        navigation,
    )))
}

pub async fn delete_lookup<S: ApplicationServices, L: LookupRoute>(
    State(state): State<S>,
    Path(id): Path<String>,
    Submission { next, .. }: Submission<NextQuery>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id)?;
    state
        .task_manager_service()
        .delete_lookup(L::KIND, id)
        .await?;

    Ok(redirect_after_write(next, L::LIST_PATH))
}
