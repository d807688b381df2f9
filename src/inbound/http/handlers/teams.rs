use crate::core::application::ApplicationServices;
use crate::domain::task_manager::data::TeamDetails;
use crate::domain::task_manager::forms::TeamForm;
use crate::domain::task_manager::{
    CreateTeamServiceParams, TaskManagerService, UpdateTeamServiceParams,
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

const TEAM_LIST_PATH: &str = "/teams/";

pub async fn list_teams<S: ApplicationServices>(
    State(state): State<S>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let teams = state.task_manager_service().list_teams().await?;

    Ok(Json(page_response(
        teams,
        ResponseType::Team,
        Segment::List,
        navigation,
    )))
}

pub async fn team_detail<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let team = state.task_manager_service().get_team(parse_id(&id)?).await?;

    Ok(Json(page_response(
        team,
        ResponseType::Team,
        Segment::Detail,
        navigation,
    )))
}

pub async fn create_team_page<S: ApplicationServices>(
    State(state): State<S>,
    Navigation(navigation): Navigation,
    Query(query): Query<NextQuery>,
) -> Result<impl IntoResponse, AppError> {
    let choices = state.task_manager_service().team_form_choices().await?;

    Ok(Json(page_response(
        FormPageData::<TeamDetails> {
            object: None,
            choices,
            next: safe_next(query.next),
        },
        ResponseType::Team,
        Segment::Create,
        navigation,
    )))
}

pub async fn create_team<S: ApplicationServices>(
    State(state): State<S>,
    Submission { form, next }: Submission<TeamForm>,
) -> Result<Redirect, AppError> {
    let input = form.clone();
    let team = state
        .task_manager_service()
        .create_team(CreateTeamServiceParams { form })
        .await
        .map_err(|e| form_error(e, &input))?;

    tracing::debug!(team_id = %team.id, "team created");
    Ok(redirect_after_write(next, TEAM_LIST_PATH))
}

pub async fn update_team_page<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
    Query(query): Query<NextQuery>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.task_manager_service();
    let team = service.get_team(parse_id(&id)?).await?;
    let choices = service.team_form_choices().await?;

    Ok(Json(page_response(
        FormPageData {
            object: Some(team),
            choices,
            next: safe_next(query.next),
        },
        ResponseType::Team,
        Segment::Update,
        navigation,
    )))
}

pub async fn update_team<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Submission { form, next }: Submission<TeamForm>,
) -> Result<Redirect, AppError> {
    let team_id = parse_id(&id)?;
    let input = form.clone();
    state
        .task_manager_service()
        .update_team(UpdateTeamServiceParams { team_id, form })
        .await
        .map_err(|e| form_error(e, &input))?;

    Ok(redirect_after_write(next, TEAM_LIST_PATH))
}

pub async fn delete_team_page<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let team = state.task_manager_service().get_team(parse_id(&id)?).await?;

    Ok(Json(page_response(
        team,
        ResponseType::Team,
        Segment::Delete,
        navigation,
    )))
}

pub async fn delete_team<S: ApplicationServices>(
    State(state): State<S>,
    Path(id): Path<String>,
    Submission { next, .. }: Submission<NextQuery>,
) -> Result<Redirect, AppError> {
    let team_id = parse_id(&id)?;
    state.task_manager_service().delete_team(team_id).await?;

    Ok(redirect_after_write(next, TEAM_LIST_PATH))
}

#[cfg(test)]
mod tests {
    use crate::core::application::tests::{
        MockAppInstanceParameters, MockApplication, manager_with_navigation,
        signed_in_auth_service,
    };
    use crate::domain::task_manager::data::{Team, TeamDetails, WorkerRef};
    use crate::domain::task_manager::forms::{FormErrors, REQUIRED};
    use crate::domain::task_manager::{MockTaskManagerService, ServiceFormError};
    use crate::inbound::http::router;
    use axum_test::TestServer;
    use http::StatusCode;
    use std::future;
    use tower_sessions::MemoryStore;
    use uuid::Uuid;

    fn team() -> Team {
        Team {
            id: Uuid::now_v7(),
            name: "Core".to_string(),
            team_lead_id: Some(Uuid::nil()),
        }
    }

    fn server(manager: MockTaskManagerService) -> TestServer {
        let app = MockApplication::mock_instance(MockAppInstanceParameters {
            auth_service: Some(signed_in_auth_service()),
            task_manager_service: Some(manager),
            ..Default::default()
        });

        TestServer::new(router(app, MemoryStore::default())).unwrap()
    }

    #[tokio::test]
    async fn test_list_teams() {
        let mut manager = manager_with_navigation();
        manager.expect_list_teams().times(1).returning(|| {
            Box::pin(future::ready(Ok(vec![TeamDetails {
                team: team(),
                team_lead: Some(WorkerRef {
                    id: Uuid::nil(),
                    username: "alice".to_string(),
                    first_name: "".to_string(),
                    last_name: "".to_string(),
                }),
                workers: vec![],
                projects: vec![],
            }])))
        });

        let response = server(manager).get("/teams/").await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!("team", body["type"]);
        assert_eq!("Core", body["data"][0]["name"]);
        assert_eq!("alice", body["data"][0]["team_lead"]["username"]);
    }

    #[tokio::test]
    async fn test_create_team() {
        let mut manager = MockTaskManagerService::new();
        manager
            .expect_create_team()
            .withf(|params| params.form.workers.len() == 2)
            .times(1)
            .returning(|_| Box::pin(future::ready(Ok(team()))));

        let response = server(manager)
            .post("/team/create/")
            .form(&[
                ("name", "Core"),
                ("team_lead", "0190a0c6-4a4e-7c3e-8d4f-0b5c6d7e8f91"),
                ("workers", "0190a0c6-4a4e-7c3e-8d4f-0b5c6d7e8f91"),
                ("workers", "0190a0c6-4a4e-7c3e-8d4f-0b5c6d7e8f92"),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!("/teams/", response.header("location"));
    }

    #[tokio::test]
    async fn test_create_team_without_lead() {
        let mut manager = MockTaskManagerService::new();
        manager.expect_create_team().times(1).returning(|_| {
            Box::pin(future::ready(Err(ServiceFormError::Invalid(
                FormErrors::single("team_lead", REQUIRED),
            ))))
        });

        let response = server(manager)
            .post("/team/create/")
            .form(&[("name", "Core")])
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<serde_json::Value>();
        assert_eq!(REQUIRED, body["errors"]["team_lead"][0]);
    }
}
