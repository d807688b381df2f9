use crate::core::application::ApplicationServices;
use crate::domain::auth::{AuthService, ServiceRecordVisitParams};
use crate::domain::task_manager::TaskManagerService;
use crate::domain::task_manager::data::DashboardSummary;
use crate::errors::{AppError, internal_error};
use crate::inbound::http::extractors::Navigation;
use crate::inbound::http::responses::shared::{ResponseType, Segment, page_response};
use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Serialize;
use tower_sessions::Session;

#[derive(Serialize)]
struct DashboardData {
    #[serde(flatten)]
    summary: DashboardSummary,
    num_visits: u64,
}

/// Public landing page. Counts visits of the current session.
pub async fn dashboard<S: ApplicationServices>(
    State(state): State<S>,
    session: Session,
    Navigation(navigation): Navigation,
) -> Result<impl IntoResponse, AppError> {
    let num_visits = state
        .auth_service()
        .record_visit(ServiceRecordVisitParams { session })
        .await
        .map_err(internal_error)?;
    let summary = state.task_manager_service().dashboard_summary().await?;

    Ok(Json(page_response(
        DashboardData {
            summary,
            num_visits,
        },
        ResponseType::Dashboard,
        Segment::Dashboard,
        navigation,
    )))
}

#[cfg(test)]
mod tests {
    use crate::core::application::tests::{
        MockAppInstanceParameters, MockApplication, manager_with_navigation,
    };
    use crate::domain::auth::MockAuthService;
    use crate::domain::session::SessionError;
    use crate::domain::task_manager::data::{DashboardCounts, DashboardSummary};
    use crate::inbound::http::router;
    use axum_test::TestServer;
    use std::future;
    use tower_sessions::MemoryStore;

    fn anonymous_auth_service(visits: u64) -> MockAuthService {
        let mut auth_service = MockAuthService::new();
        auth_service
            .expect_current_user()
            .returning(|_| Box::pin(future::ready(Ok(None))));
        auth_service
            .expect_record_visit()
            .times(1)
            .returning(move |_| Box::pin(future::ready(Ok(visits))));
        auth_service
    }

    #[tokio::test]
    async fn test_dashboard() {
        let mut manager = manager_with_navigation();
        manager.expect_dashboard_summary().times(1).returning(|| {
            Box::pin(future::ready(Ok(DashboardSummary {
                counts: DashboardCounts {
                    tasks_in_process: 2,
                    projects: 3,
                    workers: 4,
                    teams: 2,
                },
                project_summaries: vec![],
                team_overview: vec![],
            })))
        });

        let app = MockApplication::mock_instance(MockAppInstanceParameters {
            auth_service: Some(anonymous_auth_service(3)),
            task_manager_service: Some(manager),
            ..Default::default()
        });
        let server = TestServer::new(router(app, MemoryStore::default())).unwrap();

        let response = server.get("/").await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!("dashboard", body["type"]);
        assert_eq!("dashboard", body["segment"]);
        assert_eq!(2, body["data"]["tasks_in_process"]);
        assert_eq!(3, body["data"]["projects"]);
        assert_eq!(4, body["data"]["workers"]);
        assert_eq!(2, body["data"]["teams"]);
        assert_eq!(3, body["data"]["num_visits"]);
        assert_eq!(serde_json::json!([]), body["navigation_tasks"]);
    }

    #[tokio::test]
    async fn test_dashboard_session_error() {
        let mut auth_service = MockAuthService::new();
        auth_service
            .expect_current_user()
            .returning(|_| Box::pin(future::ready(Ok(None))));
        auth_service
            .expect_record_visit()
            .times(1)
            .returning(|_| Box::pin(future::ready(Err(SessionError::ReadSessionError))));
        let mut manager = manager_with_navigation();
        manager.expect_dashboard_summary().times(0);

        let app = MockApplication::mock_instance(MockAppInstanceParameters {
            auth_service: Some(auth_service),
            task_manager_service: Some(manager),
            ..Default::default()
        });
        let server = TestServer::new(router(app, MemoryStore::default())).unwrap();

        let response = server.get("/").await;

        response.assert_status_internal_server_error();
    }
}
