use crate::core::application::{Application, ApplicationServices};
use crate::domain::auth::AuthService;
use crate::domain::task_manager::TaskManagerService;
use crate::inbound::http::handlers::accounts::{login, login_page, logout};
use crate::inbound::http::handlers::dashboard::dashboard;
use crate::inbound::http::handlers::lookups::{
    LookupRoute, Positions, Tags, TaskTypes, create_lookup, create_lookup_page, delete_lookup,
    delete_lookup_page, list_lookups, lookup_detail, update_lookup, update_lookup_page,
};
use crate::inbound::http::handlers::projects::{
    create_project, create_project_page, delete_project, delete_project_page, list_projects,
    project_detail, update_project, update_project_page,
};
use crate::inbound::http::handlers::server_health;
use crate::inbound::http::handlers::tasks::{
    create_task, create_task_page, delete_task, delete_task_page, list_tasks, task_detail,
    update_task, update_task_page,
};
use crate::inbound::http::handlers::teams::{
    create_team, create_team_page, delete_team, delete_team_page, list_teams, team_detail,
    update_team, update_team_page,
};
use crate::inbound::http::handlers::workers::{
    create_worker, create_worker_page, delete_worker, delete_worker_page, list_workers,
    update_worker, update_worker_page, worker_detail,
};
use crate::inbound::http::middleware::auth;
use axum::Router;
use axum::extract::{MatchedPath, Request};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum_extra::extract::cookie::SameSite;
use http::header::{ACCEPT, ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use http::{HeaderValue, Method, StatusCode};
use time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

pub fn router<
    AUTH: AuthService + Send + Sync + 'static,
    MANAGER: TaskManagerService + Send + Sync + 'static,
    Store: SessionStore + Clone + Send + Sync + 'static,
>(
    application: Application<AUTH, MANAGER>,
    session_store: Store,
) -> Router {
    let config = application.config();
    let same_site = if config.secure_session {
        SameSite::None
    } else {
        SameSite::Lax
    };
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.secure_session)
        .with_expiry(Expiry::OnInactivity(Duration::hours(1)))
        .with_same_site(same_site);

    let hosts: Vec<HeaderValue> = config
        .cors_hosts
        .iter()
        .filter_map(|host| match host.parse() {
            Ok(host) => Some(host),
            Err(_) => {
                tracing::warn!(%host, "ignoring invalid cors host");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(vec![
            ORIGIN,
            AUTHORIZATION,
            ACCEPT,
            CONTENT_TYPE,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        ])
        .allow_origin(hosts)
        .allow_credentials(true);

    let protected = protected_routes(application.clone());

    Router::new()
        .route("/", get(dashboard::<Application<AUTH, MANAGER>>))
        .route("/healthz", get(server_health))
        .route(
            "/accounts/login/",
            get(login_page).post(login::<Application<AUTH, MANAGER>>),
        )
        .route(
            "/accounts/logout/",
            post(logout::<Application<AUTH, MANAGER>>),
        )
        .merge(protected)
        .layer(cors)
        .layer(session_layer)
        .layer((
            SetSensitiveHeadersLayer::new([AUTHORIZATION]),
            CompressionLayer::new(),
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request| {
                    let method = req.method();
                    let uri = req.uri();

                    let matched_path = req
                        .extensions()
                        .get::<MatchedPath>()
                        .map(|matched_path| matched_path.as_str());

                    tracing::debug_span!("request", %method, %uri, matched_path)
                })
                .on_failure(()),
            TimeoutLayer::with_status_code(
                StatusCode::GATEWAY_TIMEOUT,
                std::time::Duration::from_secs(30),
            ),
            CatchPanicLayer::new(),
        ))
        .with_state(application)
}

fn protected_routes<APP>(application: APP) -> Router<APP>
where
    APP: ApplicationServices + Send + Sync + 'static,
{
    Router::new()
        .route("/tasks/", get(list_tasks::<APP>))
        .route("/task/create/", get(create_task_page::<APP>).post(create_task::<APP>))
        .route("/task/{id}/", get(task_detail::<APP>))
        .route(
            "/task/{id}/update/",
            get(update_task_page::<APP>).post(update_task::<APP>),
        )
        .route(
            "/task/{id}/delete/",
            get(delete_task_page::<APP>).post(delete_task::<APP>),
        )
        .route("/teams/", get(list_teams::<APP>))
        .route("/team/create/", get(create_team_page::<APP>).post(create_team::<APP>))
        .route("/team/{id}/", get(team_detail::<APP>))
        .route(
            "/team/{id}/update/",
            get(update_team_page::<APP>).post(update_team::<APP>),
        )
        .route(
            "/team/{id}/delete/",
            get(delete_team_page::<APP>).post(delete_team::<APP>),
        )
        .route("/workers/", get(list_workers::<APP>))
        .route(
            "/worker/create/",
            get(create_worker_page::<APP>).post(create_worker::<APP>),
        )
        .route("/worker/{id}/", get(worker_detail::<APP>))
        .route(
            "/worker/{id}/update/",
            get(update_worker_page::<APP>).post(update_worker::<APP>),
        )
        .route(
            "/worker/{id}/delete/",
            get(delete_worker_page::<APP>).post(delete_worker::<APP>),
        )
        .route("/projects/", get(list_projects::<APP>))
        .route(
            "/project/create/",
            get(create_project_page::<APP>).post(create_project::<APP>),
        )
        .route("/project/{id}/", get(project_detail::<APP>))
        .route(
            "/project/{id}/update/",
            get(update_project_page::<APP>).post(update_project::<APP>),
        )
        .route(
            "/project/{id}/delete/",
            get(delete_project_page::<APP>).post(delete_project::<APP>),
        )
        .merge(lookup_routes::<APP, Tags>("tags", "tag"))
        .merge(lookup_routes::<APP, TaskTypes>("task-types", "task-type"))
        .merge(lookup_routes::<APP, Positions>("positions", "position"))
        .route_layer(from_fn_with_state(application, auth::<APP>))
}

fn lookup_routes<APP, L>(plural: &str, singular: &str) -> Router<APP>
where
    APP: ApplicationServices + Send + Sync + 'static,
    L: LookupRoute,
{
    Router::new()
        .route(&format!("/{plural}/"), get(list_lookups::<APP, L>))
        .route(
            &format!("/{singular}/create/"),
            get(create_lookup_page::<L>).post(create_lookup::<APP, L>),
        )
        .route(&format!("/{singular}/{{id}}/"), get(lookup_detail::<APP, L>))
        .route(
            &format!("/{singular}/{{id}}/update/"),
            get(update_lookup_page::<APP, L>).post(update_lookup::<APP, L>),
        )
        .route(
            &format!("/{singular}/{{id}}/delete/"),
            get(delete_lookup_page::<APP, L>).post(delete_lookup::<APP, L>),
        )
}

#[cfg(test)]
mod tests {
    use crate::core::application::tests::{MockAppInstanceParameters, MockApplication};
    use crate::core::config::Config;
    use crate::domain::auth::MockAuthService;
    use crate::inbound::http::router;
    use axum_test::TestServer;
    use http::StatusCode;
    use std::future;
    use tower_sessions::MemoryStore;

    #[tokio::test]
    async fn test_secure_session_default_config() {
        let config = Config::default();
        assert!(!config.secure_session);
    }

    #[tokio::test]
    async fn test_invalid_cors_host_is_skipped() {
        let app = MockApplication::mock_instance(MockAppInstanceParameters {
            config: Some(Config {
                cors_hosts: vec!["not a header\n".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        });
        let server = TestServer::new(router(app, MemoryStore::default())).unwrap();

        server.get("/healthz").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_lookup_routes_are_protected() {
        let mut auth_service = MockAuthService::new();
        auth_service
            .expect_authenticated()
            .times(3)
            .returning(|_| Box::pin(future::ready(Ok(false))));
        let app = MockApplication::mock_instance(MockAppInstanceParameters {
            auth_service: Some(auth_service),
            ..Default::default()
        });
        let server = TestServer::new(router(app, MemoryStore::default())).unwrap();

        for path in ["/tags/", "/task-types/", "/positions/"] {
            server
                .get(path)
                .await
                .assert_status(StatusCode::SEE_OTHER);
        }
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = MockApplication::mock_instance(MockAppInstanceParameters::default());
        let server = TestServer::new(router(app, MemoryStore::default())).unwrap();

        server.get("/nowhere/").await.assert_status_not_found();
    }
}
