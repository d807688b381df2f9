use crate::core::application::ApplicationServices;
use crate::domain::auth::{AuthService, ServiceLoginError, ServiceLoginParams};
use crate::domain::task_manager::forms::{FormErrors, REQUIRED};
use crate::errors::{AppError, internal_error, invalid_form};
use crate::inbound::http::extractors::{
    Navigation, NextQuery, Submission, redirect_after_write, safe_next,
};
use crate::inbound::http::responses::shared::{ResponseType, Segment, page_response};
use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: Option<String>,
    #[serde(default, skip_serializing)]
    password: Option<String>,
}

impl LoginForm {
    fn clean(&self) -> Result<(String, String), FormErrors> {
        let username = self
            .username
            .as_deref()
            .map(str::trim)
            .filter(|username| !username.is_empty());
        let password = self
            .password
            .as_deref()
            .filter(|password| !password.is_empty());

        match (username, password) {
            (Some(username), Some(password)) => Ok((username.to_string(), password.to_string())),
            _ => {
                let mut errors = FormErrors::new();
                if username.is_none() {
                    errors.add("username", REQUIRED);
                }
                if password.is_none() {
                    errors.add("password", REQUIRED);
                }
                Err(errors)
            }
        }
    }
}

#[derive(Serialize)]
struct LoginPageData {
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<String>,
}

pub async fn login_page(
    Navigation(navigation): Navigation,
    Query(query): Query<NextQuery>,
) -> impl IntoResponse {
    Json(page_response(
        LoginPageData {
            next: safe_next(query.next),
        },
        ResponseType::Login,
        Segment::Login,
        navigation,
    ))
}

pub async fn login<S: ApplicationServices>(
    State(state): State<S>,
    session: Session,
    Submission { form, next }: Submission<LoginForm>,
) -> Result<Redirect, AppError> {
    let (username, password) = form.clean().map_err(|errors| invalid_form(errors, &form))?;

    let result = state
        .auth_service()
        .login(ServiceLoginParams {
            session,
            username,
            password,
        })
        .await
        .map_err(|e| match e {
            ServiceLoginError::InvalidCredentials => {
                AppError::Unauthorized(Some(INVALID_LOGIN.to_string()))
            }
            e => internal_error(e),
        })?;

    tracing::debug!(username = %result.username, "login successful, redirecting worker");
    Ok(redirect_after_write(next, "/"))
}

#[cfg(test)]
mod tests {
    use crate::core::application::tests::{
        MockAppInstanceParameters, MockApplication, manager_with_navigation,
    };
    use crate::domain::auth::{MockAuthService, ServiceLoginError, ServiceLoginResult};
    use crate::inbound::http::router;
    use axum_test::TestServer;
    use http::StatusCode;
    use std::future;
    use tower_sessions::MemoryStore;
    use uuid::Uuid;

    fn server(auth_service: MockAuthService) -> TestServer {
        let app = MockApplication::mock_instance(MockAppInstanceParameters {
            auth_service: Some(auth_service),
            task_manager_service: Some(manager_with_navigation()),
            ..Default::default()
        });

        TestServer::new(router(app, MemoryStore::default())).unwrap()
    }

    #[tokio::test]
    async fn test_login_page() {
        let mut auth_service = MockAuthService::new();
        auth_service
            .expect_current_user()
            .returning(|_| Box::pin(future::ready(Ok(None))));

        let response = server(auth_service)
            .get("/accounts/login/")
            .add_query_param("next", "/tasks/")
            .await;

        response.assert_status_ok();
        let body = response.json::<serde_json::Value>();
        assert_eq!("login", body["segment"]);
        assert_eq!("/tasks/", body["data"]["next"]);
    }

    #[tokio::test]
    async fn test_login() {
        let mut auth_service = MockAuthService::new();
        auth_service
            .expect_login()
            .withf(|params| params.username == "alice" && params.password == "pale-ocean-42")
            .times(1)
            .returning(|_| {
                Box::pin(future::ready(Ok(ServiceLoginResult {
                    worker_id: Uuid::nil(),
                    username: "alice".to_string(),
                })))
            });

        let response = server(auth_service)
            .post("/accounts/login/")
            .form(&[
                ("username", "alice"),
                ("password", "pale-ocean-42"),
                ("next", "/tasks/"),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!("/tasks/", response.header("location"));
    }

    #[tokio::test]
    async fn test_login_ignores_foreign_next() {
        let mut auth_service = MockAuthService::new();
        auth_service.expect_login().times(1).returning(|_| {
            Box::pin(future::ready(Ok(ServiceLoginResult {
                worker_id: Uuid::nil(),
                username: "alice".to_string(),
            })))
        });

        let response = server(auth_service)
            .post("/accounts/login/")
            .form(&[
                ("username", "alice"),
                ("password", "pale-ocean-42"),
                ("next", "https://evil.example/"),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!("/", response.header("location"));
    }

    #[tokio::test]
    async fn test_login_invalid_credentials() {
        let mut auth_service = MockAuthService::new();
        auth_service
            .expect_login()
            .times(1)
            .returning(|_| Box::pin(future::ready(Err(ServiceLoginError::InvalidCredentials))));

        let response = server(auth_service)
            .post("/accounts/login/")
            .form(&[("username", "alice"), ("password", "wrong-password")])
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_login_missing_password() {
        let mut auth_service = MockAuthService::new();
        auth_service.expect_login().times(0);

        let response = server(auth_service)
            .post("/accounts/login/")
            .form(&[("username", "alice")])
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body = response.json::<serde_json::Value>();
        assert_eq!("alice", body["input"]["username"]);
        assert!(body["input"].get("password").is_none());
        assert!(body["errors"]["password"].is_array());
    }
}
