use crate::core::application::ApplicationServices;
use crate::domain::auth::{AuthService, ServiceLogoutError, ServiceLogoutParams};
use crate::errors::{AppError, bad_request_invalid_session};
use crate::inbound::http::middleware::LOGIN_PATH;
use axum::extract::State;
use axum::response::Redirect;
use tower_sessions::Session;

pub async fn logout<S: ApplicationServices>(
    State(state): State<S>,
    session: Session,
) -> Result<Redirect, AppError> {
    state
        .auth_service()
        .logout(ServiceLogoutParams { session })
        .await
        .map_err(|e| match e {
            ServiceLogoutError::SessionError(_) => bad_request_invalid_session(),
        })?;

    Ok(Redirect::to(LOGIN_PATH))
}

#[cfg(test)]
mod tests {
    use crate::core::application::tests::{MockAppInstanceParameters, MockApplication};
    use crate::domain::auth::{MockAuthService, ServiceLogoutError};
    use crate::domain::session::SessionError;
    use crate::inbound::http::router;
    use axum_test::TestServer;
    use http::StatusCode;
    use std::future;
    use tower_sessions::MemoryStore;

    fn server(auth_service: MockAuthService) -> TestServer {
        let app = MockApplication::mock_instance(MockAppInstanceParameters {
            auth_service: Some(auth_service),
            ..Default::default()
        });

        TestServer::new(router(app, MemoryStore::default())).unwrap()
    }

    #[tokio::test]
    async fn test_logout() {
        let mut auth_service = MockAuthService::new();
        auth_service
            .expect_logout()
            .times(1)
            .returning(|_| Box::pin(future::ready(Ok(()))));

        let response = server(auth_service).post("/accounts/logout/").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!("/accounts/login/", response.header("location"));
    }

    #[tokio::test]
    async fn test_logout_session_error() {
        let mut auth_service = MockAuthService::new();
        auth_service.expect_logout().times(1).returning(|_| {
            Box::pin(future::ready(Err(ServiceLogoutError::SessionError(
                SessionError::WriteSessionError,
            ))))
        });

        let response = server(auth_service).post("/accounts/logout/").await;

        response.assert_status_bad_request();
    }
}
