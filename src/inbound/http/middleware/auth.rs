use crate::core::application::ApplicationServices;
use crate::domain::auth::{AuthService, ServiceAuthenticatedParams};
use crate::errors::{AppError, internal_error};
use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;

pub const LOGIN_PATH: &str = "/accounts/login/";

fn login_redirect(req: &Request) -> Redirect {
    let path = req
        .uri()
        .path_and_query()
        .map(|path| path.as_str())
        .unwrap_or("/");
    let next: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();

    Redirect::to(&format!("{LOGIN_PATH}?next={next}"))
}

pub async fn auth<S: ApplicationServices>(
    State(state): State<S>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_service = state.auth_service();
    let (mut parts, body) = req.into_parts();
    let session = Session::from_request_parts(&mut parts, &state)
        .await
        .map_err(|(_, message)| internal_error(message))?;

    req = Request::from_parts(parts, body);

    let is_authenticated = auth_service
        .authenticated(ServiceAuthenticatedParams { session })
        .await
        .map_err(internal_error)?;

    if !is_authenticated {
        tracing::debug!(uri = %req.uri(), "anonymous request, redirecting to login");
        return Ok(login_redirect(&req).into_response());
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use crate::core::application::tests::{MockAppInstanceParameters, MockApplication};
    use crate::domain::auth::{MockAuthService, ServiceAuthenticatedError};
    use crate::domain::session::SessionError;
    use crate::inbound::http::middleware::auth;
    use axum::Router;
    use axum::middleware::from_fn_with_state;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum_extra::extract::cookie::SameSite;
    use axum_test::TestServer;
    use http::StatusCode;
    use std::future;
    use time::Duration;
    use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

    pub async fn example() -> impl IntoResponse {
        (StatusCode::OK, "")
    }

    fn server(auth_service: MockAuthService) -> TestServer {
        let session_store = MemoryStore::default();
        let session_layer = SessionManagerLayer::new(session_store)
            .with_secure(false)
            .with_expiry(Expiry::OnInactivity(Duration::hours(1)))
            .with_same_site(SameSite::Lax);

        let app = MockApplication::mock_instance(MockAppInstanceParameters {
            auth_service: Some(auth_service),
            ..Default::default()
        });

        let router = Router::new()
            .route("/example/", get(example))
            .route_layer(from_fn_with_state(app, auth::<MockApplication>))
            .layer(session_layer);

        TestServer::new(router).unwrap()
    }

    #[tokio::test]
    async fn test_authenticated() {
        let mut auth_service = MockAuthService::new();
        auth_service
            .expect_authenticated()
            .times(1)
            .returning(|_| Box::pin(future::ready(Ok(true))));

        let response = server(auth_service).get("/example/").await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_anonymous_redirects_to_login() {
        let mut auth_service = MockAuthService::new();
        auth_service
            .expect_authenticated()
            .times(1)
            .returning(|_| Box::pin(future::ready(Ok(false))));

        let response = server(auth_service).get("/example/?page=2").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            "/accounts/login/?next=%2Fexample%2F%3Fpage%3D2",
            response.header("location")
        );
    }

    #[tokio::test]
    async fn test_session_error() {
        let mut auth_service = MockAuthService::new();
        auth_service.expect_authenticated().times(1).returning(|_| {
            Box::pin(future::ready(Err(ServiceAuthenticatedError::SessionError(
                SessionError::ReadSessionError,
            ))))
        });

        let response = server(auth_service).get("/example/").await;

        response.assert_status_internal_server_error();
    }
}
