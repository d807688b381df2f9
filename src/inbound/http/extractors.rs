use crate::core::application::ApplicationServices;
use crate::domain::auth::{AuthService, ServiceCurrentUserParams};
use crate::domain::task_manager::data::Task;
use crate::domain::task_manager::{
    NAVIGATION_TASK_LIMIT, PendingTasksServiceParams, TaskManagerService,
};
use crate::errors::{AppError, internal_error};
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::response::Redirect;
use http::HeaderValue;
use http::request::Parts;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tower_sessions::Session;
use uuid::Uuid;

/// Pending tasks of the signed-in worker, attached to every page. Empty for
/// anonymous visitors.
pub struct Navigation(pub Vec<Task>);

impl<S> FromRequestParts<S> for Navigation
where
    S: ApplicationServices,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| internal_error(message))?;

        let user = state
            .auth_service()
            .current_user(ServiceCurrentUserParams { session })
            .await
            .map_err(internal_error)?;

        let tasks = state
            .task_manager_service()
            .pending_tasks(PendingTasksServiceParams {
                worker_id: user.map(|user| user.worker_id),
                limit: NAVIGATION_TASK_LIMIT,
            })
            .await
            .map_err(internal_error)?;

        Ok(Self(tasks))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Urlencoded form body decoded into `F`. Repeated keys fill multi-select
/// fields. `next` comes from the body first, then from the query string.
pub struct Submission<F> {
    pub form: F,
    pub next: Option<String>,
}

impl<S, F> FromRequest<S> for Submission<F>
where
    S: Send + Sync,
    F: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let query = req.uri().query().unwrap_or_default().to_string();
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(Some(e.body_text())))?;

        let form: F = serde_html_form::from_bytes(&body)
            .map_err(|e| AppError::BadRequest(Some(e.to_string())))?;
        let next = serde_html_form::from_bytes::<NextQuery>(&body)
            .ok()
            .and_then(|params| params.next)
            .or_else(|| {
                serde_html_form::from_str::<NextQuery>(&query)
                    .ok()
                    .and_then(|params| params.next)
            });

        Ok(Self { form, next })
    }
}

/// Keeps `next` only when it is a path on this site that fits in a
/// `Location` header.
pub fn safe_next(next: Option<String>) -> Option<String> {
    next.filter(|next| {
        next.starts_with('/')
            && !next.starts_with("//")
            && !next.starts_with("/\\")
            && !next.chars().any(char::is_control)
            && HeaderValue::from_str(next).is_ok()
    })
}

pub fn redirect_after_write(next: Option<String>, fallback: &str) -> Redirect {
    match safe_next(next) {
        Some(next) => Redirect::to(&next),
        None => Redirect::to(fallback),
    }
}

/// Malformed ids cannot name an existing record.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task_manager::forms::TaskForm;
    use axum::body::Body;

    #[test]
    fn test_safe_next() {
        assert_eq!(
            Some("/tasks/".to_string()),
            safe_next(Some("/tasks/".to_string()))
        );
        assert_eq!(None, safe_next(Some("https://evil.example/".to_string())));
        assert_eq!(None, safe_next(Some("//evil.example/".to_string())));
        assert_eq!(None, safe_next(Some("/\\evil.example/".to_string())));
        assert_eq!(None, safe_next(Some("/tasks/\nX".to_string())));
        assert_eq!(None, safe_next(Some("/tasks/\tX".to_string())));
        assert_eq!(None, safe_next(Some("".to_string())));
        assert_eq!(None, safe_next(None));
    }

    #[test]
    fn test_parse_id() {
        assert!(parse_id("0190a0c6-4a4e-7c3e-8d4f-0b5c6d7e8f90").is_ok());
        assert!(matches!(parse_id("42"), Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_submission_repeated_keys_and_next() {
        let request = Request::builder()
            .method("POST")
            .uri("/task/create/?next=/from-query/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(
                "name=Ship&assignees=a&assignees=b&tags=x&next=%2Ftasks%2F",
            ))
            .unwrap();

        let submission: Submission<TaskForm> =
            Submission::from_request(request, &()).await.unwrap();

        assert_eq!(Some("Ship".to_string()), submission.form.name);
        assert_eq!(vec!["a", "b"], submission.form.assignees);
        assert_eq!(vec!["x"], submission.form.tags);
        assert_eq!(Some("/tasks/".to_string()), submission.next);
    }

    #[tokio::test]
    async fn test_submission_next_from_query() {
        let request = Request::builder()
            .method("POST")
            .uri("/task/create/?next=/projects/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("name=Ship"))
            .unwrap();

        let submission: Submission<TaskForm> =
            Submission::from_request(request, &()).await.unwrap();

        assert!(submission.form.assignees.is_empty());
        assert_eq!(Some("/projects/".to_string()), submission.next);
    }
}
