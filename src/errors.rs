use crate::domain::task_manager::forms::FormErrors;
use crate::domain::task_manager::{ServiceDeleteError, ServiceFormError, ServiceQueryError};
use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Serialize)]
pub struct AppErrorResponse {
    code: u16,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FormErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<serde_json::Value>,
}

/// Rejected form submission: field messages plus the input echoed back.
#[derive(Debug)]
pub struct FormRejection {
    pub errors: FormErrors,
    pub input: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("auth required")]
    Unauthorized(Option<String>),

    #[error("internal server error")]
    InternalServerError,

    #[error("bad request")]
    BadRequest(Option<String>),

    #[error("request path not found")]
    NotFound,

    #[error("submitted form is invalid")]
    InvalidForm(Box<FormRejection>),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidForm(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let status = self.to_string();

        let body = match self {
            AppError::Unauthorized(message) | AppError::BadRequest(message) => AppErrorResponse {
                code: status_code.as_u16(),
                status,
                message,
                errors: None,
                input: None,
            },
            AppError::NotFound | AppError::InternalServerError => AppErrorResponse {
                code: status_code.as_u16(),
                status,
                message: None,
                errors: None,
                input: None,
            },
            AppError::InvalidForm(rejection) => AppErrorResponse {
                code: status_code.as_u16(),
                status,
                message: None,
                errors: Some(rejection.errors),
                input: Some(rejection.input),
            },
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<ServiceQueryError> for AppError {
    fn from(value: ServiceQueryError) -> Self {
        match value {
            ServiceQueryError::NotFound => AppError::NotFound,
            err => internal_error(err),
        }
    }
}

impl From<ServiceDeleteError> for AppError {
    fn from(value: ServiceDeleteError) -> Self {
        match value {
            ServiceDeleteError::NotFound => AppError::NotFound,
            err => internal_error(err),
        }
    }
}

pub fn internal_error<E: ToString>(err: E) -> AppError {
    tracing::error!("{}", err.to_string());
    AppError::InternalServerError
}

/// Maps a failed form write; validation failures echo `input` back.
pub fn form_error<I: Serialize>(err: ServiceFormError, input: &I) -> AppError {
    match err {
        ServiceFormError::Invalid(errors) => invalid_form(errors, input),
        ServiceFormError::NotFound => AppError::NotFound,
        err => internal_error(err),
    }
}

pub fn invalid_form<I: Serialize>(errors: FormErrors, input: &I) -> AppError {
    match serde_json::to_value(input) {
        Ok(input) => AppError::InvalidForm(Box::new(FormRejection { errors, input })),
        Err(err) => internal_error(err),
    }
}

pub fn bad_request_invalid_session() -> AppError {
    AppError::BadRequest(Some("Invalid session".to_string()))
}
