use crate::domain::auth::WorkerCredentials;
use crate::domain::auth::password::PasswordError;
use crate::domain::session::{SessionError, UserSession};
use crate::outbound::db::error::Error as DatabaseError;
use async_trait::async_trait;
use thiserror::Error;
use tower_sessions::Session;
use uuid::Uuid;

////////////////////////////////////////////////////////////////////////////////////////////////////
// Service
////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait AuthService: Send + Sync {
    async fn login(
        &self,
        params: ServiceLoginParams,
    ) -> Result<ServiceLoginResult, ServiceLoginError>;
    async fn logout(&self, params: ServiceLogoutParams) -> Result<(), ServiceLogoutError>;
    async fn authenticated(
        &self,
        params: ServiceAuthenticatedParams,
    ) -> Result<bool, ServiceAuthenticatedError>;
    async fn current_user(
        &self,
        params: ServiceCurrentUserParams,
    ) -> Result<Option<UserSession>, SessionError>;
    async fn record_visit(&self, params: ServiceRecordVisitParams) -> Result<u64, SessionError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Ports
////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait CredentialsRepository: Send + Sync + 'static {
    async fn find_credentials_by_username(
        &self,
        username: String,
    ) -> Result<Option<WorkerCredentials>, DatabaseError>;
    async fn worker_exists(&self, worker_id: Uuid) -> Result<bool, DatabaseError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Results
////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct ServiceLoginResult {
    pub worker_id: Uuid,
    pub username: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Params
////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct ServiceLoginParams {
    pub session: Session,
    pub username: String,
    pub password: String,
}

pub struct ServiceLogoutParams {
    pub session: Session,
}

pub struct ServiceAuthenticatedParams {
    pub session: Session,
}

pub struct ServiceCurrentUserParams {
    pub session: Session,
}

pub struct ServiceRecordVisitParams {
    pub session: Session,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Error)]
pub enum ServiceLoginError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    SessionError(#[from] SessionError),

    #[error(transparent)]
    PasswordError(#[from] PasswordError),

    #[error("failed to load credentials because of database error")]
    DatabaseError(#[from] DatabaseError),
}

#[derive(Debug, Error)]
pub enum ServiceLogoutError {
    #[error(transparent)]
    SessionError(#[from] SessionError),
}

#[derive(Debug, Error)]
pub enum ServiceAuthenticatedError {
    #[error(transparent)]
    SessionError(#[from] SessionError),

    #[error("failed to check worker because of database error")]
    DatabaseError(#[from] DatabaseError),
}
