use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("error writing session")]
    WriteSessionError,

    #[error("error reading session")]
    ReadSessionError,

    #[error(transparent)]
    TowerSessionsError(#[from] tower_sessions::session::Error),
}

/// Identity of the signed-in worker, stored in the session after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub worker_id: Uuid,
    pub username: String,
}

#[async_trait]
#[automock]
pub trait SessionPort: Send + Sync {
    async fn write_user_session(&self, params: UserSession) -> Result<(), SessionError>;
    async fn get_user_session(&self) -> Result<Option<UserSession>, SessionError>;
    /// Issues a new session id while keeping the stored data.
    async fn cycle_id(&self) -> Result<(), SessionError>;
    async fn flush(&self) -> Result<(), SessionError>;
    /// Reads the visit counter (absent counts as zero), stores it incremented
    /// by one and returns the new value.
    async fn increment_visit_times(&self) -> Result<u64, SessionError>;
}
