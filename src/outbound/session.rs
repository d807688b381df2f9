use crate::domain::session::{SessionError, SessionPort, UserSession};
use async_trait::async_trait;
use mockall::automock;
use tower_sessions::Session;

const SESSION_USER: &str = "user";
const SESSION_VISIT_TIMES: &str = "visit_times";

#[automock]
pub trait SessionFactory<S: SessionPort> {
    fn build(&self, session: Session) -> S;
}

#[derive(Debug, Clone)]
pub struct SessionAdapterFactory {}

#[derive(Debug, Clone)]
pub struct SessionAdapter {
    session: Session,
}

impl Default for SessionAdapterFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionAdapterFactory {
    pub fn new() -> Self {
        Self {}
    }
}

impl SessionFactory<SessionAdapter> for SessionAdapterFactory {
    fn build(&self, session: Session) -> SessionAdapter {
        SessionAdapter::new(session)
    }
}

impl SessionAdapter {
    fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionPort for SessionAdapter {
    async fn write_user_session(&self, params: UserSession) -> Result<(), SessionError> {
        self.session.insert(SESSION_USER, params).await?;

        Ok(())
    }

    async fn get_user_session(&self) -> Result<Option<UserSession>, SessionError> {
        let user = self.session.get::<UserSession>(SESSION_USER).await?;

        Ok(user)
    }

    async fn cycle_id(&self) -> Result<(), SessionError> {
        self.session.cycle_id().await?;

        Ok(())
    }

    async fn flush(&self) -> Result<(), SessionError> {
        self.session.flush().await?;
        self.session.save().await?;

        Ok(())
    }

    async fn increment_visit_times(&self) -> Result<u64, SessionError> {
        let visit_times = self
            .session
            .get::<u64>(SESSION_VISIT_TIMES)
            .await?
            .unwrap_or_default()
            + 1;
        self.session.insert(SESSION_VISIT_TIMES, visit_times).await?;

        Ok(visit_times)
    }
}
