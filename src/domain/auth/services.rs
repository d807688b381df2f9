use crate::domain::auth::password::{verify_dummy_password, verify_password_blocking};
use crate::domain::auth::{
    AuthService, CredentialsRepository, ServiceAuthenticatedError, ServiceAuthenticatedParams,
    ServiceCurrentUserParams, ServiceLoginError, ServiceLoginParams, ServiceLoginResult,
    ServiceLogoutError, ServiceLogoutParams, ServiceRecordVisitParams,
};
use crate::domain::session::{SessionError, SessionPort, UserSession};
use crate::outbound::session::SessionFactory;
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Service<SESSION, REPO, F>
where
    SESSION: SessionPort + Send + Sync + 'static,
    REPO: CredentialsRepository + Send + Sync + 'static,
    F: SessionFactory<SESSION> + Send + Sync + 'static,
{
    credentials: Arc<REPO>,
    session_factory: F,
    _session: PhantomData<SESSION>,
}

impl<SESSION, REPO, F> Service<SESSION, REPO, F>
where
    SESSION: SessionPort + Send + Sync + 'static,
    REPO: CredentialsRepository + Send + Sync + 'static,
    F: SessionFactory<SESSION> + Send + Sync + 'static,
{
    pub fn new(credentials: REPO, session_adapter_factory: F) -> Self {
        Self {
            credentials: Arc::new(credentials),
            session_factory: session_adapter_factory,
            _session: PhantomData,
        }
    }
}

#[async_trait]
impl<SESSION, REPO, F> AuthService for Service<SESSION, REPO, F>
where
    SESSION: SessionPort + Send + Sync + 'static,
    REPO: CredentialsRepository + Send + Sync + 'static,
    F: SessionFactory<SESSION> + Send + Sync + 'static,
{
    async fn login(
        &self,
        params: ServiceLoginParams,
    ) -> Result<ServiceLoginResult, ServiceLoginError> {
        let session = self.session_factory.build(params.session);
        let Some(credentials) = self
            .credentials
            .find_credentials_by_username(params.username)
            .await?
        else {
            verify_dummy_password(params.password).await?;
            return Err(ServiceLoginError::InvalidCredentials);
        };

        if !verify_password_blocking(credentials.password_hash.clone(), params.password).await? {
            tracing::debug!(username = %credentials.username, "rejected login");
            return Err(ServiceLoginError::InvalidCredentials);
        }

        // new id on privilege change, session data such as the visit counter survives
        session.cycle_id().await?;
        session
            .write_user_session(UserSession {
                worker_id: credentials.worker_id,
                username: credentials.username.clone(),
            })
            .await?;
        tracing::debug!(username = %credentials.username, "worker logged in");

        Ok(ServiceLoginResult {
            worker_id: credentials.worker_id,
            username: credentials.username,
        })
    }

    async fn logout(&self, params: ServiceLogoutParams) -> Result<(), ServiceLogoutError> {
        let session = self.session_factory.build(params.session);
        session.flush().await?;

        Ok(())
    }

    async fn authenticated(
        &self,
        params: ServiceAuthenticatedParams,
    ) -> Result<bool, ServiceAuthenticatedError> {
        let session = self.session_factory.build(params.session);

        let Some(user_session) = session.get_user_session().await? else {
            return Ok(false);
        };

        if !self.credentials.worker_exists(user_session.worker_id).await? {
            tracing::debug!(worker_id = %user_session.worker_id, "session of deleted worker");
            session.flush().await?;

            return Ok(false);
        }

        Ok(true)
    }

    async fn current_user(
        &self,
        params: ServiceCurrentUserParams,
    ) -> Result<Option<UserSession>, SessionError> {
        let session = self.session_factory.build(params.session);

        session.get_user_session().await
    }

    async fn record_visit(&self, params: ServiceRecordVisitParams) -> Result<u64, SessionError> {
        let session = self.session_factory.build(params.session);

        session.increment_visit_times().await
    }
}
