use crate::core::config::Config;
use crate::domain::auth::AuthService;
use crate::domain::task_manager::TaskManagerService;
use std::sync::Arc;

pub trait ApplicationServices: Clone + Send + Sync + 'static {
    type AUTH: AuthService + Send;
    type MANAGER: TaskManagerService + Send;

    fn config(&self) -> Config;

    fn auth_service(&self) -> Arc<Self::AUTH>;

    fn task_manager_service(&self) -> Arc<Self::MANAGER>;
}

pub struct Application<AUTH, MANAGER>
where
    AUTH: AuthService + Send + Sync + 'static,
    MANAGER: TaskManagerService + Send + Sync + 'static,
{
    config: Config,
    auth_service: Arc<AUTH>,
    task_manager_service: Arc<MANAGER>,
}

impl<AUTH, MANAGER> Application<AUTH, MANAGER>
where
    AUTH: AuthService + Send + Sync + 'static,
    MANAGER: TaskManagerService + Send + Sync + 'static,
{
    pub fn new(config: Config, auth_service: AUTH, task_manager_service: MANAGER) -> Self {
        Self {
            config,
            auth_service: Arc::new(auth_service),
            task_manager_service: Arc::new(task_manager_service),
        }
    }
}

impl<AUTH, MANAGER> Clone for Application<AUTH, MANAGER>
where
    AUTH: AuthService + Send + Sync + 'static,
    MANAGER: TaskManagerService + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            auth_service: self.auth_service.clone(),
            task_manager_service: self.task_manager_service.clone(),
        }
    }
}

impl<AUTH, MANAGER> ApplicationServices for Application<AUTH, MANAGER>
where
    AUTH: AuthService + Send + Sync + 'static,
    MANAGER: TaskManagerService + Send + Sync + 'static,
{
    type AUTH = AUTH;
    type MANAGER = MANAGER;

    fn config(&self) -> Config {
        self.config.clone()
    }

    fn auth_service(&self) -> Arc<Self::AUTH> {
        self.auth_service.clone()
    }

    fn task_manager_service(&self) -> Arc<Self::MANAGER> {
        self.task_manager_service.clone()
    }
}
