use crate::domain::task_manager::data::{
    DashboardCounts, DashboardSummary, FormChoices, Lookup, LookupKind, Priority, Project,
    ProjectDetails, ProjectRef, ProjectSummary, Task, TaskDetails, Team, TeamDetails, TeamRef, Worker,
    WorkerDetails, WorkerProfile, WorkerRef,
};
use crate::domain::task_manager::forms::{
    FormErrors, LookupForm, ProjectForm, TaskForm, TeamForm, WorkerCreationForm, WorkerUpdateForm,
};
use crate::outbound::db::error::Error as DatabaseError;
use async_trait::async_trait;
use thiserror::Error;
use time::Date;
use uuid::Uuid;

/// Number of pending tasks shown in the navigation of every page.
pub const NAVIGATION_TASK_LIMIT: i64 = 10;

////////////////////////////////////////////////////////////////////////////////////////////////////
// Service
////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait TaskManagerService: Send + Sync {
    async fn dashboard_summary(&self) -> Result<DashboardSummary, ServiceQueryError>;
    async fn pending_tasks(
        &self,
        params: PendingTasksServiceParams,
    ) -> Result<Vec<Task>, ServiceQueryError>;

    async fn list_tasks(&self) -> Result<Vec<TaskDetails>, ServiceQueryError>;
    async fn get_task(&self, task_id: Uuid) -> Result<TaskDetails, ServiceQueryError>;
    async fn task_form_choices(&self) -> Result<FormChoices, ServiceQueryError>;
    async fn create_task(&self, params: CreateTaskServiceParams) -> Result<Task, ServiceFormError>;
    async fn update_task(&self, params: UpdateTaskServiceParams) -> Result<Task, ServiceFormError>;
    async fn delete_task(&self, task_id: Uuid) -> Result<(), ServiceDeleteError>;

    async fn list_teams(&self) -> Result<Vec<TeamDetails>, ServiceQueryError>;
    async fn get_team(&self, team_id: Uuid) -> Result<TeamDetails, ServiceQueryError>;
    async fn team_form_choices(&self) -> Result<FormChoices, ServiceQueryError>;
    async fn create_team(&self, params: CreateTeamServiceParams) -> Result<Team, ServiceFormError>;
    async fn update_team(&self, params: UpdateTeamServiceParams) -> Result<Team, ServiceFormError>;
    async fn delete_team(&self, team_id: Uuid) -> Result<(), ServiceDeleteError>;

    async fn list_workers(&self) -> Result<Vec<WorkerDetails>, ServiceQueryError>;
    async fn get_worker(&self, worker_id: Uuid) -> Result<WorkerProfile, ServiceQueryError>;
    async fn worker_form_choices(&self) -> Result<FormChoices, ServiceQueryError>;
    async fn create_worker(
        &self,
        params: CreateWorkerServiceParams,
    ) -> Result<Worker, ServiceFormError>;
    async fn update_worker(
        &self,
        params: UpdateWorkerServiceParams,
    ) -> Result<Worker, ServiceFormError>;
    async fn delete_worker(&self, worker_id: Uuid) -> Result<(), ServiceDeleteError>;

    async fn list_projects(&self) -> Result<Vec<ProjectDetails>, ServiceQueryError>;
    async fn get_project(&self, project_id: Uuid) -> Result<ProjectDetails, ServiceQueryError>;
    async fn project_form_choices(&self) -> Result<FormChoices, ServiceQueryError>;
    async fn create_project(
        &self,
        params: CreateProjectServiceParams,
    ) -> Result<Project, ServiceFormError>;
    async fn update_project(
        &self,
        params: UpdateProjectServiceParams,
    ) -> Result<Project, ServiceFormError>;
    async fn delete_project(&self, project_id: Uuid) -> Result<(), ServiceDeleteError>;

    async fn list_lookups(&self, kind: LookupKind) -> Result<Vec<Lookup>, ServiceQueryError>;
    async fn get_lookup(&self, kind: LookupKind, id: Uuid) -> Result<Lookup, ServiceQueryError>;
    async fn create_lookup(
        &self,
        params: CreateLookupServiceParams,
    ) -> Result<Lookup, ServiceFormError>;
    async fn update_lookup(
        &self,
        params: UpdateLookupServiceParams,
    ) -> Result<Lookup, ServiceFormError>;
    async fn delete_lookup(&self, kind: LookupKind, id: Uuid) -> Result<(), ServiceDeleteError>;
}

//------------------------------------------------------------------------------
// Params
//------------------------------------------------------------------------------

pub struct PendingTasksServiceParams {
    /// `None` for an anonymous caller.
    pub worker_id: Option<Uuid>,
    pub limit: i64,
}

pub struct CreateTaskServiceParams {
    pub form: TaskForm,
}

pub struct UpdateTaskServiceParams {
    pub task_id: Uuid,
    pub form: TaskForm,
}

pub struct CreateTeamServiceParams {
    pub form: TeamForm,
}

pub struct UpdateTeamServiceParams {
    pub team_id: Uuid,
    pub form: TeamForm,
}

pub struct CreateWorkerServiceParams {
    pub form: WorkerCreationForm,
}

pub struct UpdateWorkerServiceParams {
    pub worker_id: Uuid,
    pub form: WorkerUpdateForm,
}

pub struct CreateProjectServiceParams {
    pub form: ProjectForm,
}

pub struct UpdateProjectServiceParams {
    pub project_id: Uuid,
    pub form: ProjectForm,
}

pub struct CreateLookupServiceParams {
    pub kind: LookupKind,
    pub form: LookupForm,
}

pub struct UpdateLookupServiceParams {
    pub kind: LookupKind,
    pub id: Uuid,
    pub form: LookupForm,
}

//------------------------------------------------------------------------------
// Errors
//------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ServiceQueryError {
    #[error("the requested record does not exist")]
    NotFound,

    #[error("query failed because of database error")]
    DatabaseError(#[from] DatabaseError),
}

#[derive(Debug, Error)]
pub enum ServiceFormError {
    #[error("submitted form is invalid")]
    Invalid(FormErrors),

    #[error("the record being updated does not exist")]
    NotFound,

    #[error("failed to hash password")]
    PasswordError(#[from] crate::domain::auth::password::PasswordError),

    #[error("write failed because of database error")]
    DatabaseError(DatabaseError),
}

#[derive(Debug, Error)]
pub enum ServiceDeleteError {
    #[error("the record being deleted does not exist")]
    NotFound,

    #[error("delete failed because of database error")]
    DatabaseError(DatabaseError),
}

impl From<DatabaseError> for ServiceDeleteError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound => Self::NotFound,
            other => Self::DatabaseError(other),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// Database Repository
////////////////////////////////////////////////////////////////////////////////////////////////////

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait DatabaseRepository: Send + Sync + 'static {
    async fn dashboard_counts(&self) -> Result<DashboardCounts, DatabaseError>;
    async fn project_summaries(&self) -> Result<Vec<ProjectSummary>, DatabaseError>;
    async fn list_pending_tasks(
        &self,
        params: ListPendingTasksDBParams,
    ) -> Result<Vec<Task>, DatabaseError>;
    async fn list_worker_tasks(
        &self,
        params: ListWorkerTasksDBParams,
    ) -> Result<Vec<Task>, DatabaseError>;

    async fn list_tasks(&self) -> Result<Vec<TaskDetails>, DatabaseError>;
    async fn find_task_by_id(&self, task_id: Uuid) -> Result<Option<TaskDetails>, DatabaseError>;
    async fn create_task(&self, params: CreateTaskDBParams) -> Result<Task, DatabaseError>;
    async fn update_task(&self, params: UpdateTaskDBParams) -> Result<Task, DatabaseError>;
    async fn delete_task(&self, task_id: Uuid) -> Result<(), DatabaseError>;

    async fn list_teams(&self) -> Result<Vec<TeamDetails>, DatabaseError>;
    async fn list_team_refs(&self) -> Result<Vec<TeamRef>, DatabaseError>;
    async fn find_team_by_id(&self, team_id: Uuid) -> Result<Option<TeamDetails>, DatabaseError>;
    async fn create_team(&self, params: CreateTeamDBParams) -> Result<Team, DatabaseError>;
    async fn update_team(&self, params: UpdateTeamDBParams) -> Result<Team, DatabaseError>;
    async fn delete_team(&self, team_id: Uuid) -> Result<(), DatabaseError>;

    async fn list_workers(&self) -> Result<Vec<WorkerDetails>, DatabaseError>;
    async fn list_worker_refs(&self) -> Result<Vec<WorkerRef>, DatabaseError>;
    async fn find_worker_by_id(
        &self,
        worker_id: Uuid,
    ) -> Result<Option<WorkerDetails>, DatabaseError>;
    async fn create_worker(&self, params: CreateWorkerDBParams) -> Result<Worker, DatabaseError>;
    async fn update_worker(&self, params: UpdateWorkerDBParams) -> Result<Worker, DatabaseError>;
    async fn delete_worker(&self, worker_id: Uuid) -> Result<(), DatabaseError>;

    async fn list_projects(&self) -> Result<Vec<ProjectDetails>, DatabaseError>;
    async fn list_project_refs(&self) -> Result<Vec<ProjectRef>, DatabaseError>;
    async fn find_project_by_id(
        &self,
        project_id: Uuid,
    ) -> Result<Option<ProjectDetails>, DatabaseError>;
    async fn create_project(&self, params: CreateProjectDBParams)
    -> Result<Project, DatabaseError>;
    async fn update_project(&self, params: UpdateProjectDBParams)
    -> Result<Project, DatabaseError>;
    async fn delete_project(&self, project_id: Uuid) -> Result<(), DatabaseError>;

    async fn list_lookups(&self, kind: LookupKind) -> Result<Vec<Lookup>, DatabaseError>;
    async fn find_lookup_by_id(
        &self,
        kind: LookupKind,
        id: Uuid,
    ) -> Result<Option<Lookup>, DatabaseError>;
    async fn create_lookup(&self, params: CreateLookupDBParams) -> Result<Lookup, DatabaseError>;
    async fn update_lookup(&self, params: UpdateLookupDBParams) -> Result<Lookup, DatabaseError>;
    async fn delete_lookup(&self, kind: LookupKind, id: Uuid) -> Result<(), DatabaseError>;
}

//------------------------------------------------------------------------------
// Worker Tasks
//------------------------------------------------------------------------------

pub struct ListPendingTasksDBParams {
    pub worker_id: Uuid,
    pub limit: i64,
}

pub struct ListWorkerTasksDBParams {
    pub worker_id: Uuid,
    pub is_completed: bool,
}

//------------------------------------------------------------------------------
// Create / Update Task
//------------------------------------------------------------------------------

pub struct CreateTaskDBParams {
    pub name: String,
    pub description: String,
    pub deadline: Date,
    pub is_completed: bool,
    pub priority: Priority,
    pub task_type_id: Uuid,
    pub project_id: Option<Uuid>,
    pub assignee_ids: Vec<Uuid>,
    pub tag_ids: Vec<Uuid>,
}

pub struct UpdateTaskDBParams {
    pub task_id: Uuid,
    pub task: CreateTaskDBParams,
}

//------------------------------------------------------------------------------
// Create / Update Team
//------------------------------------------------------------------------------

pub struct CreateTeamDBParams {
    pub name: String,
    pub team_lead_id: Uuid,
    pub worker_ids: Vec<Uuid>,
}

pub struct UpdateTeamDBParams {
    pub team_id: Uuid,
    pub team: CreateTeamDBParams,
}

//------------------------------------------------------------------------------
// Create / Update Worker
//------------------------------------------------------------------------------

pub struct CreateWorkerDBParams {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position_id: Option<Uuid>,
}

pub struct UpdateWorkerDBParams {
    pub worker_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position_id: Option<Uuid>,
}

//------------------------------------------------------------------------------
// Create / Update Project
//------------------------------------------------------------------------------

pub struct CreateProjectDBParams {
    pub name: String,
    pub budget: i64,
    pub team_ids: Vec<Uuid>,
}

pub struct UpdateProjectDBParams {
    pub project_id: Uuid,
    pub project: CreateProjectDBParams,
}

//------------------------------------------------------------------------------
// Create / Update Lookup
//------------------------------------------------------------------------------

pub struct CreateLookupDBParams {
    pub kind: LookupKind,
    pub name: String,
}

pub struct UpdateLookupDBParams {
    pub kind: LookupKind,
    pub id: Uuid,
    pub name: String,
}
