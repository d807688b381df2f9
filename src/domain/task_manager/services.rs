use crate::domain::auth::password::hash_password_blocking;
use crate::domain::task_manager::data::{
    Choice, DashboardSummary, FormChoices, Lookup, LookupKind, Priority, PriorityChoice, Project,
    ProjectDetails, Task, TaskDetails, Team, TeamDetails, Worker, WorkerDetails, WorkerProfile,
    WorkerTaskBreakdown,
};
use crate::domain::task_manager::forms::{
    DUPLICATE_USERNAME, FormErrors, INVALID_CHOICE, NON_FIELD_ERRORS, ProjectData, TaskData,
    TeamData, field_for_constraint,
};
use crate::domain::task_manager::{
    CreateLookupDBParams, CreateLookupServiceParams, CreateProjectDBParams,
    CreateProjectServiceParams, CreateTaskDBParams, CreateTaskServiceParams, CreateTeamDBParams,
    CreateTeamServiceParams, CreateWorkerDBParams, CreateWorkerServiceParams, DatabaseRepository,
    ListPendingTasksDBParams, ListWorkerTasksDBParams, PendingTasksServiceParams,
    ServiceDeleteError, ServiceFormError, ServiceQueryError, TaskManagerService,
    UpdateLookupDBParams, UpdateLookupServiceParams, UpdateProjectDBParams,
    UpdateProjectServiceParams, UpdateTaskDBParams, UpdateTaskServiceParams, UpdateTeamDBParams,
    UpdateTeamServiceParams, UpdateWorkerDBParams, UpdateWorkerServiceParams,
};
use crate::outbound::db::error::Error as DatabaseError;
use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Service<DB>
where
    DB: DatabaseRepository,
{
    db: DB,
}

impl<DB> Service<DB>
where
    DB: DatabaseRepository,
{
    pub fn new(db: DB) -> Self {
        Self { db }
    }

    async fn worker_task_breakdown(
        &self,
        worker_id: Uuid,
    ) -> Result<WorkerTaskBreakdown, DatabaseError> {
        let done_tasks = self
            .db
            .list_worker_tasks(ListWorkerTasksDBParams {
                worker_id,
                is_completed: true,
            })
            .await?;
        let undone_tasks = self
            .db
            .list_worker_tasks(ListWorkerTasksDBParams {
                worker_id,
                is_completed: false,
            })
            .await?;

        Ok(WorkerTaskBreakdown {
            done_tasks,
            undone_tasks,
        })
    }
}

impl From<DatabaseError> for ServiceFormError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound => Self::NotFound,
            DatabaseError::InvalidReference(constraint) => Self::Invalid(FormErrors::single(
                field_for_constraint(&constraint),
                INVALID_CHOICE,
            )),
            DatabaseError::OnConflict => Self::Invalid(FormErrors::single(
                NON_FIELD_ERRORS,
                "A record with these values already exists.",
            )),
            other => Self::DatabaseError(other),
        }
    }
}

fn found<T>(record: Option<T>) -> Result<T, ServiceQueryError> {
    record.ok_or(ServiceQueryError::NotFound)
}

fn choices<T: Into<Choice>>(items: Vec<T>) -> Vec<Choice> {
    items.into_iter().map(Into::into).collect()
}

impl From<TaskData> for CreateTaskDBParams {
    fn from(value: TaskData) -> Self {
        Self {
            name: value.name,
            description: value.description,
            deadline: value.deadline,
            is_completed: value.is_completed,
            priority: value.priority,
            task_type_id: value.task_type_id,
            project_id: value.project_id,
            assignee_ids: value.assignee_ids,
            tag_ids: value.tag_ids,
        }
    }
}

impl From<TeamData> for CreateTeamDBParams {
    fn from(value: TeamData) -> Self {
        Self {
            name: value.name,
            team_lead_id: value.team_lead_id,
            worker_ids: value.worker_ids,
        }
    }
}

impl From<ProjectData> for CreateProjectDBParams {
    fn from(value: ProjectData) -> Self {
        Self {
            name: value.name,
            budget: value.budget,
            team_ids: value.team_ids,
        }
    }
}

#[async_trait]
impl<DB> TaskManagerService for Service<DB>
where
    DB: DatabaseRepository,
{
    async fn dashboard_summary(&self) -> Result<DashboardSummary, ServiceQueryError> {
        let counts = self.db.dashboard_counts().await?;
        let project_summaries = self.db.project_summaries().await?;
        let team_overview = self.db.list_teams().await?;

        Ok(DashboardSummary {
            counts,
            project_summaries,
            team_overview,
        })
    }

    async fn pending_tasks(
        &self,
        params: PendingTasksServiceParams,
    ) -> Result<Vec<Task>, ServiceQueryError> {
        let Some(worker_id) = params.worker_id else {
            return Ok(vec![]);
        };

        let tasks = self
            .db
            .list_pending_tasks(ListPendingTasksDBParams {
                worker_id,
                limit: params.limit,
            })
            .await?;

        Ok(tasks)
    }

    //--------------------------------------------------------------------------
    // Tasks
    //--------------------------------------------------------------------------

    async fn list_tasks(&self) -> Result<Vec<TaskDetails>, ServiceQueryError> {
        Ok(self.db.list_tasks().await?)
    }

    async fn get_task(&self, task_id: Uuid) -> Result<TaskDetails, ServiceQueryError> {
        found(self.db.find_task_by_id(task_id).await?)
    }

    async fn task_form_choices(&self) -> Result<FormChoices, ServiceQueryError> {
        Ok(FormChoices {
            task_types: choices(self.db.list_lookups(LookupKind::TaskType).await?),
            projects: choices(self.db.list_project_refs().await?),
            workers: choices(self.db.list_worker_refs().await?),
            tags: choices(self.db.list_lookups(LookupKind::Tag).await?),
            priorities: Priority::ALL.into_iter().map(PriorityChoice::from).collect(),
            ..Default::default()
        })
    }

    async fn create_task(&self, params: CreateTaskServiceParams) -> Result<Task, ServiceFormError> {
        let data = params.form.clean().map_err(ServiceFormError::Invalid)?;

        tracing::debug!(name = %data.name, "creating task");
        Ok(self.db.create_task(data.into()).await?)
    }

    async fn update_task(&self, params: UpdateTaskServiceParams) -> Result<Task, ServiceFormError> {
        let data = params.form.clean().map_err(ServiceFormError::Invalid)?;

        tracing::debug!(task_id = %params.task_id, "updating task");
        Ok(self
            .db
            .update_task(UpdateTaskDBParams {
                task_id: params.task_id,
                task: data.into(),
            })
            .await?)
    }

    async fn delete_task(&self, task_id: Uuid) -> Result<(), ServiceDeleteError> {
        tracing::debug!(%task_id, "deleting task");
        Ok(self.db.delete_task(task_id).await?)
    }

    //--------------------------------------------------------------------------
    // Teams
    //--------------------------------------------------------------------------

    async fn list_teams(&self) -> Result<Vec<TeamDetails>, ServiceQueryError> {
        Ok(self.db.list_teams().await?)
    }

    async fn get_team(&self, team_id: Uuid) -> Result<TeamDetails, ServiceQueryError> {
        found(self.db.find_team_by_id(team_id).await?)
    }

    async fn team_form_choices(&self) -> Result<FormChoices, ServiceQueryError> {
        Ok(FormChoices {
            workers: choices(self.db.list_worker_refs().await?),
            ..Default::default()
        })
    }

    async fn create_team(&self, params: CreateTeamServiceParams) -> Result<Team, ServiceFormError> {
        let data = params.form.clean().map_err(ServiceFormError::Invalid)?;

        tracing::debug!(name = %data.name, "creating team");
        Ok(self.db.create_team(data.into()).await?)
    }

    async fn update_team(&self, params: UpdateTeamServiceParams) -> Result<Team, ServiceFormError> {
        let data = params.form.clean().map_err(ServiceFormError::Invalid)?;

        tracing::debug!(team_id = %params.team_id, "updating team");
        Ok(self
            .db
            .update_team(UpdateTeamDBParams {
                team_id: params.team_id,
                team: data.into(),
            })
            .await?)
    }

    async fn delete_team(&self, team_id: Uuid) -> Result<(), ServiceDeleteError> {
        tracing::debug!(%team_id, "deleting team");
        Ok(self.db.delete_team(team_id).await?)
    }

    //--------------------------------------------------------------------------
    // Workers
    //--------------------------------------------------------------------------

    async fn list_workers(&self) -> Result<Vec<WorkerDetails>, ServiceQueryError> {
        Ok(self.db.list_workers().await?)
    }

    async fn get_worker(&self, worker_id: Uuid) -> Result<WorkerProfile, ServiceQueryError> {
        let details = found(self.db.find_worker_by_id(worker_id).await?)?;
        let tasks = self.worker_task_breakdown(worker_id).await?;

        Ok(WorkerProfile { details, tasks })
    }

    async fn worker_form_choices(&self) -> Result<FormChoices, ServiceQueryError> {
        Ok(FormChoices {
            positions: choices(self.db.list_lookups(LookupKind::Position).await?),
            ..Default::default()
        })
    }

    async fn create_worker(
        &self,
        params: CreateWorkerServiceParams,
    ) -> Result<Worker, ServiceFormError> {
        let data = params.form.clean().map_err(ServiceFormError::Invalid)?;
        let password_hash = hash_password_blocking(data.password).await?;

        tracing::debug!(username = %data.username, "creating worker");
        let result = self
            .db
            .create_worker(CreateWorkerDBParams {
                username: data.username,
                password_hash,
                first_name: data.first_name,
                last_name: data.last_name,
                email: data.email,
                position_id: data.position_id,
            })
            .await;

        match result {
            Ok(worker) => Ok(worker),
            Err(DatabaseError::OnConflict) => Err(ServiceFormError::Invalid(FormErrors::single(
                "username",
                DUPLICATE_USERNAME,
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn update_worker(
        &self,
        params: UpdateWorkerServiceParams,
    ) -> Result<Worker, ServiceFormError> {
        let data = params.form.clean().map_err(ServiceFormError::Invalid)?;

        tracing::debug!(worker_id = %params.worker_id, "updating worker");
        Ok(self
            .db
            .update_worker(UpdateWorkerDBParams {
                worker_id: params.worker_id,
                first_name: data.first_name,
                last_name: data.last_name,
                email: data.email,
                position_id: data.position_id,
            })
            .await?)
    }

    async fn delete_worker(&self, worker_id: Uuid) -> Result<(), ServiceDeleteError> {
        tracing::debug!(%worker_id, "deleting worker");
        Ok(self.db.delete_worker(worker_id).await?)
    }

    //--------------------------------------------------------------------------
    // Projects
    //--------------------------------------------------------------------------

    async fn list_projects(&self) -> Result<Vec<ProjectDetails>, ServiceQueryError> {
        Ok(self.db.list_projects().await?)
    }

    async fn get_project(&self, project_id: Uuid) -> Result<ProjectDetails, ServiceQueryError> {
        found(self.db.find_project_by_id(project_id).await?)
    }

    async fn project_form_choices(&self) -> Result<FormChoices, ServiceQueryError> {
        Ok(FormChoices {
            teams: choices(self.db.list_team_refs().await?),
            ..Default::default()
        })
    }

    async fn create_project(
        &self,
        params: CreateProjectServiceParams,
    ) -> Result<Project, ServiceFormError> {
        let data = params.form.clean().map_err(ServiceFormError::Invalid)?;

        tracing::debug!(name = %data.name, "creating project");
        Ok(self.db.create_project(data.into()).await?)
    }

    async fn update_project(
        &self,
        params: UpdateProjectServiceParams,
    ) -> Result<Project, ServiceFormError> {
        let data = params.form.clean().map_err(ServiceFormError::Invalid)?;

        tracing::debug!(project_id = %params.project_id, "updating project");
        Ok(self
            .db
            .update_project(UpdateProjectDBParams {
                project_id: params.project_id,
                project: data.into(),
            })
            .await?)
    }

    async fn delete_project(&self, project_id: Uuid) -> Result<(), ServiceDeleteError> {
        tracing::debug!(%project_id, "deleting project");
        Ok(self.db.delete_project(project_id).await?)
    }

    //--------------------------------------------------------------------------
    // Tags, task types, positions
    //--------------------------------------------------------------------------

    async fn list_lookups(&self, kind: LookupKind) -> Result<Vec<Lookup>, ServiceQueryError> {
        Ok(self.db.list_lookups(kind).await?)
    }

    async fn get_lookup(&self, kind: LookupKind, id: Uuid) -> Result<Lookup, ServiceQueryError> {
        found(self.db.find_lookup_by_id(kind, id).await?)
    }

    async fn create_lookup(
        &self,
        params: CreateLookupServiceParams,
    ) -> Result<Lookup, ServiceFormError> {
        let name = params.form.clean().map_err(ServiceFormError::Invalid)?;

        tracing::debug!(kind = ?params.kind, %name, "creating lookup");
        Ok(self
            .db
            .create_lookup(CreateLookupDBParams {
                kind: params.kind,
                name,
            })
            .await?)
    }

    async fn update_lookup(
        &self,
        params: UpdateLookupServiceParams,
    ) -> Result<Lookup, ServiceFormError> {
        let name = params.form.clean().map_err(ServiceFormError::Invalid)?;

        tracing::debug!(kind = ?params.kind, id = %params.id, "updating lookup");
        Ok(self
            .db
            .update_lookup(UpdateLookupDBParams {
                kind: params.kind,
                id: params.id,
                name,
            })
            .await?)
    }

    async fn delete_lookup(&self, kind: LookupKind, id: Uuid) -> Result<(), ServiceDeleteError> {
        tracing::debug!(?kind, %id, "deleting lookup");
        Ok(self.db.delete_lookup(kind, id).await?)
    }
}
