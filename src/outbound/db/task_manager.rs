use crate::domain::task_manager::data::{
    DashboardCounts, Lookup, LookupKind, Project, ProjectDetails, ProjectRef, ProjectSummary, Task,
    TaskDetails, Team, TeamDetails, TeamRef, Worker, WorkerDetails, WorkerRef,
};
use crate::domain::task_manager::{
    CreateLookupDBParams, CreateProjectDBParams, CreateTaskDBParams, CreateTeamDBParams,
    CreateWorkerDBParams, DatabaseRepository, ListPendingTasksDBParams, ListWorkerTasksDBParams,
    UpdateLookupDBParams, UpdateProjectDBParams, UpdateTaskDBParams, UpdateTeamDBParams,
    UpdateWorkerDBParams,
};
use crate::outbound::db::error::Error;
use crate::outbound::db::models::{
    DashboardCountsRow, LinkedNamedRow, LinkedWorkerRow, NamedRow, NamedRowList, ProjectRow,
    ProjectSummaryRow, TaskListRow, TaskRow, TaskRowList, TeamRow, WorkerListRow, WorkerRefRow,
    WorkerRefRowList, WorkerRow, group_by_owner,
};
use crate::outbound::db::repository::Repository;
use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

const TASK_COLUMNS: &str =
    "t.id, t.name, t.description, t.deadline, t.is_completed, t.priority, t.task_type_id, t.project_id";
const WORKER_COLUMNS: &str = "w.id, w.username, w.first_name, w.last_name, w.email, w.position_id";

fn ids<T>(records: &[T], id: impl Fn(&T) -> Uuid) -> Vec<Uuid> {
    records.iter().map(id).collect()
}

fn take<T>(grouped: &mut HashMap<Uuid, Vec<T>>, owner_id: &Uuid) -> Vec<T> {
    grouped.remove(owner_id).unwrap_or_default()
}

fn named<T: From<NamedRow>>(rows: Vec<NamedRow>) -> Vec<T> {
    NamedRowList(rows).into()
}

fn deleted(rows_affected: u64) -> Result<(), Error> {
    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Replaces every link row of `owner_id` in a join table with `linked_ids`.
async fn replace_links(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    owner_column: &str,
    linked_column: &str,
    owner_id: Uuid,
    linked_ids: &[Uuid],
) -> Result<(), Error> {
    let delete = format!("delete from {table} where {owner_column} = $1");
    sqlx::query(&delete)
        .bind(owner_id)
        .execute(&mut **tx)
        .await?;

    if linked_ids.is_empty() {
        return Ok(());
    }

    let insert = format!(
        "insert into {table} ({owner_column}, {linked_column}) select $1, unnest($2::uuid[])"
    );
    sqlx::query(&insert)
        .bind(owner_id)
        .bind(linked_ids)
        .execute(&mut **tx)
        .await
        .map_err(Error::from_write)?;

    Ok(())
}

impl Repository {
    async fn task_details(&self, rows: Vec<TaskListRow>) -> Result<Vec<TaskDetails>, Error> {
        let task_ids = ids(&rows, |row| row.task.id);

        let assignees = sqlx::query_as::<_, LinkedWorkerRow>(
            r#"
select
    ta.task_id as owner_id, w.id, w.username, w.first_name, w.last_name
from task_assignees ta
join workers w on w.id = ta.worker_id
where ta.task_id = any($1)
order by w.username
"#,
        )
        .bind(&task_ids)
        .fetch_all(&self.pool)
        .await?;
        let tags = sqlx::query_as::<_, LinkedNamedRow>(
            r#"
select
    tt.task_id as owner_id, tg.id, tg.name
from task_tags tt
join tags tg on tg.id = tt.tag_id
where tt.task_id = any($1)
order by tg.name
"#,
        )
        .bind(&task_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut assignees = group_by_owner(assignees);
        let mut tags = group_by_owner(tags);

        Ok(rows
            .into_iter()
            .map(|row| {
                let task: Task = row.task.into();
                TaskDetails {
                    task_type: Lookup {
                        id: task.task_type_id,
                        name: row.task_type_name,
                    },
                    project: task
                        .project_id
                        .zip(row.project_name)
                        .map(|(id, name)| ProjectRef { id, name }),
                    assignees: take(&mut assignees, &task.id),
                    tags: named(take(&mut tags, &task.id)),
                    task,
                }
            })
            .collect())
    }

    async fn team_details(&self, rows: Vec<TeamRow>) -> Result<Vec<TeamDetails>, Error> {
        let team_ids = ids(&rows, |row| row.id);
        let lead_ids: Vec<Uuid> = rows.iter().filter_map(|row| row.team_lead_id).collect();

        let leads = sqlx::query_as::<_, WorkerRefRow>(
            "select w.id, w.username, w.first_name, w.last_name from workers w where w.id = any($1)",
        )
        .bind(&lead_ids)
        .fetch_all(&self.pool)
        .await?;
        let members = sqlx::query_as::<_, LinkedWorkerRow>(
            r#"
select
    tw.team_id as owner_id, w.id, w.username, w.first_name, w.last_name
from team_workers tw
join workers w on w.id = tw.worker_id
where tw.team_id = any($1)
order by w.username
"#,
        )
        .bind(&team_ids)
        .fetch_all(&self.pool)
        .await?;
        let projects = sqlx::query_as::<_, LinkedNamedRow>(
            r#"
select
    pt.team_id as owner_id, p.id, p.name
from project_teams pt
join projects p on p.id = pt.project_id
where pt.team_id = any($1)
order by p.name
"#,
        )
        .bind(&team_ids)
        .fetch_all(&self.pool)
        .await?;

        let leads: HashMap<Uuid, WorkerRef> = leads
            .into_iter()
            .map(|row| (row.id, row.into()))
            .collect();
        let mut members = group_by_owner(members);
        let mut projects = group_by_owner(projects);

        Ok(rows
            .into_iter()
            .map(|row| {
                let team: Team = row.into();
                TeamDetails {
                    team_lead: team.team_lead_id.and_then(|id| leads.get(&id).cloned()),
                    workers: take(&mut members, &team.id),
                    projects: named(take(&mut projects, &team.id)),
                    team,
                }
            })
            .collect())
    }

    async fn worker_details(&self, rows: Vec<WorkerListRow>) -> Result<Vec<WorkerDetails>, Error> {
        let worker_ids = ids(&rows, |row| row.worker.id);

        let teams = sqlx::query_as::<_, LinkedNamedRow>(
            r#"
select
    tw.worker_id as owner_id, t.id, t.name
from team_workers tw
join teams t on t.id = tw.team_id
where tw.worker_id = any($1)
order by t.name
"#,
        )
        .bind(&worker_ids)
        .fetch_all(&self.pool)
        .await?;
        let led_teams = sqlx::query_as::<_, LinkedNamedRow>(
            r#"
select
    t.team_lead_id as owner_id, t.id, t.name
from teams t
where t.team_lead_id = any($1)
order by t.name
"#,
        )
        .bind(&worker_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut teams = group_by_owner(teams);
        let mut led_teams = group_by_owner(led_teams);

        Ok(rows
            .into_iter()
            .map(|row| {
                let worker: Worker = row.worker.into();
                WorkerDetails {
                    position: worker
                        .position_id
                        .zip(row.position_name)
                        .map(|(id, name)| Lookup { id, name }),
                    teams: named(take(&mut teams, &worker.id)),
                    led_teams: named(take(&mut led_teams, &worker.id)),
                    worker,
                }
            })
            .collect())
    }

    async fn project_details(&self, rows: Vec<ProjectRow>) -> Result<Vec<ProjectDetails>, Error> {
        let project_ids = ids(&rows, |row| row.id);

        let teams = sqlx::query_as::<_, LinkedNamedRow>(
            r#"
select
    pt.project_id as owner_id, t.id, t.name
from project_teams pt
join teams t on t.id = pt.team_id
where pt.project_id = any($1)
order by t.name
"#,
        )
        .bind(&project_ids)
        .fetch_all(&self.pool)
        .await?;
        let tasks = sqlx::query_as::<_, TaskRow>(&format!(
            "select {TASK_COLUMNS} from tasks t where t.project_id = any($1) order by t.deadline, t.name"
        ))
        .bind(&project_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut teams = group_by_owner(teams);
        let mut tasks_by_project: HashMap<Uuid, Vec<Task>> = HashMap::new();
        for row in tasks {
            if let Some(project_id) = row.project_id {
                tasks_by_project
                    .entry(project_id)
                    .or_default()
                    .push(row.into());
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let project: Project = row.into();
                ProjectDetails {
                    teams: named(take(&mut teams, &project.id)),
                    tasks: take(&mut tasks_by_project, &project.id),
                    project,
                }
            })
            .collect())
    }

    async fn task_list_rows(&self, task_id: Option<Uuid>) -> Result<Vec<TaskListRow>, Error> {
        let query = format!(
            r#"
select
    {TASK_COLUMNS}, tt.name as task_type_name, p.name as project_name
from tasks t
join task_types tt on tt.id = t.task_type_id
left join projects p on p.id = t.project_id
where $1::uuid is null or t.id = $1
order by t.deadline, t.name
"#
        );

        Ok(sqlx::query_as::<_, TaskListRow>(&query)
            .bind(task_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn worker_list_rows(&self, worker_id: Option<Uuid>) -> Result<Vec<WorkerListRow>, Error> {
        let query = format!(
            r#"
select
    {WORKER_COLUMNS}, p.name as position_name
from workers w
left join positions p on p.id = w.position_id
where $1::uuid is null or w.id = $1
order by w.username
"#
        );

        Ok(sqlx::query_as::<_, WorkerListRow>(&query)
            .bind(worker_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn write_task(
        &self,
        task_id: Option<Uuid>,
        params: CreateTaskDBParams,
    ) -> Result<Task, Error> {
        let mut tx = self.pool.begin().await?;

        let row = match task_id {
            None => sqlx::query_as::<_, TaskRow>(
                r#"
insert into tasks (id, name, description, deadline, is_completed, priority, task_type_id, project_id)
values ($1, $2, $3, $4, $5, $6, $7, $8)
returning id, name, description, deadline, is_completed, priority, task_type_id, project_id
"#,
            )
            .bind(Uuid::now_v7()),
            Some(task_id) => sqlx::query_as::<_, TaskRow>(
                r#"
update tasks
set name = $2, description = $3, deadline = $4, is_completed = $5, priority = $6,
    task_type_id = $7, project_id = $8
where id = $1
returning id, name, description, deadline, is_completed, priority, task_type_id, project_id
"#,
            )
            .bind(task_id),
        }
        .bind(&params.name)
        .bind(&params.description)
        .bind(params.deadline)
        .bind(params.is_completed)
        .bind(params.priority)
        .bind(params.task_type_id)
        .bind(params.project_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::from_write)?
        .ok_or(Error::NotFound)?;

        replace_links(
            &mut tx,
            "task_assignees",
            "task_id",
            "worker_id",
            row.id,
            &params.assignee_ids,
        )
        .await?;
        replace_links(&mut tx, "task_tags", "task_id", "tag_id", row.id, &params.tag_ids).await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn write_team(
        &self,
        team_id: Option<Uuid>,
        params: CreateTeamDBParams,
    ) -> Result<Team, Error> {
        let mut tx = self.pool.begin().await?;

        let row = match team_id {
            None => sqlx::query_as::<_, TeamRow>(
                "insert into teams (id, name, team_lead_id) values ($1, $2, $3) returning id, name, team_lead_id",
            )
            .bind(Uuid::now_v7()),
            Some(team_id) => sqlx::query_as::<_, TeamRow>(
                "update teams set name = $2, team_lead_id = $3 where id = $1 returning id, name, team_lead_id",
            )
            .bind(team_id),
        }
        .bind(&params.name)
        .bind(params.team_lead_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::from_write)?
        .ok_or(Error::NotFound)?;

        replace_links(
            &mut tx,
            "team_workers",
            "team_id",
            "worker_id",
            row.id,
            &params.worker_ids,
        )
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn write_project(
        &self,
        project_id: Option<Uuid>,
        params: CreateProjectDBParams,
    ) -> Result<Project, Error> {
        let mut tx = self.pool.begin().await?;

        let row = match project_id {
            None => sqlx::query_as::<_, ProjectRow>(
                "insert into projects (id, name, budget) values ($1, $2, $3) returning id, name, budget",
            )
            .bind(Uuid::now_v7()),
            Some(project_id) => sqlx::query_as::<_, ProjectRow>(
                "update projects set name = $2, budget = $3 where id = $1 returning id, name, budget",
            )
            .bind(project_id),
        }
        .bind(&params.name)
        .bind(params.budget)
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::from_write)?
        .ok_or(Error::NotFound)?;

        replace_links(
            &mut tx,
            "project_teams",
            "project_id",
            "team_id",
            row.id,
            &params.team_ids,
        )
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn delete_by_id(&self, table: &str, id: Uuid) -> Result<(), Error> {
        let query = format!("delete from {table} where id = $1");
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;

        deleted(result.rows_affected())
    }
}

#[async_trait]
impl DatabaseRepository for Repository {
    async fn dashboard_counts(&self) -> Result<DashboardCounts, Error> {
        let row = sqlx::query_as::<_, DashboardCountsRow>(
            r#"
select
    (select count(*) from tasks where not is_completed) as tasks_in_process,
    (select count(*) from projects) as projects,
    (select count(*) from workers) as workers,
    (select count(*) from teams) as teams
"#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn project_summaries(&self) -> Result<Vec<ProjectSummary>, Error> {
        let rows = sqlx::query_as::<_, ProjectSummaryRow>(
            r#"
select
    p.id,
    p.name,
    p.budget,
    (select count(distinct t.id) from tasks t where t.project_id = p.id) as total_tasks,
    (select count(distinct pt.team_id) from project_teams pt where pt.project_id = p.id) as total_teams
from projects p
order by p.name
"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_pending_tasks(
        &self,
        params: ListPendingTasksDBParams,
    ) -> Result<Vec<Task>, Error> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
select
    {TASK_COLUMNS}
from tasks t
join task_assignees ta on ta.task_id = t.id
where ta.worker_id = $1 and not t.is_completed
order by t.deadline, t.name
limit $2
"#
        ))
        .bind(params.worker_id)
        .bind(params.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(TaskRowList(rows).into())
    }

    async fn list_worker_tasks(&self, params: ListWorkerTasksDBParams) -> Result<Vec<Task>, Error> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
select
    {TASK_COLUMNS}
from tasks t
join task_assignees ta on ta.task_id = t.id
where ta.worker_id = $1 and t.is_completed = $2
order by t.deadline, t.name
"#
        ))
        .bind(params.worker_id)
        .bind(params.is_completed)
        .fetch_all(&self.pool)
        .await?;

        Ok(TaskRowList(rows).into())
    }

    //--------------------------------------------------------------------------
    // Tasks
    //--------------------------------------------------------------------------

    async fn list_tasks(&self) -> Result<Vec<TaskDetails>, Error> {
        let rows = self.task_list_rows(None).await?;

        self.task_details(rows).await
    }

    async fn find_task_by_id(&self, task_id: Uuid) -> Result<Option<TaskDetails>, Error> {
        let rows = self.task_list_rows(Some(task_id)).await?;

        Ok(self.task_details(rows).await?.into_iter().next())
    }

    async fn create_task(&self, params: CreateTaskDBParams) -> Result<Task, Error> {
        self.write_task(None, params).await
    }

    async fn update_task(&self, params: UpdateTaskDBParams) -> Result<Task, Error> {
        self.write_task(Some(params.task_id), params.task).await
    }

    async fn delete_task(&self, task_id: Uuid) -> Result<(), Error> {
        self.delete_by_id("tasks", task_id).await
    }

    //--------------------------------------------------------------------------
    // Teams
    //--------------------------------------------------------------------------

    async fn list_teams(&self) -> Result<Vec<TeamDetails>, Error> {
        let rows = sqlx::query_as::<_, TeamRow>(
            "select id, name, team_lead_id from teams order by name",
        )
        .fetch_all(&self.pool)
        .await?;

        self.team_details(rows).await
    }

    async fn list_team_refs(&self) -> Result<Vec<TeamRef>, Error> {
        let rows = sqlx::query_as::<_, NamedRow>("select id, name from teams order by name")
            .fetch_all(&self.pool)
            .await?;

        Ok(named(rows))
    }

    async fn find_team_by_id(&self, team_id: Uuid) -> Result<Option<TeamDetails>, Error> {
        let rows = sqlx::query_as::<_, TeamRow>(
            "select id, name, team_lead_id from teams where id = $1",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(self.team_details(rows).await?.into_iter().next())
    }

    async fn create_team(&self, params: CreateTeamDBParams) -> Result<Team, Error> {
        self.write_team(None, params).await
    }

    async fn update_team(&self, params: UpdateTeamDBParams) -> Result<Team, Error> {
        self.write_team(Some(params.team_id), params.team).await
    }

    async fn delete_team(&self, team_id: Uuid) -> Result<(), Error> {
        self.delete_by_id("teams", team_id).await
    }

    //--------------------------------------------------------------------------
    // Workers
    //--------------------------------------------------------------------------

    async fn list_workers(&self) -> Result<Vec<WorkerDetails>, Error> {
        let rows = self.worker_list_rows(None).await?;

        self.worker_details(rows).await
    }

    async fn list_worker_refs(&self) -> Result<Vec<WorkerRef>, Error> {
        let rows = sqlx::query_as::<_, WorkerRefRow>(
            "select id, username, first_name, last_name from workers order by username",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(WorkerRefRowList(rows).into())
    }

    async fn find_worker_by_id(&self, worker_id: Uuid) -> Result<Option<WorkerDetails>, Error> {
        let rows = self.worker_list_rows(Some(worker_id)).await?;

        Ok(self.worker_details(rows).await?.into_iter().next())
    }

    async fn create_worker(&self, params: CreateWorkerDBParams) -> Result<Worker, Error> {
        let row = sqlx::query_as::<_, WorkerRow>(
            r#"
insert into workers (id, username, password_hash, first_name, last_name, email, position_id)
values ($1, $2, $3, $4, $5, $6, $7)
returning id, username, first_name, last_name, email, position_id
"#,
        )
        .bind(Uuid::now_v7())
        .bind(params.username)
        .bind(params.password_hash)
        .bind(params.first_name)
        .bind(params.last_name)
        .bind(params.email)
        .bind(params.position_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::from_write)?;

        Ok(row.into())
    }

    async fn update_worker(&self, params: UpdateWorkerDBParams) -> Result<Worker, Error> {
        let row = sqlx::query_as::<_, WorkerRow>(
            r#"
update workers
set first_name = $2, last_name = $3, email = $4, position_id = $5
where id = $1
returning id, username, first_name, last_name, email, position_id
"#,
        )
        .bind(params.worker_id)
        .bind(params.first_name)
        .bind(params.last_name)
        .bind(params.email)
        .bind(params.position_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::from_write)?
        .ok_or(Error::NotFound)?;

        Ok(row.into())
    }

    async fn delete_worker(&self, worker_id: Uuid) -> Result<(), Error> {
        self.delete_by_id("workers", worker_id).await
    }

    //--------------------------------------------------------------------------
    // Projects
    //--------------------------------------------------------------------------

    async fn list_projects(&self) -> Result<Vec<ProjectDetails>, Error> {
        let rows =
            sqlx::query_as::<_, ProjectRow>("select id, name, budget from projects order by name")
                .fetch_all(&self.pool)
                .await?;

        self.project_details(rows).await
    }

    async fn list_project_refs(&self) -> Result<Vec<ProjectRef>, Error> {
        let rows = sqlx::query_as::<_, NamedRow>("select id, name from projects order by name")
            .fetch_all(&self.pool)
            .await?;

        Ok(named(rows))
    }

    async fn find_project_by_id(&self, project_id: Uuid) -> Result<Option<ProjectDetails>, Error> {
        let rows =
            sqlx::query_as::<_, ProjectRow>("select id, name, budget from projects where id = $1")
                .bind(project_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(self.project_details(rows).await?.into_iter().next())
    }

    async fn create_project(&self, params: CreateProjectDBParams) -> Result<Project, Error> {
        self.write_project(None, params).await
    }

    async fn update_project(&self, params: UpdateProjectDBParams) -> Result<Project, Error> {
        self.write_project(Some(params.project_id), params.project)
            .await
    }

    async fn delete_project(&self, project_id: Uuid) -> Result<(), Error> {
        self.delete_by_id("projects", project_id).await
    }

    //--------------------------------------------------------------------------
    // Lookups
    //--------------------------------------------------------------------------

    async fn list_lookups(&self, kind: LookupKind) -> Result<Vec<Lookup>, Error> {
        let query = format!("select id, name from {} order by name", kind.table());
        let rows = sqlx::query_as::<_, NamedRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(named(rows))
    }

    async fn find_lookup_by_id(&self, kind: LookupKind, id: Uuid) -> Result<Option<Lookup>, Error> {
        let query = format!("select id, name from {} where id = $1", kind.table());
        let row = sqlx::query_as::<_, NamedRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(|row| row.into());

        Ok(row)
    }

    async fn create_lookup(&self, params: CreateLookupDBParams) -> Result<Lookup, Error> {
        let query = format!(
            "insert into {} (id, name) values ($1, $2) returning id, name",
            params.kind.table()
        );
        let row = sqlx::query_as::<_, NamedRow>(&query)
            .bind(Uuid::now_v7())
            .bind(params.name)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::from_write)?;

        Ok(row.into())
    }

    async fn update_lookup(&self, params: UpdateLookupDBParams) -> Result<Lookup, Error> {
        let query = format!(
            "update {} set name = $2 where id = $1 returning id, name",
            params.kind.table()
        );
        let row = sqlx::query_as::<_, NamedRow>(&query)
            .bind(params.id)
            .bind(params.name)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::from_write)?
            .ok_or(Error::NotFound)?;

        Ok(row.into())
    }

    async fn delete_lookup(&self, kind: LookupKind, id: Uuid) -> Result<(), Error> {
        self.delete_by_id(kind.table(), id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::password::hash_password;
    use crate::domain::task_manager::data::Priority;
    use sqlx::PgPool;
    use time::macros::date;

    async fn lookup(repo: &Repository, kind: LookupKind, name: &str) -> Lookup {
        repo.create_lookup(CreateLookupDBParams {
            kind,
            name: name.to_string(),
        })
        .await
        .unwrap()
    }

    async fn worker(repo: &Repository, username: &str, position_id: Option<Uuid>) -> Worker {
        repo.create_worker(CreateWorkerDBParams {
            username: username.to_string(),
            password_hash: hash_password("pale-ocean-42").unwrap(),
            first_name: "".to_string(),
            last_name: "".to_string(),
            email: "".to_string(),
            position_id,
        })
        .await
        .unwrap()
    }

    fn task_params(
        name: &str,
        deadline: time::Date,
        is_completed: bool,
        task_type_id: Uuid,
        assignee_ids: Vec<Uuid>,
    ) -> CreateTaskDBParams {
        CreateTaskDBParams {
            name: name.to_string(),
            description: "".to_string(),
            deadline,
            is_completed,
            priority: Priority::Medium,
            task_type_id,
            project_id: None,
            assignee_ids,
            tag_ids: vec![],
        }
    }

    #[sqlx::test]
    #[ignore = "requires a postgres database"]
    async fn test_worker_task_breakdown(pool: PgPool) {
        let repo = Repository::new(pool);
        let bug = lookup(&repo, LookupKind::TaskType, "Bug").await;
        let alice = worker(&repo, "alice", None).await;

        let first = repo
            .create_task(task_params("T1", date!(2024 - 01 - 01), false, bug.id, vec![alice.id]))
            .await
            .unwrap();
        let second = repo
            .create_task(task_params("T2", date!(2024 - 02 - 01), true, bug.id, vec![alice.id]))
            .await
            .unwrap();

        let done = repo
            .list_worker_tasks(ListWorkerTasksDBParams {
                worker_id: alice.id,
                is_completed: true,
            })
            .await
            .unwrap();
        let undone = repo
            .list_worker_tasks(ListWorkerTasksDBParams {
                worker_id: alice.id,
                is_completed: false,
            })
            .await
            .unwrap();

        assert_eq!(vec![second], done);
        assert_eq!(vec![first], undone);
    }

    #[sqlx::test]
    #[ignore = "requires a postgres database"]
    async fn test_pending_tasks_ordered_and_limited(pool: PgPool) {
        let repo = Repository::new(pool);
        let bug = lookup(&repo, LookupKind::TaskType, "Bug").await;
        let alice = worker(&repo, "alice", None).await;
        let bob = worker(&repo, "bob", None).await;

        for day in (1..=12).rev() {
            let deadline = time::Date::from_calendar_date(2024, time::Month::March, day).unwrap();
            repo.create_task(task_params("due", deadline, false, bug.id, vec![alice.id]))
                .await
                .unwrap();
        }
        repo.create_task(task_params("done", date!(2024 - 01 - 01), true, bug.id, vec![alice.id]))
            .await
            .unwrap();
        repo.create_task(task_params("other", date!(2024 - 01 - 01), false, bug.id, vec![bob.id]))
            .await
            .unwrap();

        let pending = repo
            .list_pending_tasks(ListPendingTasksDBParams {
                worker_id: alice.id,
                limit: 10,
            })
            .await
            .unwrap();

        assert_eq!(10, pending.len());
        assert!(pending.iter().all(|task| !task.is_completed));
        assert!(pending.windows(2).all(|pair| pair[0].deadline <= pair[1].deadline));
        assert_eq!(date!(2024 - 03 - 01), pending[0].deadline);
    }

    #[sqlx::test]
    #[ignore = "requires a postgres database"]
    async fn test_dashboard_counts(pool: PgPool) {
        let repo = Repository::new(pool);
        let bug = lookup(&repo, LookupKind::TaskType, "Bug").await;
        let mut workers = vec![];
        for username in ["alice", "bob", "carol", "dave"] {
            workers.push(worker(&repo, username, None).await);
        }
        for (index, is_completed) in [false, false, true, true, true].into_iter().enumerate() {
            repo.create_task(task_params(
                &format!("task {index}"),
                date!(2024 - 01 - 01),
                is_completed,
                bug.id,
                vec![],
            ))
            .await
            .unwrap();
        }
        for name in ["Apollo", "Gemini", "Mercury"] {
            repo.create_project(CreateProjectDBParams {
                name: name.to_string(),
                budget: 1000,
                team_ids: vec![],
            })
            .await
            .unwrap();
        }
        for name in ["Core", "Web"] {
            repo.create_team(CreateTeamDBParams {
                name: name.to_string(),
                team_lead_id: workers[0].id,
                worker_ids: vec![workers[1].id],
            })
            .await
            .unwrap();
        }

        let counts = repo.dashboard_counts().await.unwrap();

        assert_eq!(
            DashboardCounts {
                tasks_in_process: 2,
                projects: 3,
                workers: 4,
                teams: 2,
            },
            counts
        );
    }

    #[sqlx::test]
    #[ignore = "requires a postgres database"]
    async fn test_delete_task_type_cascades_to_tasks(pool: PgPool) {
        let repo = Repository::new(pool);
        let bug = lookup(&repo, LookupKind::TaskType, "Bug").await;
        let task = repo
            .create_task(task_params("T1", date!(2024 - 01 - 01), false, bug.id, vec![]))
            .await
            .unwrap();

        repo.delete_lookup(LookupKind::TaskType, bug.id).await.unwrap();

        assert_eq!(None, repo.find_task_by_id(task.id).await.unwrap());
    }

    #[sqlx::test]
    #[ignore = "requires a postgres database"]
    async fn test_delete_position_clears_worker_position(pool: PgPool) {
        let repo = Repository::new(pool);
        let developer = lookup(&repo, LookupKind::Position, "Developer").await;
        let alice = worker(&repo, "alice", Some(developer.id)).await;

        repo.delete_lookup(LookupKind::Position, developer.id)
            .await
            .unwrap();

        let details = repo.find_worker_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(None, details.worker.position_id);
        assert_eq!(None, details.position);
    }

    #[sqlx::test]
    #[ignore = "requires a postgres database"]
    async fn test_delete_team_lead_clears_team_lead(pool: PgPool) {
        let repo = Repository::new(pool);
        let alice = worker(&repo, "alice", None).await;
        let bob = worker(&repo, "bob", None).await;
        let team = repo
            .create_team(CreateTeamDBParams {
                name: "Core".to_string(),
                team_lead_id: alice.id,
                worker_ids: vec![bob.id],
            })
            .await
            .unwrap();

        repo.delete_worker(alice.id).await.unwrap();

        let details = repo.find_team_by_id(team.id).await.unwrap().unwrap();
        assert_eq!(None, details.team.team_lead_id);
        assert_eq!(None, details.team_lead);
        assert_eq!(vec![bob.id], details.workers.iter().map(|w| w.id).collect::<Vec<_>>());
    }

    #[sqlx::test]
    #[ignore = "requires a postgres database"]
    async fn test_delete_project_clears_task_project(pool: PgPool) {
        let repo = Repository::new(pool);
        let bug = lookup(&repo, LookupKind::TaskType, "Bug").await;
        let project = repo
            .create_project(CreateProjectDBParams {
                name: "Apollo".to_string(),
                budget: 1000,
                team_ids: vec![],
            })
            .await
            .unwrap();
        let mut params = task_params("T1", date!(2024 - 01 - 01), false, bug.id, vec![]);
        params.project_id = Some(project.id);
        let task = repo.create_task(params).await.unwrap();

        repo.delete_project(project.id).await.unwrap();

        let details = repo.find_task_by_id(task.id).await.unwrap().unwrap();
        assert_eq!(None, details.task.project_id);
        assert_eq!(None, details.project);
    }

    #[sqlx::test]
    #[ignore = "requires a postgres database"]
    async fn test_unknown_task_type_is_invalid_reference(pool: PgPool) {
        let repo = Repository::new(pool);

        let result = repo
            .create_task(task_params("T1", date!(2024 - 01 - 01), false, Uuid::now_v7(), vec![]))
            .await;

        assert!(matches!(
            result,
            Err(Error::InvalidReference(constraint)) if constraint == "tasks_task_type_id_fkey"
        ));
    }

    #[sqlx::test]
    #[ignore = "requires a postgres database"]
    async fn test_task_details_eager_load(pool: PgPool) {
        let repo = Repository::new(pool);
        let bug = lookup(&repo, LookupKind::TaskType, "Bug").await;
        let urgent = lookup(&repo, LookupKind::Tag, "urgent").await;
        let alice = worker(&repo, "alice", None).await;
        let mut params = task_params("T1", date!(2024 - 01 - 01), false, bug.id, vec![alice.id]);
        params.tag_ids = vec![urgent.id];

        let task = repo.create_task(params).await.unwrap();
        let details = repo.find_task_by_id(task.id).await.unwrap().unwrap();

        assert_eq!(bug, details.task_type);
        assert_eq!(vec![urgent], details.tags);
        assert_eq!(vec![alice.id], details.assignees.iter().map(|w| w.id).collect::<Vec<_>>());
    }

    #[sqlx::test]
    #[ignore = "requires a postgres database"]
    async fn test_delete_unknown_record(pool: PgPool) {
        let repo = Repository::new(pool);

        let result = repo.delete_project(Uuid::now_v7()).await;

        assert!(matches!(result, Err(Error::NotFound)));
    }
}
