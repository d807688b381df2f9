use crate::domain::auth::WorkerCredentials;
use crate::domain::task_manager::data::{
    DashboardCounts, Lookup, Priority, Project, ProjectRef, ProjectSummary, Task, Team, TeamRef,
    Worker, WorkerRef,
};
use sqlx::FromRow;
use std::collections::HashMap;
use time::Date;
use uuid::Uuid;

/// Row joined to the record that owns it, e.g. an assignee row carrying the
/// task id it belongs to.
pub trait Linked {
    type Item;

    fn split(self) -> (Uuid, Self::Item);
}

pub fn group_by_owner<R: Linked>(rows: Vec<R>) -> HashMap<Uuid, Vec<R::Item>> {
    let mut grouped: HashMap<Uuid, Vec<R::Item>> = HashMap::new();
    for row in rows {
        let (owner_id, item) = row.split();
        grouped.entry(owner_id).or_default().push(item);
    }

    grouped
}

#[derive(FromRow, Clone)]
pub struct NamedRow {
    pub id: Uuid,
    pub name: String,
}

impl From<NamedRow> for Lookup {
    fn from(value: NamedRow) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<NamedRow> for TeamRef {
    fn from(value: NamedRow) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<NamedRow> for ProjectRef {
    fn from(value: NamedRow) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

pub struct NamedRowList(pub Vec<NamedRow>);

impl<T: From<NamedRow>> From<NamedRowList> for Vec<T> {
    fn from(value: NamedRowList) -> Self {
        value.0.into_iter().map(|row| row.into()).collect()
    }
}

#[derive(FromRow, Clone)]
pub struct LinkedNamedRow {
    pub owner_id: Uuid,
    pub id: Uuid,
    pub name: String,
}

impl Linked for LinkedNamedRow {
    type Item = NamedRow;

    fn split(self) -> (Uuid, Self::Item) {
        (
            self.owner_id,
            NamedRow {
                id: self.id,
                name: self.name,
            },
        )
    }
}

//------------------------------------------------------------------------------
// Workers
//------------------------------------------------------------------------------

#[derive(FromRow, Clone)]
pub struct WorkerRow {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position_id: Option<Uuid>,
}

impl From<WorkerRow> for Worker {
    fn from(value: WorkerRow) -> Self {
        Self {
            id: value.id,
            username: value.username,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            position_id: value.position_id,
        }
    }
}

#[derive(FromRow, Clone)]
pub struct WorkerListRow {
    #[sqlx(flatten)]
    pub worker: WorkerRow,
    pub position_name: Option<String>,
}

#[derive(FromRow, Clone)]
pub struct WorkerRefRow {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<WorkerRefRow> for WorkerRef {
    fn from(value: WorkerRefRow) -> Self {
        Self {
            id: value.id,
            username: value.username,
            first_name: value.first_name,
            last_name: value.last_name,
        }
    }
}

pub struct WorkerRefRowList(pub Vec<WorkerRefRow>);

impl From<WorkerRefRowList> for Vec<WorkerRef> {
    fn from(value: WorkerRefRowList) -> Self {
        value.0.into_iter().map(|row| row.into()).collect()
    }
}

#[derive(FromRow, Clone)]
pub struct LinkedWorkerRow {
    pub owner_id: Uuid,
    #[sqlx(flatten)]
    pub worker: WorkerRefRow,
}

impl Linked for LinkedWorkerRow {
    type Item = WorkerRef;

    fn split(self) -> (Uuid, Self::Item) {
        (self.owner_id, self.worker.into())
    }
}

#[derive(FromRow, Clone)]
pub struct CredentialsRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

impl From<CredentialsRow> for WorkerCredentials {
    fn from(value: CredentialsRow) -> Self {
        Self {
            worker_id: value.id,
            username: value.username,
            password_hash: value.password_hash,
        }
    }
}

//------------------------------------------------------------------------------
// Tasks
//------------------------------------------------------------------------------

#[derive(FromRow, Clone)]
pub struct TaskRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub deadline: Date,
    pub is_completed: bool,
    pub priority: Priority,
    pub task_type_id: Uuid,
    pub project_id: Option<Uuid>,
}

impl From<TaskRow> for Task {
    fn from(value: TaskRow) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            deadline: value.deadline,
            is_completed: value.is_completed,
            priority: value.priority,
            task_type_id: value.task_type_id,
            project_id: value.project_id,
        }
    }
}

pub struct TaskRowList(pub Vec<TaskRow>);

impl From<TaskRowList> for Vec<Task> {
    fn from(value: TaskRowList) -> Self {
        value.0.into_iter().map(|row| row.into()).collect()
    }
}

#[derive(FromRow, Clone)]
pub struct TaskListRow {
    #[sqlx(flatten)]
    pub task: TaskRow,
    pub task_type_name: String,
    pub project_name: Option<String>,
}

//------------------------------------------------------------------------------
// Teams
//------------------------------------------------------------------------------

#[derive(FromRow, Clone)]
pub struct TeamRow {
    pub id: Uuid,
    pub name: String,
    pub team_lead_id: Option<Uuid>,
}

impl From<TeamRow> for Team {
    fn from(value: TeamRow) -> Self {
        Self {
            id: value.id,
            name: value.name,
            team_lead_id: value.team_lead_id,
        }
    }
}

//------------------------------------------------------------------------------
// Projects
//------------------------------------------------------------------------------

#[derive(FromRow, Clone)]
pub struct ProjectRow {
    pub id: Uuid,
    pub name: String,
    pub budget: i64,
}

impl From<ProjectRow> for Project {
    fn from(value: ProjectRow) -> Self {
        Self {
            id: value.id,
            name: value.name,
            budget: value.budget,
        }
    }
}

//------------------------------------------------------------------------------
// Aggregates
//------------------------------------------------------------------------------

#[derive(FromRow, Clone)]
pub struct DashboardCountsRow {
    pub tasks_in_process: i64,
    pub projects: i64,
    pub workers: i64,
    pub teams: i64,
}

impl From<DashboardCountsRow> for DashboardCounts {
    fn from(value: DashboardCountsRow) -> Self {
        Self {
            tasks_in_process: value.tasks_in_process,
            projects: value.projects,
            workers: value.workers,
            teams: value.teams,
        }
    }
}

#[derive(FromRow, Clone)]
pub struct ProjectSummaryRow {
    pub id: Uuid,
    pub name: String,
    pub budget: i64,
    pub total_tasks: i64,
    pub total_teams: i64,
}

impl From<ProjectSummaryRow> for ProjectSummary {
    fn from(value: ProjectSummaryRow) -> Self {
        Self {
            id: value.id,
            name: value.name,
            budget: value.budget,
            total_tasks: value.total_tasks,
            total_teams: value.total_teams,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_owner() {
        let first = Uuid::now_v7();
        let second = Uuid::now_v7();
        let rows = vec![
            LinkedNamedRow {
                owner_id: first,
                id: Uuid::now_v7(),
                name: "backend".to_string(),
            },
            LinkedNamedRow {
                owner_id: second,
                id: Uuid::now_v7(),
                name: "frontend".to_string(),
            },
            LinkedNamedRow {
                owner_id: first,
                id: Uuid::now_v7(),
                name: "urgent".to_string(),
            },
        ];

        let grouped = group_by_owner(rows);

        let names: Vec<&str> = grouped[&first].iter().map(|row| row.name.as_str()).collect();
        assert_eq!(vec!["backend", "urgent"], names);
        assert_eq!(1, grouped[&second].len());
    }
}
