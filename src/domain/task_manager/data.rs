use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::Date;
use uuid::Uuid;

/// The three name-only lookup tables. They share one row shape and one set of
/// repository operations, parameterised by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    Tag,
    TaskType,
    Position,
}

impl LookupKind {
    pub fn table(&self) -> &'static str {
        match self {
            Self::Tag => "tags",
            Self::TaskType => "task_types",
            Self::Position => "positions",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lookup {
    pub id: Uuid,
    pub name: String,
}

pub type Tag = Lookup;
pub type TaskType = Lookup;
pub type Position = Lookup;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "task_priority", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "Urgent",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPriority(pub String);

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| UnknownPriority(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Worker {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position_id: Option<Uuid>,
}

/// Compact worker reference used wherever a worker is shown as part of
/// another entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerRef {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl WorkerRef {
    pub fn display_name(&self) -> String {
        let full_name = format!("{} {}", self.first_name, self.last_name);
        let full_name = full_name.trim();

        if full_name.is_empty() {
            self.username.clone()
        } else {
            full_name.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub team_lead_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub budget: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub deadline: Date,
    pub is_completed: bool,
    pub priority: Priority,
    pub task_type_id: Uuid,
    pub project_id: Option<Uuid>,
}

//------------------------------------------------------------------------------
// Eager-loaded views
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDetails {
    #[serde(flatten)]
    pub task: Task,
    pub task_type: TaskType,
    pub project: Option<ProjectRef>,
    pub assignees: Vec<WorkerRef>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamDetails {
    #[serde(flatten)]
    pub team: Team,
    pub team_lead: Option<WorkerRef>,
    pub workers: Vec<WorkerRef>,
    pub projects: Vec<ProjectRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerDetails {
    #[serde(flatten)]
    pub worker: Worker,
    pub position: Option<Position>,
    pub teams: Vec<TeamRef>,
    pub led_teams: Vec<TeamRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerProfile {
    #[serde(flatten)]
    pub details: WorkerDetails,
    #[serde(flatten)]
    pub tasks: WorkerTaskBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub teams: Vec<TeamRef>,
    pub tasks: Vec<Task>,
}

//------------------------------------------------------------------------------
// Aggregates
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub tasks_in_process: i64,
    pub projects: i64,
    pub workers: i64,
    pub teams: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub budget: i64,
    pub total_tasks: i64,
    pub total_teams: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    #[serde(flatten)]
    pub counts: DashboardCounts,
    pub project_summaries: Vec<ProjectSummary>,
    pub team_overview: Vec<TeamDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkerTaskBreakdown {
    pub done_tasks: Vec<Task>,
    pub undone_tasks: Vec<Task>,
}

//------------------------------------------------------------------------------
// Form choices
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub id: Uuid,
    pub label: String,
}

impl From<Lookup> for Choice {
    fn from(value: Lookup) -> Self {
        Self {
            id: value.id,
            label: value.name,
        }
    }
}

impl From<WorkerRef> for Choice {
    fn from(value: WorkerRef) -> Self {
        Self {
            label: value.display_name(),
            id: value.id,
        }
    }
}

impl From<TeamRef> for Choice {
    fn from(value: TeamRef) -> Self {
        Self {
            id: value.id,
            label: value.name,
        }
    }
}

impl From<ProjectRef> for Choice {
    fn from(value: ProjectRef) -> Self {
        Self {
            id: value.id,
            label: value.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormChoices {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub task_types: Vec<Choice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Choice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub workers: Vec<Choice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Choice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<Choice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<Choice>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub priorities: Vec<PriorityChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityChoice {
    pub value: Priority,
    pub label: &'static str,
}

impl From<Priority> for PriorityChoice {
    fn from(value: Priority) -> Self {
        Self {
            value,
            label: value.label(),
        }
    }
}
