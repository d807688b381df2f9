use crate::domain::task_manager::data::{FormChoices, Task};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseType {
    #[serde(rename = "health")]
    Health,

    #[serde(rename = "dashboard")]
    Dashboard,

    #[serde(rename = "login")]
    Login,

    #[serde(rename = "task")]
    Task,

    #[serde(rename = "team")]
    Team,

    #[serde(rename = "worker")]
    Worker,

    #[serde(rename = "project")]
    Project,

    #[serde(rename = "tag")]
    Tag,

    #[serde(rename = "task-type")]
    TaskType,

    #[serde(rename = "position")]
    Position,
}

/// Which page of a resource a response renders.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    Dashboard,
    Login,
    List,
    Detail,
    Create,
    Update,
    Delete,
}

#[derive(Serialize)]
pub struct PageResponse<T: Serialize> {
    data: T,
    #[serde(rename = "type")]
    object_type: ResponseType,
    segment: Segment,
    navigation_tasks: Vec<Task>,
}

pub fn page_response<T: Serialize>(
    data: T,
    object_type: ResponseType,
    segment: Segment,
    navigation_tasks: Vec<Task>,
) -> PageResponse<T> {
    PageResponse {
        data,
        object_type,
        segment,
        navigation_tasks,
    }
}

/// Data of a create or update screen. `object` is absent on create.
#[derive(Serialize)]
pub struct FormPageData<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<T>,
    pub choices: FormChoices,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}
