use crate::domain::auth::password::password_policy_violations;
use crate::domain::task_manager::data::Priority;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use time::Date;
use time::macros::format_description;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_DATE: &str = "Enter a valid date.";
pub const INVALID_INTEGER: &str = "Enter a whole number.";
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";
pub const DUPLICATE_USERNAME: &str = "A user with that username already exists.";
pub const NULL_CHARACTERS: &str = "Null characters are not allowed.";
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Field-level error messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Keeps the value when parsing succeeded, records the message otherwise.
    fn capture<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    /// Postgres text columns cannot store NUL.
    fn reject_null_characters(&mut self, fields: &[(&str, Option<&str>)]) {
        for (field, value) in fields {
            if value.is_some_and(|value| value.contains('\0')) {
                self.add(field, NULL_CHARACTERS);
            }
        }
    }

    fn from_validation(result: Result<(), ValidationErrors>) -> Self {
        let mut errors = Self::new();
        if let Err(validation_errors) = result {
            for (field, field_errors) in validation_errors.field_errors() {
                for error in field_errors.iter() {
                    let message = error
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| error.code.to_string());
                    errors.add(&field.to_string(), message);
                }
            }
        }
        errors
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required_choice(value: Option<&str>) -> Result<Uuid, String> {
    match value {
        None => Err(REQUIRED.to_string()),
        Some(value) => Uuid::parse_str(value).map_err(|_| INVALID_CHOICE.to_string()),
    }
}

fn optional_choice(value: Option<&str>) -> Result<Option<Uuid>, String> {
    value.map(|value| required_choice(Some(value))).transpose()
}

fn multiple_choices(values: &[String]) -> Result<Vec<Uuid>, String> {
    let mut ids = vec![];
    for value in values.iter().map(|value| value.trim()).filter(|value| !value.is_empty()) {
        let id = Uuid::parse_str(value).map_err(|_| {
            format!("Select a valid choice. {value} is not one of the available choices.")
        })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

fn date(value: Option<&str>) -> Result<Date, String> {
    let value = value.ok_or_else(|| REQUIRED.to_string())?;
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|_| INVALID_DATE.to_string())
}

fn priority(value: Option<&str>) -> Result<Priority, String> {
    match value {
        None => Ok(Priority::default()),
        Some(value) => Priority::from_str(value).map_err(|e| {
            format!(
                "Select a valid choice. {} is not one of the available choices.",
                e.0
            )
        }),
    }
}

fn checkbox(value: Option<&str>) -> bool {
    matches!(value, Some("on" | "true" | "True" | "1" | "yes"))
}

fn budget(value: Option<&str>) -> Result<i64, String> {
    let value = value.ok_or_else(|| REQUIRED.to_string())?;
    let budget = value
        .parse::<i64>()
        .map_err(|_| INVALID_INTEGER.to_string())?;
    if budget < 0 {
        return Err("Ensure this value is greater than or equal to 0.".to_string());
    }
    Ok(budget)
}

/// Maps a violated foreign-key constraint back to the form field that
/// submitted the dangling reference.
pub fn field_for_constraint(constraint: &str) -> &'static str {
    match constraint {
        "tasks_task_type_id_fkey" => "task_type",
        "tasks_project_id_fkey" => "project",
        "task_assignees_worker_id_fkey" => "assignees",
        "task_tags_tag_id_fkey" => "tags",
        "teams_team_lead_id_fkey" => "team_lead",
        "team_workers_worker_id_fkey" => "workers",
        "project_teams_team_id_fkey" => "teams",
        "workers_position_id_fkey" => "position",
        _ => NON_FIELD_ERRORS,
    }
}

//------------------------------------------------------------------------------
// Lookup (tag, task type, position)
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LookupForm {
    #[validate(
        required(message = "This field is required."),
        length(max = 255, message = "Ensure this value has at most 255 characters.")
    )]
    pub name: Option<String>,
}

impl LookupForm {
    pub fn clean(self) -> Result<String, FormErrors> {
        let form = Self {
            name: blank_to_none(self.name),
        };
        let mut errors = FormErrors::from_validation(form.validate());
        errors.reject_null_characters(&[("name", form.name.as_deref())]);

        match form.name {
            Some(name) if errors.is_empty() => Ok(name),
            _ => Err(errors),
        }
    }
}

//------------------------------------------------------------------------------
// Task
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TaskForm {
    #[validate(
        required(message = "This field is required."),
        length(max = 255, message = "Ensure this value has at most 255 characters.")
    )]
    pub name: Option<String>,
    #[validate(required(message = "This field is required."))]
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub is_completed: Option<String>,
    pub priority: Option<String>,
    pub task_type: Option<String>,
    pub project: Option<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskData {
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

impl TaskForm {
    pub fn clean(self) -> Result<TaskData, FormErrors> {
        let form = Self {
            name: blank_to_none(self.name),
            description: blank_to_none(self.description),
            deadline: blank_to_none(self.deadline),
            is_completed: blank_to_none(self.is_completed),
            priority: blank_to_none(self.priority),
            task_type: blank_to_none(self.task_type),
            project: blank_to_none(self.project),
            assignees: self.assignees,
            tags: self.tags,
        };

        let mut errors = FormErrors::from_validation(form.validate());
        errors.reject_null_characters(&[
            ("name", form.name.as_deref()),
            ("description", form.description.as_deref()),
        ]);
        let deadline = errors.capture("deadline", date(form.deadline.as_deref()));
        let priority = errors.capture("priority", priority(form.priority.as_deref()));
        let task_type_id = errors.capture("task_type", required_choice(form.task_type.as_deref()));
        let project_id = errors.capture("project", optional_choice(form.project.as_deref()));
        let assignee_ids = errors.capture("assignees", multiple_choices(&form.assignees));
        let tag_ids = errors.capture("tags", multiple_choices(&form.tags));

        match (
            form.name,
            form.description,
            deadline,
            priority,
            task_type_id,
            project_id,
            assignee_ids,
            tag_ids,
        ) {
            (
                Some(name),
                Some(description),
                Some(deadline),
                Some(priority),
                Some(task_type_id),
                Some(project_id),
                Some(assignee_ids),
                Some(tag_ids),
            ) if errors.is_empty() => Ok(TaskData {
                name,
                description,
                deadline,
                is_completed: checkbox(form.is_completed.as_deref()),
                priority,
                task_type_id,
                project_id,
                assignee_ids,
                tag_ids,
            }),
            _ => Err(errors),
        }
    }
}

//------------------------------------------------------------------------------
// Team
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TeamForm {
    #[validate(
        required(message = "This field is required."),
        length(max = 255, message = "Ensure this value has at most 255 characters.")
    )]
    pub name: Option<String>,
    pub team_lead: Option<String>,
    #[serde(default)]
    pub workers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamData {
    pub name: String,
    pub team_lead_id: Uuid,
    pub worker_ids: Vec<Uuid>,
}

impl TeamForm {
    pub fn clean(self) -> Result<TeamData, FormErrors> {
        let form = Self {
            name: blank_to_none(self.name),
            team_lead: blank_to_none(self.team_lead),
            workers: self.workers,
        };

        let mut errors = FormErrors::from_validation(form.validate());
        errors.reject_null_characters(&[("name", form.name.as_deref())]);
        let team_lead_id = errors.capture("team_lead", required_choice(form.team_lead.as_deref()));
        let worker_ids = errors.capture("workers", multiple_choices(&form.workers));

        match (form.name, team_lead_id, worker_ids) {
            (Some(name), Some(team_lead_id), Some(worker_ids)) if errors.is_empty() => {
                Ok(TeamData {
                    name,
                    team_lead_id,
                    worker_ids,
                })
            }
            _ => Err(errors),
        }
    }
}

//------------------------------------------------------------------------------
// Project
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProjectForm {
    #[validate(
        required(message = "This field is required."),
        length(max = 255, message = "Ensure this value has at most 255 characters.")
    )]
    pub name: Option<String>,
    pub budget: Option<String>,
    #[serde(default)]
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectData {
    pub name: String,
    pub budget: i64,
    pub team_ids: Vec<Uuid>,
}

impl ProjectForm {
    pub fn clean(self) -> Result<ProjectData, FormErrors> {
        let form = Self {
            name: blank_to_none(self.name),
            budget: blank_to_none(self.budget),
            teams: self.teams,
        };

        let mut errors = FormErrors::from_validation(form.validate());
        errors.reject_null_characters(&[("name", form.name.as_deref())]);
        let budget = errors.capture("budget", budget(form.budget.as_deref()));
        let team_ids = errors.capture("teams", multiple_choices(&form.teams));

        match (form.name, budget, team_ids) {
            (Some(name), Some(budget), Some(team_ids)) if errors.is_empty() => Ok(ProjectData {
                name,
                budget,
                team_ids,
            }),
            _ => Err(errors),
        }
    }
}

//------------------------------------------------------------------------------
// Worker
//------------------------------------------------------------------------------

fn valid_username(username: &str) -> Result<(), validator::ValidationError> {
    if username
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        return Ok(());
    }

    let mut error = validator::ValidationError::new("invalid_username");
    error.message = Some(
        "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
            .into(),
    );
    Err(error)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct WorkerCreationForm {
    #[validate(
        required(message = "This field is required."),
        length(max = 150, message = "Ensure this value has at most 150 characters."),
        custom(function = "valid_username")
    )]
    pub username: Option<String>,
    #[serde(default, skip_serializing)]
    pub password1: Option<String>,
    #[serde(default, skip_serializing)]
    pub password2: Option<String>,
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkerData {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position_id: Option<Uuid>,
}

impl WorkerCreationForm {
    pub fn clean(self) -> Result<NewWorkerData, FormErrors> {
        let form = Self {
            username: blank_to_none(self.username),
            // passwords keep surrounding whitespace
            password1: self.password1.filter(|password| !password.is_empty()),
            password2: self.password2.filter(|password| !password.is_empty()),
            first_name: blank_to_none(self.first_name),
            last_name: blank_to_none(self.last_name),
            email: blank_to_none(self.email),
            position: blank_to_none(self.position),
        };

        let mut errors = FormErrors::from_validation(form.validate());
        errors.reject_null_characters(&[
            ("username", form.username.as_deref()),
            ("password1", form.password1.as_deref()),
            ("password2", form.password2.as_deref()),
            ("first_name", form.first_name.as_deref()),
            ("last_name", form.last_name.as_deref()),
            ("email", form.email.as_deref()),
        ]);
        let position_id = errors.capture("position", optional_choice(form.position.as_deref()));

        let password = match (&form.password1, &form.password2) {
            (None, _) => {
                errors.add("password1", REQUIRED);
                if form.password2.is_none() {
                    errors.add("password2", REQUIRED);
                }
                None
            }
            (Some(_), None) => {
                errors.add("password2", REQUIRED);
                None
            }
            (Some(password1), Some(password2)) if password1 != password2 => {
                errors.add("password2", PASSWORD_MISMATCH);
                None
            }
            (Some(password), Some(_)) => {
                let attributes = [
                    form.username.as_deref().unwrap_or_default(),
                    form.first_name.as_deref().unwrap_or_default(),
                    form.last_name.as_deref().unwrap_or_default(),
                    form.email.as_deref().unwrap_or_default(),
                ];
                let violations = password_policy_violations(password, &attributes);
                if violations.is_empty() {
                    Some(password.clone())
                } else {
                    for violation in violations {
                        errors.add("password2", violation);
                    }
                    None
                }
            }
        };

        match (form.username, password, position_id) {
            (Some(username), Some(password), Some(position_id)) if errors.is_empty() => {
                Ok(NewWorkerData {
                    username,
                    password,
                    first_name: form.first_name.unwrap_or_default(),
                    last_name: form.last_name.unwrap_or_default(),
                    email: form.email.unwrap_or_default(),
                    position_id,
                })
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct WorkerUpdateForm {
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub position_id: Option<Uuid>,
}

impl WorkerUpdateForm {
    pub fn clean(self) -> Result<WorkerData, FormErrors> {
        let form = Self {
            first_name: blank_to_none(self.first_name),
            last_name: blank_to_none(self.last_name),
            email: blank_to_none(self.email),
            position: blank_to_none(self.position),
        };

        let mut errors = FormErrors::from_validation(form.validate());
        errors.reject_null_characters(&[
            ("first_name", form.first_name.as_deref()),
            ("last_name", form.last_name.as_deref()),
            ("email", form.email.as_deref()),
        ]);
        let position_id = errors.capture("position", optional_choice(form.position.as_deref()));

        match position_id {
            Some(position_id) if errors.is_empty() => Ok(WorkerData {
                first_name: form.first_name.unwrap_or_default(),
                last_name: form.last_name.unwrap_or_default(),
                email: form.email.unwrap_or_default(),
                position_id,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn task_form() -> TaskForm {
        TaskForm {
            name: Some("Ship release".to_string()),
            description: Some("Cut the 1.0 tag".to_string()),
            deadline: Some("2024-01-01".to_string()),
            is_completed: None,
            priority: Some("HIGH".to_string()),
            task_type: Some(Uuid::now_v7().to_string()),
            project: None,
            assignees: vec![],
            tags: vec![],
        }
    }

    #[test]
    fn test_task_form_valid() {
        let form = task_form();
        let task_type = form.task_type.clone().unwrap();

        let data = form.clean().unwrap();

        assert_eq!("Ship release", data.name);
        assert_eq!(date!(2024 - 01 - 01), data.deadline);
        assert_eq!(Priority::High, data.priority);
        assert_eq!(task_type, data.task_type_id.to_string());
        assert_eq!(None, data.project_id);
        assert!(!data.is_completed);
    }

    #[test]
    fn test_task_form_priority_defaults_to_medium() {
        let form = TaskForm {
            priority: Some("".to_string()),
            ..task_form()
        };

        assert_eq!(Priority::Medium, form.clean().unwrap().priority);
    }

    #[test]
    fn test_task_form_rejects_unknown_priority() {
        let form = TaskForm {
            priority: Some("URGENT".to_string()),
            ..task_form()
        };

        let errors = form.clean().unwrap_err();

        assert_eq!(
            Some(
                &["Select a valid choice. URGENT is not one of the available choices.".to_string()]
                    [..]
            ),
            errors.field("priority")
        );
    }

    #[test]
    fn test_task_form_rejects_missing_task_type() {
        let form = TaskForm {
            task_type: Some("  ".to_string()),
            ..task_form()
        };

        let errors = form.clean().unwrap_err();

        assert_eq!(Some(&[REQUIRED.to_string()][..]), errors.field("task_type"));
    }

    #[test]
    fn test_task_form_reports_every_invalid_field() {
        let form = TaskForm {
            name: None,
            description: None,
            deadline: Some("01/02/2024".to_string()),
            assignees: vec!["not-an-id".to_string()],
            ..task_form()
        };

        let errors = form.clean().unwrap_err();

        assert_eq!(Some(&[REQUIRED.to_string()][..]), errors.field("name"));
        assert_eq!(Some(&[REQUIRED.to_string()][..]), errors.field("description"));
        assert_eq!(Some(&[INVALID_DATE.to_string()][..]), errors.field("deadline"));
        assert!(errors.field("assignees").is_some());
        assert!(errors.field("priority").is_none());
    }

    #[test]
    fn test_task_form_checkbox_and_duplicate_choices() {
        let worker = Uuid::now_v7();
        let form = TaskForm {
            is_completed: Some("on".to_string()),
            assignees: vec![worker.to_string(), worker.to_string()],
            ..task_form()
        };

        let data = form.clean().unwrap();

        assert!(data.is_completed);
        assert_eq!(vec![worker], data.assignee_ids);
    }

    #[test]
    fn test_team_form_requires_team_lead() {
        let form = TeamForm {
            name: Some("Platform".to_string()),
            team_lead: None,
            workers: vec![],
        };

        let errors = form.clean().unwrap_err();

        assert_eq!(Some(&[REQUIRED.to_string()][..]), errors.field("team_lead"));
    }

    #[test]
    fn test_project_form_budget() {
        let form = ProjectForm {
            name: Some("Apollo".to_string()),
            budget: Some("15000".to_string()),
            teams: vec![],
        };
        assert_eq!(15000, form.clean().unwrap().budget);

        let form = ProjectForm {
            name: Some("Apollo".to_string()),
            budget: Some("lots".to_string()),
            teams: vec![],
        };
        assert_eq!(
            Some(&[INVALID_INTEGER.to_string()][..]),
            form.clean().unwrap_err().field("budget")
        );
    }

    #[test]
    fn test_lookup_form_name_length() {
        let form = LookupForm {
            name: Some("x".repeat(256)),
        };
        assert!(form.clean().unwrap_err().field("name").is_some());

        let form = LookupForm {
            name: Some(" backend ".to_string()),
        };
        assert_eq!("backend", form.clean().unwrap());
    }

    #[test]
    fn test_forms_reject_null_characters() {
        let form = LookupForm {
            name: Some("a\0b".to_string()),
        };
        assert_eq!(
            Some(&[NULL_CHARACTERS.to_string()][..]),
            form.clean().unwrap_err().field("name")
        );

        let form = TaskForm {
            description: Some("line\0break".to_string()),
            ..task_form()
        };
        let errors = form.clean().unwrap_err();
        assert_eq!(
            Some(&[NULL_CHARACTERS.to_string()][..]),
            errors.field("description")
        );
        assert!(errors.field("name").is_none());

        let form = WorkerUpdateForm {
            first_name: Some("Ja\0ne".to_string()),
            ..Default::default()
        };
        assert_eq!(
            Some(&[NULL_CHARACTERS.to_string()][..]),
            form.clean().unwrap_err().field("first_name")
        );
    }

    fn worker_creation_form() -> WorkerCreationForm {
        WorkerCreationForm {
            username: Some("jdoe".to_string()),
            password1: Some("pale-ocean-42".to_string()),
            password2: Some("pale-ocean-42".to_string()),
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            position: None,
        }
    }

    #[test]
    fn test_worker_creation_form_valid() {
        let data = worker_creation_form().clean().unwrap();

        assert_eq!("jdoe", data.username);
        assert_eq!("pale-ocean-42", data.password);
        assert_eq!(None, data.position_id);
    }

    #[test]
    fn test_worker_creation_form_password_mismatch() {
        let form = WorkerCreationForm {
            password2: Some("pale-ocean-43".to_string()),
            ..worker_creation_form()
        };

        let errors = form.clean().unwrap_err();

        assert_eq!(
            Some(&[PASSWORD_MISMATCH.to_string()][..]),
            errors.field("password2")
        );
    }

    #[test]
    fn test_worker_creation_form_weak_password() {
        let form = WorkerCreationForm {
            password1: Some("12345".to_string()),
            password2: Some("12345".to_string()),
            ..worker_creation_form()
        };

        let errors = form.clean().unwrap_err();

        assert_eq!(2, errors.field("password2").unwrap().len());
    }

    #[test]
    fn test_worker_creation_form_invalid_username_and_email() {
        let form = WorkerCreationForm {
            username: Some("jane doe!".to_string()),
            email: Some("not-an-email".to_string()),
            ..worker_creation_form()
        };

        let errors = form.clean().unwrap_err();

        assert!(errors.field("username").is_some());
        assert_eq!(
            Some(&["Enter a valid email address.".to_string()][..]),
            errors.field("email")
        );
    }

    #[test]
    fn test_worker_update_form() {
        let position = Uuid::now_v7();
        let form = WorkerUpdateForm {
            first_name: Some("Jane".to_string()),
            last_name: None,
            email: Some("".to_string()),
            position: Some(position.to_string()),
        };

        let data = form.clean().unwrap();

        assert_eq!("", data.last_name);
        assert_eq!("", data.email);
        assert_eq!(Some(position), data.position_id);
    }

    #[test]
    fn test_field_for_constraint() {
        assert_eq!("task_type", field_for_constraint("tasks_task_type_id_fkey"));
        assert_eq!(NON_FIELD_ERRORS, field_for_constraint("something_else"));
    }
}
