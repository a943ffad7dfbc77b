use crate::entity::{non_blank, required, string_enum, Entity};
use crate::error::Result;
use crate::list;
use crate::paths;
use crate::query::Listing;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

string_enum!(TaskStatus, "task status", [
    Todo => "Todo",
    InProgress => "InProgress",
    Done => "Done",
]);

impl TaskStatus {
    /// Todo → InProgress → Done → Todo.
    pub fn next(self) -> Self {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Todo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

string_enum!(Priority, "priority", [
    Low => "Low",
    Medium => "Medium",
    High => "High",
]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            due_date: None,
            project_id: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

impl Entity for Task {
    const KIND: &'static str = "task";
    const SLOT: &'static str = paths::TASKS_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn defaults() -> Vec<Self> {
        let mut ship = Task::new("task-1", "Ship landing page");
        ship.priority = Priority::High;
        ship.status = TaskStatus::InProgress;
        let mut calls = Task::new("task-2", "Book five customer calls");
        calls.priority = Priority::Medium;
        let mut books = Task::new("task-3", "Set up bookkeeping");
        books.priority = Priority::Low;
        vec![ship, calls, books]
    }
}

impl Listing for Task {
    type Facet = TaskStatus;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str()]
    }

    fn sort_label(&self) -> &str {
        &self.title
    }

    fn facet(&self) -> TaskStatus {
        self.status
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Build a task, tagging it with `project_id` when it belongs to a project.
    pub fn into_task(self, project_id: Option<&str>) -> Result<Task> {
        let mut task = Task::new(list::generate_id(), required("title", &self.title)?);
        task.status = self.status.unwrap_or(TaskStatus::Todo);
        task.priority = self.priority.unwrap_or(Priority::Medium);
        task.due_date = self.due_date;
        task.project_id = non_blank(project_id);
        Ok(task)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn apply(self, task: &mut Task) -> Result<()> {
        if let Some(title) = self.title {
            task.title = required("title", &title)?;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if self.due_date.is_some() {
            task.due_date = self.due_date;
        }
        Ok(())
    }
}

pub fn add_task(tasks: &[Task], draft: TaskDraft, project_id: Option<&str>) -> Result<Vec<Task>> {
    Ok(list::add(tasks, draft.into_task(project_id)?))
}

pub fn edit_task(tasks: &[Task], id: &str, patch: TaskPatch) -> Result<Vec<Task>> {
    list::try_update(tasks, id, |t| patch.apply(t))
}

pub fn set_status(tasks: &[Task], id: &str, status: TaskStatus) -> Result<Vec<Task>> {
    list::try_update(tasks, id, |t| {
        t.status = status;
        Ok(())
    })
}

pub fn cycle_status(tasks: &[Task], id: &str) -> Result<Vec<Task>> {
    list::try_update(tasks, id, |t| {
        t.status = t.status.next();
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_wraps_around() {
        let tasks = vec![Task::new("t", "Write")];
        let a = cycle_status(&tasks, "t").unwrap();
        let b = cycle_status(&a, "t").unwrap();
        let c = cycle_status(&b, "t").unwrap();
        assert_eq!(a[0].status, TaskStatus::InProgress);
        assert_eq!(b[0].status, TaskStatus::Done);
        assert_eq!(c[0].status, TaskStatus::Todo);
    }

    #[test]
    fn draft_defaults_and_project_tag() {
        let t = TaskDraft {
            title: " Call bank ".into(),
            ..Default::default()
        }
        .into_task(Some("p1"))
        .unwrap();
        assert_eq!(t.title, "Call bank");
        assert_eq!(t.status, TaskStatus::Todo);
        assert_eq!(t.priority, Priority::Medium);
        assert_eq!(t.project_id.as_deref(), Some("p1"));
        assert!(TaskDraft::default().into_task(None).is_err());
    }

    #[test]
    fn status_parses_kebab_and_spaced() {
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("In Progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("DONE".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
    }

    #[test]
    fn serialized_shape() {
        let mut t = Task::new("t", "Plan");
        t.due_date = NaiveDate::from_ymd_opt(2024, 9, 30);
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["dueDate"], "2024-09-30");
        assert_eq!(v["status"], "Todo");
        assert!(v.get("projectId").is_none());
    }
}
