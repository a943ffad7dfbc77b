use crate::entities::task::{self, Task, TaskDraft, TaskPatch, TaskStatus};
use crate::entity::{non_blank, required, string_enum, Entity};
use crate::error::{Result, RouteError};
use crate::list;
use crate::paths;
use crate::query::Listing;
use crate::store::Store;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Planning,
    Active,
    OnHold,
    Completed,
}

string_enum!(ProjectStatus, "project status", [
    Planning => "Planning",
    Active => "Active",
    OnHold => "OnHold",
    Completed => "Completed",
]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// 0..=100, derived from the project's tasks.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub task_count: usize,
    #[serde(default)]
    pub doc_count: usize,
    #[serde(default = "default_cover")]
    pub cover_color: String,
}

fn default_cover() -> String {
    "indigo".to_string()
}

impl Project {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status: ProjectStatus::Planning,
            due_date: None,
            progress: 0,
            task_count: 0,
            doc_count: 0,
            cover_color: default_cover(),
        }
    }

    /// Overwrite the derived counters from the project's own slots.
    pub fn apply_stats(&mut self, tasks: &[Task], doc_count: usize) {
        self.progress = progress_of(tasks);
        self.task_count = tasks.len();
        self.doc_count = doc_count;
    }
}

/// round(done / total * 100), 0 with no tasks.
pub fn progress_of(tasks: &[Task]) -> u8 {
    if tasks.is_empty() {
        return 0;
    }
    let done = tasks.iter().filter(|t| t.is_done()).count();
    ((done as f64 / tasks.len() as f64) * 100.0).round() as u8
}

impl Entity for Project {
    const KIND: &'static str = "project";
    const SLOT: &'static str = paths::PROJECTS_SLOT;

    fn id(&self) -> &str {
        &self.id
    }

    fn defaults() -> Vec<Self> {
        let mut mvp = Project::new("project-1", "MVP launch");
        mvp.description = "Get the first version in front of paying customers.".into();
        mvp.status = ProjectStatus::Active;
        let mut seed = Project::new("project-2", "Seed round");
        seed.description = "Raise a small round to extend runway.".into();
        seed.cover_color = "emerald".into();
        vec![mvp, seed]
    }
}

impl Listing for Project {
    type Facet = ProjectStatus;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn sort_label(&self) -> &str {
        &self.title
    }

    fn facet(&self) -> ProjectStatus {
        self.status
    }
}

// ---------------------------------------------------------------------------
// Form payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub cover_color: Option<String>,
}

impl ProjectDraft {
    pub fn into_project(self) -> Result<Project> {
        let mut project = Project::new(list::generate_id(), required("title", &self.title)?);
        project.description = self.description.trim().to_string();
        project.status = self.status.unwrap_or(ProjectStatus::Planning);
        project.due_date = self.due_date;
        if let Some(color) = non_blank(self.cover_color.as_deref()) {
            project.cover_color = color;
        }
        Ok(project)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub due_date: Option<NaiveDate>,
    pub cover_color: Option<String>,
}

impl ProjectPatch {
    pub fn apply(self, project: &mut Project) -> Result<()> {
        if let Some(title) = self.title {
            project.title = required("title", &title)?;
        }
        if let Some(description) = self.description {
            project.description = description.trim().to_string();
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if self.due_date.is_some() {
            project.due_date = self.due_date;
        }
        if let Some(color) = non_blank(self.cover_color.as_deref()) {
            project.cover_color = color;
        }
        Ok(())
    }
}

pub fn add_project(projects: &[Project], draft: ProjectDraft) -> Result<Vec<Project>> {
    Ok(list::add(projects, draft.into_project()?))
}

pub fn edit_project(projects: &[Project], id: &str, patch: ProjectPatch) -> Result<Vec<Project>> {
    list::try_update(projects, id, |p| patch.apply(p))
}

// ---------------------------------------------------------------------------
// Store passes
// ---------------------------------------------------------------------------

/// Number of records in the project's resource slot. Items are counted as
/// raw JSON so one malformed resource does not hide the rest.
fn doc_count(store: &Store, project_id: &str) -> Result<usize> {
    let docs: Vec<Value> = store.load(&paths::project_resources_slot(project_id))?;
    Ok(docs.len())
}

pub fn project_tasks(store: &Store, project_id: &str) -> Result<Vec<Task>> {
    store.load(&paths::project_tasks_slot(project_id))
}

/// Projects with progress, task and doc counts computed from their slots.
/// A project whose slots cannot be read keeps its stored counters.
pub fn load_projects(store: &Store) -> Result<Vec<Project>> {
    let mut projects = store.hydrate::<Project>()?.items;
    for project in &mut projects {
        let stats = project_tasks(store, &project.id)
            .and_then(|tasks| Ok((tasks, doc_count(store, &project.id)?)));
        match stats {
            Ok((tasks, docs)) => project.apply_stats(&tasks, docs),
            Err(e) => {
                tracing::warn!(project = %project.id, error = %e, "keeping stored project counters")
            }
        }
    }
    Ok(projects)
}

/// Recompute one project's counters and write the project list back.
pub fn recalculate(store: &Store, project_id: &str) -> Result<Project> {
    let tasks = project_tasks(store, project_id)?;
    let docs = doc_count(store, project_id)?;
    let projects = store.mutate::<Project, _>(paths::PROJECTS_SLOT, |projects| {
        list::try_update(projects, project_id, |p| {
            p.apply_stats(&tasks, docs);
            Ok(())
        })
    })?;
    let project = list::find(&projects, project_id)
        .cloned()
        .ok_or_else(|| RouteError::not_found(Project::KIND, project_id))?;
    tracing::debug!(
        project = project_id,
        progress = project.progress,
        tasks = project.task_count,
        "recalculated project"
    );
    Ok(project)
}

/// Remove the project and clear its namespaced slots.
pub fn delete_project(store: &Store, project_id: &str) -> Result<()> {
    store.mutate::<Project, _>(paths::PROJECTS_SLOT, |projects| {
        if list::find(projects, project_id).is_none() {
            return Err(RouteError::not_found(Project::KIND, project_id));
        }
        Ok(list::remove(projects, project_id))
    })?;
    // A key too long to be valid was never written.
    for key in paths::project_slots(project_id) {
        if paths::validate_slot_key(&key).is_ok() {
            store.clear(&key)?;
        }
    }
    Ok(())
}

fn require_project(store: &Store, project_id: &str) -> Result<()> {
    let projects: Vec<Project> = store.load(paths::PROJECTS_SLOT)?;
    match list::find(&projects, project_id) {
        Some(_) => Ok(()),
        None => Err(RouteError::not_found(Project::KIND, project_id)),
    }
}

/// Run `f` over the project's task list, save it, then recalculate.
pub fn mutate_tasks<F>(store: &Store, project_id: &str, f: F) -> Result<Vec<Task>>
where
    F: FnOnce(&[Task]) -> Result<Vec<Task>>,
{
    require_project(store, project_id)?;
    let tasks = store.mutate(&paths::project_tasks_slot(project_id), f)?;
    recalculate(store, project_id)?;
    Ok(tasks)
}

pub fn add_project_task(store: &Store, project_id: &str, draft: TaskDraft) -> Result<Vec<Task>> {
    mutate_tasks(store, project_id, |tasks| task::add_task(tasks, draft, Some(project_id)))
}

pub fn edit_project_task(
    store: &Store,
    project_id: &str,
    task_id: &str,
    patch: TaskPatch,
) -> Result<Vec<Task>> {
    mutate_tasks(store, project_id, |tasks| task::edit_task(tasks, task_id, patch))
}

pub fn set_project_task_status(
    store: &Store,
    project_id: &str,
    task_id: &str,
    status: TaskStatus,
) -> Result<Vec<Task>> {
    mutate_tasks(store, project_id, |tasks| task::set_status(tasks, task_id, status))
}

pub fn remove_project_task(store: &Store, project_id: &str, task_id: &str) -> Result<Vec<Task>> {
    mutate_tasks(store, project_id, |tasks| {
        if list::find(tasks, task_id).is_none() {
            return Err(RouteError::not_found(Task::KIND, task_id));
        }
        Ok(list::remove(tasks, task_id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::resource::{Resource, ResourceBody};

    fn task(id: &str, status: TaskStatus) -> Task {
        let mut t = Task::new(id, id);
        t.status = status;
        t
    }

    fn seeded() -> Store {
        let store = Store::in_memory();
        store.hydrate::<Project>().unwrap();
        store
    }

    #[test]
    fn progress_rounds() {
        assert_eq!(progress_of(&[]), 0);
        let three = [
            task("a", TaskStatus::Done),
            task("b", TaskStatus::Todo),
            task("c", TaskStatus::InProgress),
        ];
        assert_eq!(progress_of(&three), 33);
        let two = [task("a", TaskStatus::Done), task("b", TaskStatus::Done)];
        assert_eq!(progress_of(&two), 100);
        let mixed = [
            task("a", TaskStatus::Done),
            task("b", TaskStatus::Done),
            task("c", TaskStatus::Todo),
        ];
        assert_eq!(progress_of(&mixed), 67);
    }

    #[test]
    fn task_mutations_rewrite_the_project_record() {
        let store = seeded();
        let draft = |title: &str| TaskDraft {
            title: title.into(),
            ..Default::default()
        };
        add_project_task(&store, "project-1", draft("Design")).unwrap();
        let tasks = add_project_task(&store, "project-1", draft("Build")).unwrap();
        set_project_task_status(&store, "project-1", &tasks[0].id, TaskStatus::Done).unwrap();

        let stored: Vec<Project> = store.load(paths::PROJECTS_SLOT).unwrap();
        assert_eq!(stored[0].progress, 50);
        assert_eq!(stored[0].task_count, 2);
        assert_eq!(stored[1].task_count, 0);
    }

    #[test]
    fn stale_stored_fields_are_corrected_on_read() {
        let store = seeded();
        let mut projects: Vec<Project> = store.load(paths::PROJECTS_SLOT).unwrap();
        projects[1].progress = 90;
        projects[1].task_count = 7;
        store.save(paths::PROJECTS_SLOT, &projects).unwrap();
        let docs = vec![Resource::new("d", "Deck", ResourceBody::Note { content: String::new() })];
        store.save(&paths::project_resources_slot("project-2"), &docs).unwrap();

        let loaded = load_projects(&store).unwrap();
        assert_eq!(loaded[1].progress, 0);
        assert_eq!(loaded[1].task_count, 0);
        assert_eq!(loaded[1].doc_count, 1);
    }

    #[test]
    fn delete_clears_namespaced_slots() {
        let store = seeded();
        add_project_task(
            &store,
            "project-1",
            TaskDraft {
                title: "Go".into(),
                ..Default::default()
            },
        )
        .unwrap();
        delete_project(&store, "project-1").unwrap();
        assert!(!store.contains(&paths::project_tasks_slot("project-1")).unwrap());
        let left: Vec<Project> = store.load(paths::PROJECTS_SLOT).unwrap();
        assert_eq!(left.len(), 1);
        assert!(delete_project(&store, "project-1").is_err());
    }

    #[test]
    fn mixed_case_and_overlong_ids_do_not_break_the_list() {
        let store = Store::in_memory();
        let long_id = "x".repeat(120);
        let mut legacy = Project::new(long_id.clone(), "Imported");
        legacy.task_count = 4;
        store
            .save(paths::PROJECTS_SLOT, &[Project::new("Proj-1", "Launch"), legacy])
            .unwrap();

        let tasks = add_project_task(
            &store,
            "Proj-1",
            TaskDraft {
                title: "Ship".into(),
                ..Default::default()
            },
        )
        .unwrap();
        set_project_task_status(&store, "Proj-1", &tasks[0].id, TaskStatus::Done).unwrap();

        let loaded = load_projects(&store).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].progress, 100);
        assert_eq!(loaded[0].task_count, 1);
        assert_eq!(loaded[1].task_count, 4);

        delete_project(&store, &long_id).unwrap();
        assert_eq!(load_projects(&store).unwrap().len(), 1);
    }

    #[test]
    fn tasks_for_unknown_project_fail() {
        let store = seeded();
        let err = add_project_task(&store, "ghost", TaskDraft::default()).unwrap_err();
        assert!(matches!(err, RouteError::EntityNotFound { kind: "project", .. }));
    }
}
