use super::{mutate, open, or_dash, pick, print_removed, remove};
use crate::output::{print_json, print_rows};
use chrono::NaiveDate;
use clap::Subcommand;
use route_core::entities::project as projects;
use route_core::entities::task::{self, Priority, Task, TaskDraft, TaskStatus};
use route_core::entities::Project;
use route_core::Store;
use std::path::Path;

#[derive(Subcommand)]
pub enum TaskSubcommand {
    /// Add a task
    Add {
        #[arg(required = true)]
        title: Vec<String>,
        /// Add to this project instead of the global list
        #[arg(long)]
        project: Option<String>,
        /// Low, Medium or High (default Medium)
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// List tasks
    List {
        #[arg(long)]
        project: Option<String>,
    },
    /// Set a task's status, or advance it (Todo, InProgress, Done, Todo) when omitted
    Status {
        id: String,
        status: Option<TaskStatus>,
        #[arg(long)]
        project: Option<String>,
    },
    /// Remove a task
    Remove {
        id: String,
        #[arg(long)]
        project: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: TaskSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = open(root)?;
    let store = &ws.store;
    match subcmd {
        TaskSubcommand::Add {
            title,
            project,
            priority,
            due,
        } => {
            let draft = TaskDraft {
                title: title.join(" "),
                status: None,
                priority,
                due_date: due,
            };
            let tasks = match project.as_deref() {
                Some(pid) => {
                    store.hydrate::<Project>()?;
                    projects::add_project_task(store, pid, draft)?
                }
                None => mutate::<Task, _>(store, |items| task::add_task(items, draft, None))?,
            };
            let created = tasks.last().cloned();
            if json {
                print_json(&created)
            } else {
                if let Some(t) = created {
                    println!("Added task [{}]: {}", t.id, t.title);
                }
                Ok(())
            }
        }
        TaskSubcommand::List { project } => {
            let tasks = match project.as_deref() {
                Some(pid) => projects::project_tasks(store, pid)?,
                None => store.hydrate::<Task>()?.items,
            };
            if json {
                print_json(&tasks)
            } else {
                print_tasks(&tasks);
                Ok(())
            }
        }
        TaskSubcommand::Status {
            id,
            status,
            project,
        } => {
            let tasks = set_status(store, project.as_deref(), &id, status)?;
            let t = pick(&tasks, &id)?;
            if json {
                print_json(&t)
            } else {
                println!("Task [{}] is now {}", t.id, t.status);
                Ok(())
            }
        }
        TaskSubcommand::Remove { id, project } => {
            match project.as_deref() {
                Some(pid) => {
                    store.hydrate::<Project>()?;
                    projects::remove_project_task(store, pid, &id)?;
                }
                None => remove::<Task>(store, &id)?,
            }
            print_removed("task", &id, json)
        }
    }
}

fn set_status(
    store: &Store,
    project_id: Option<&str>,
    id: &str,
    status: Option<TaskStatus>,
) -> route_core::Result<Vec<Task>> {
    let apply = |items: &[Task]| match status {
        Some(s) => task::set_status(items, id, s),
        None => task::cycle_status(items, id),
    };
    match project_id {
        Some(pid) => {
            store.hydrate::<Project>()?;
            projects::mutate_tasks(store, pid, apply)
        }
        None => mutate::<Task, _>(store, apply),
    }
}

pub fn print_tasks(tasks: &[Task]) {
    let rows = tasks
        .iter()
        .map(|t| {
            vec![
                t.id.clone(),
                t.status.to_string(),
                t.priority.to_string(),
                t.title.clone(),
                or_dash(t.due_date),
            ]
        })
        .collect();
    print_rows(&["ID", "STATUS", "PRIORITY", "TITLE", "DUE"], rows, "No tasks.");
}
