use super::{mutate, open, or_dash};
use crate::output::{print_json, print_rows};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Subcommand;
use route_core::entities::project::{self, Project, ProjectDraft, ProjectStatus};
use route_core::query::{derive, Filter, SortOrder, ViewQuery};
use std::path::Path;

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// Add a project
    Add {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Planning, Active, OnHold or Completed (default Planning)
        #[arg(long)]
        status: Option<ProjectStatus>,
        /// YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// List projects with progress
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        status: Option<ProjectStatus>,
        #[arg(long)]
        sort: Option<SortOrder>,
    },
    /// Show a project and its tasks
    Show { id: String },
    /// Remove a project and its tasks, resources and reflections
    Remove { id: String },
}

pub fn run(root: &Path, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = open(root)?;
    let store = &ws.store;
    match subcmd {
        ProjectSubcommand::Add {
            title,
            description,
            status,
            due,
        } => {
            let created = ProjectDraft {
                title,
                description,
                status,
                due_date: due,
                cover_color: None,
            }
            .into_project()?;
            let record = created.clone();
            mutate::<Project, _>(store, |items| Ok(route_core::list::add(items, record)))?;
            if json {
                print_json(&created)
            } else {
                println!("Added project [{}]: {}", created.id, created.title);
                Ok(())
            }
        }
        ProjectSubcommand::List {
            search,
            status,
            sort,
        } => {
            let view = ViewQuery {
                search,
                filter: status.map_or(Filter::All, Filter::Only),
                sort,
            };
            let projects = derive(&project::load_projects(store)?, &view);
            if json {
                return print_json(&projects);
            }
            let rows = projects
                .iter()
                .map(|p| {
                    vec![
                        p.id.clone(),
                        p.title.clone(),
                        p.status.to_string(),
                        format!("{}%", p.progress),
                        p.task_count.to_string(),
                        p.doc_count.to_string(),
                        or_dash(p.due_date),
                    ]
                })
                .collect();
            print_rows(
                &["ID", "TITLE", "STATUS", "PROGRESS", "TASKS", "DOCS", "DUE"],
                rows,
                "No projects.",
            );
            Ok(())
        }
        ProjectSubcommand::Show { id } => {
            let found = project::load_projects(store)?
                .into_iter()
                .find(|p| p.id == id)
                .with_context(|| format!("project '{id}' not found"))?;
            let tasks = project::project_tasks(store, &id)?;
            if json {
                return print_json(&serde_json::json!({ "project": found, "tasks": tasks }));
            }
            println!("{} [{}]", found.title, found.id);
            println!("Status:   {}", found.status);
            println!(
                "Progress: {}% ({} tasks, {} docs)",
                found.progress, found.task_count, found.doc_count
            );
            if !found.description.is_empty() {
                println!("\n{}", found.description);
            }
            println!();
            super::task::print_tasks(&tasks);
            Ok(())
        }
        ProjectSubcommand::Remove { id } => {
            store.hydrate::<Project>()?;
            project::delete_project(store, &id)?;
            super::print_removed("project", &id, json)
        }
    }
}
