use super::{mutate, open, or_dash, pick, print_removed, remove};
use crate::output::{print_json, print_rows};
use chrono::NaiveDate;
use clap::Subcommand;
use route_core::entities::milestone::{self, Milestone, MilestoneDraft, MilestoneStatus};
use route_core::list;
use std::path::Path;

#[derive(Subcommand)]
pub enum RoadmapSubcommand {
    /// Add a milestone
    Add {
        title: String,
        /// e.g. Q3
        #[arg(long, default_value = "")]
        quarter: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// List milestones grouped by quarter
    List,
    /// Move a milestone to a 1-based position
    Move { id: String, position: usize },
    /// Set a milestone's status (Planned, InProgress, Done)
    Status {
        id: String,
        status: MilestoneStatus,
    },
    /// Remove a milestone
    Remove { id: String },
}

pub fn run(root: &Path, subcmd: RoadmapSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = open(root)?;
    let store = &ws.store;
    match subcmd {
        RoadmapSubcommand::Add {
            title,
            quarter,
            description,
            due,
        } => {
            let created = MilestoneDraft {
                title,
                description,
                quarter,
                status: None,
                due_date: due,
            }
            .into_milestone()?;
            let record = created.clone();
            mutate::<Milestone, _>(store, |items| Ok(list::add(items, record)))?;
            if json {
                print_json(&created)
            } else {
                println!("Added milestone [{}]: {}", created.id, created.title);
                Ok(())
            }
        }
        RoadmapSubcommand::List => {
            let items = store.hydrate::<Milestone>()?.items;
            if json {
                print_json(&items)
            } else {
                print_roadmap(&items);
                Ok(())
            }
        }
        RoadmapSubcommand::Move { id, position } => {
            let to = position.saturating_sub(1);
            let items = mutate::<Milestone, _>(store, |items| list::move_item(items, &id, to))?;
            if json {
                print_json(&items)
            } else {
                print_roadmap(&items);
                Ok(())
            }
        }
        RoadmapSubcommand::Status { id, status } => {
            let items =
                mutate::<Milestone, _>(store, |items| milestone::set_status(items, &id, status))?;
            let m = pick(&items, &id)?;
            if json {
                print_json(&m)
            } else {
                println!("Milestone [{}] is now {}", m.id, m.status);
                Ok(())
            }
        }
        RoadmapSubcommand::Remove { id } => {
            remove::<Milestone>(store, &id)?;
            print_removed("milestone", &id, json)
        }
    }
}

fn print_roadmap(items: &[Milestone]) {
    let mut position = 0;
    let rows = milestone::by_quarter(items)
        .into_iter()
        .flat_map(|(quarter, group)| {
            group.into_iter().map(move |m| (quarter.clone(), m))
        })
        .map(|(quarter, m)| {
            position += 1;
            vec![
                position.to_string(),
                or_dash(Some(quarter).filter(|q| !q.is_empty())),
                m.id.clone(),
                m.status.to_string(),
                m.title.clone(),
                or_dash(m.due_date),
            ]
        })
        .collect();
    print_rows(&["#", "QUARTER", "ID", "STATUS", "TITLE", "DUE"], rows, "No milestones.");
}
