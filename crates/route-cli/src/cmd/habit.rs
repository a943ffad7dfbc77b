use super::{mutate, open, pick, print_removed, remove};
use crate::output::{print_json, print_rows};
use chrono::NaiveDate;
use clap::Subcommand;
use route_core::entities::habit::{self, Habit, HabitDraft};
use std::path::Path;

#[derive(Subcommand)]
pub enum HabitSubcommand {
    /// Add a habit
    Add {
        #[arg(required = true)]
        title: Vec<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// List habits with today's completion
    List,
    /// Mark a day done, or undo it if already done
    Toggle {
        id: String,
        /// YYYY-MM-DD (default: today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Remove a habit
    Remove { id: String },
}

pub fn run(root: &Path, subcmd: HabitSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = open(root)?;
    let store = &ws.store;
    let today = chrono::Utc::now().date_naive();
    match subcmd {
        HabitSubcommand::Add { title, color } => {
            let created = HabitDraft {
                title: title.join(" "),
                color,
            }
            .into_habit()?;
            let record = created.clone();
            mutate::<Habit, _>(store, |items| Ok(route_core::list::add(items, record)))?;
            if json {
                print_json(&created)
            } else {
                println!("Added habit [{}]: {}", created.id, created.title);
                Ok(())
            }
        }
        HabitSubcommand::List => {
            let habits = store.hydrate::<Habit>()?.items;
            if json {
                return print_json(&habits);
            }
            let (done, total) = habit::completion_on(&habits, today);
            let rows = habits
                .iter()
                .map(|h| {
                    vec![
                        h.id.clone(),
                        h.title.clone(),
                        if h.is_done_on(today) { "x" } else { " " }.to_string(),
                        h.streak.to_string(),
                        h.best_streak.to_string(),
                    ]
                })
                .collect();
            print_rows(&["ID", "HABIT", "TODAY", "STREAK", "BEST"], rows, "No habits.");
            println!("\n{done}/{total} done today");
            Ok(())
        }
        HabitSubcommand::Toggle { id, date } => {
            let day = date.unwrap_or(today);
            let items = mutate::<Habit, _>(store, |items| habit::toggle_habit(items, &id, day))?;
            let h = pick(&items, &id)?;
            if json {
                print_json(&h)
            } else {
                let state = if h.is_done_on(day) { "done" } else { "not done" };
                println!("{} on {day}: {state} (streak {})", h.title, h.streak);
                Ok(())
            }
        }
        HabitSubcommand::Remove { id } => {
            remove::<Habit>(store, &id)?;
            print_removed("habit", &id, json)
        }
    }
}
