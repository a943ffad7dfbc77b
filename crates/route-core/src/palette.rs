//! Command palette: one flat, searchable list across features.

use crate::entities::{Client, Inspiration, Project, Resource, Task};
use crate::entity::Entity;
use crate::error::Result;
use crate::query::matches_search;
use crate::store::Store;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Items shown for a blank query.
pub const DEFAULT_LIMIT: usize = 10;

/// Category order is aggregation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PaletteCategory {
    Project,
    Client,
    Resource,
    Inspiration,
    Task,
}

impl PaletteCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            PaletteCategory::Project => "Project",
            PaletteCategory::Client => "Client",
            PaletteCategory::Resource => "Resource",
            PaletteCategory::Inspiration => "Inspiration",
            PaletteCategory::Task => "Task",
        }
    }
}

impl fmt::Display for PaletteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteItem {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub category: PaletteCategory,
}

impl PaletteItem {
    fn new(id: &str, title: &str, subtitle: impl Into<String>, category: PaletteCategory) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: subtitle.into(),
            category,
        }
    }
}

/// Flatten already-loaded lists in category order.
pub fn flatten(
    projects: &[Project],
    clients: &[Client],
    resources: &[Resource],
    inspirations: &[Inspiration],
    tasks: &[Task],
) -> Vec<PaletteItem> {
    let mut items = Vec::with_capacity(
        projects.len() + clients.len() + resources.len() + inspirations.len() + tasks.len(),
    );
    items.extend(
        projects
            .iter()
            .map(|p| PaletteItem::new(&p.id, &p.title, p.status.as_str(), PaletteCategory::Project)),
    );
    items.extend(
        clients
            .iter()
            .map(|c| PaletteItem::new(&c.id, &c.name, c.company.as_str(), PaletteCategory::Client)),
    );
    items.extend(
        resources
            .iter()
            .map(|r| PaletteItem::new(&r.id, &r.title, r.kind().as_str(), PaletteCategory::Resource)),
    );
    items.extend(inspirations.iter().map(|i| {
        PaletteItem::new(&i.id, &i.title, i.source.as_str(), PaletteCategory::Inspiration)
    }));
    items.extend(
        tasks
            .iter()
            .map(|t| PaletteItem::new(&t.id, &t.title, t.status.as_str(), PaletteCategory::Task)),
    );
    items
}

/// Read the five palette slots. Absent or unreadable slots contribute
/// nothing; nothing is seeded.
pub fn collect(store: &Store) -> Result<Vec<PaletteItem>> {
    Ok(flatten(
        &store.load::<Project>(Project::SLOT)?,
        &store.load::<Client>(Client::SLOT)?,
        &store.load::<Resource>(Resource::SLOT)?,
        &store.load::<Inspiration>(Inspiration::SLOT)?,
        &store.load::<Task>(Task::SLOT)?,
    ))
}

/// Blank query: the first [`DEFAULT_LIMIT`] items. Otherwise every item whose
/// title, subtitle or category contains the query, case-insensitively.
pub fn search(items: &[PaletteItem], query: &str) -> Vec<PaletteItem> {
    if query.trim().is_empty() {
        return items.iter().take(DEFAULT_LIMIT).cloned().collect();
    }
    items
        .iter()
        .filter(|i| {
            matches_search(
                [i.title.as_str(), i.subtitle.as_str(), i.category.as_str()],
                query,
            )
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::client::ClientStatus;
    use crate::paths;

    fn sample() -> Vec<PaletteItem> {
        let projects = vec![Project::new("p1", "Alpha launch")];
        let clients = vec![Client::new("c1", "Alice", "Acme", "a@acme.com", ClientStatus::Active)];
        let tasks = vec![Task::new("t1", "Write copy")];
        flatten(&projects, &clients, &[], &Inspiration::defaults(), &tasks)
    }

    #[test]
    fn aggregation_order() {
        let cats: Vec<_> = sample().iter().map(|i| i.category).collect();
        assert_eq!(
            cats,
            vec![
                PaletteCategory::Project,
                PaletteCategory::Client,
                PaletteCategory::Inspiration,
                PaletteCategory::Inspiration,
                PaletteCategory::Task,
            ]
        );
    }

    #[test]
    fn search_matches_title_subtitle_and_category() {
        let items = sample();
        let hits = search(&items, "ac");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "c1");

        let by_subtitle = search(&items, "planning");
        assert_eq!(by_subtitle[0].id, "p1");

        let by_category = search(&items, "TASK");
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].id, "t1");
    }

    #[test]
    fn blank_query_caps_at_ten() {
        let tasks: Vec<Task> = (0..15).map(|n| Task::new(format!("t{n}"), "x")).collect();
        let items = flatten(&[], &[], &[], &[], &tasks);
        assert_eq!(search(&items, "   ").len(), DEFAULT_LIMIT);
        assert_eq!(search(&items, "")[0].id, "t0");
    }

    #[test]
    fn collect_skips_unreadable_slots() {
        let store = Store::in_memory();
        store.hydrate::<Project>().unwrap();
        store
            .save_raw(paths::CLIENTS_SLOT, serde_json::json!({"not": "a list"}))
            .unwrap();
        let items = collect(&store).unwrap();
        assert_eq!(items.len(), Project::defaults().len());
        assert!(!store.contains(paths::TASKS_SLOT).unwrap());
    }
}
