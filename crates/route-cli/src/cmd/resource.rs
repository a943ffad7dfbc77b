use super::{mutate, open, or_dash, pick, print_removed, remove};
use crate::output::{print_json, print_rows};
use clap::Subcommand;
use route_core::entities::resource::{self, Resource, ResourceDraft, ResourceType};
use route_core::query::{derive, Filter, SortOrder, ViewQuery};
use std::path::Path;

#[derive(Subcommand)]
pub enum ResourceSubcommand {
    /// Add a note, link or document
    Add {
        title: String,
        /// Note, Link or Document
        #[arg(long = "type", value_name = "TYPE", default_value = "Note")]
        kind: ResourceType,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        url: Option<String>,
        /// Repeat for several tags
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        project: Option<String>,
    },
    /// List resources, pinned first
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<ResourceType>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        sort: Option<SortOrder>,
    },
    /// Pin or unpin a resource
    Pin { id: String },
    /// Remove a resource
    Remove { id: String },
}

pub fn run(root: &Path, subcmd: ResourceSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = open(root)?;
    let store = &ws.store;
    match subcmd {
        ResourceSubcommand::Add {
            title,
            kind,
            content,
            url,
            tags,
            project,
        } => {
            let created = ResourceDraft {
                title,
                kind,
                content,
                url,
                tags,
                project,
            }
            .into_resource()?;
            let record = created.clone();
            mutate::<Resource, _>(store, |items| Ok(route_core::list::add(items, record)))?;
            if json {
                print_json(&created)
            } else {
                println!("Added {} [{}]: {}", created.kind(), created.id, created.title);
                Ok(())
            }
        }
        ResourceSubcommand::List {
            search,
            kind,
            tag,
            project,
            sort,
        } => {
            let view = ViewQuery {
                search,
                filter: kind.map_or(Filter::All, Filter::Only),
                sort,
            };
            let all = store.hydrate::<Resource>()?.items;
            let shown = resource::pinned_first(resource::narrow(
                derive(&all, &view),
                tag.as_deref(),
                project.as_deref(),
            ));
            if json {
                return print_json(&shown);
            }
            let rows = shown
                .iter()
                .map(|r| {
                    vec![
                        r.id.clone(),
                        if r.is_pinned { "*" } else { "" }.to_string(),
                        r.kind().to_string(),
                        r.title.clone(),
                        r.tags.join(","),
                        or_dash(r.project.as_deref()),
                    ]
                })
                .collect();
            print_rows(&["ID", "PIN", "TYPE", "TITLE", "TAGS", "PROJECT"], rows, "No resources.");
            Ok(())
        }
        ResourceSubcommand::Pin { id } => {
            let items = mutate::<Resource, _>(store, |items| resource::toggle_pin(items, &id))?;
            let r = pick(&items, &id)?;
            if json {
                print_json(&r)
            } else {
                let state = if r.is_pinned { "Pinned" } else { "Unpinned" };
                println!("{state} [{}]: {}", r.id, r.title);
                Ok(())
            }
        }
        ResourceSubcommand::Remove { id } => {
            remove::<Resource>(store, &id)?;
            print_removed("resource", &id, json)
        }
    }
}
