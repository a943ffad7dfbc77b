use super::{mutate, open, or_dash, pick, print_removed, remove};
use crate::output::{print_json, print_rows};
use clap::Subcommand;
use route_core::entities::client::{self, Client, ClientDraft, ClientPatch, ClientStatus};
use route_core::query::{derive, Filter, SortOrder, ViewQuery};
use std::path::Path;

#[derive(Subcommand)]
pub enum ClientSubcommand {
    /// Add a client
    Add {
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        company: String,
        /// Lead, Active, Churned or Partner (default Lead)
        #[arg(long)]
        status: Option<ClientStatus>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List clients
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        status: Option<ClientStatus>,
        /// name-asc, name-desc or recent
        #[arg(long)]
        sort: Option<SortOrder>,
    },
    /// Edit client fields
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Set a client's status
    Status { id: String, status: ClientStatus },
    /// Record contact with a client now
    Touch { id: String },
    /// Remove a client
    Remove { id: String },
}

pub fn run(root: &Path, subcmd: ClientSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = open(root)?;
    let store = &ws.store;
    match subcmd {
        ClientSubcommand::Add {
            name,
            email,
            company,
            status,
            notes,
        } => {
            let created = ClientDraft {
                name,
                company,
                email,
                status,
                notes,
            }
            .into_client()?;
            let record = created.clone();
            mutate::<Client, _>(store, |items| Ok(route_core::list::add(items, record)))?;
            show_one(&created, json, "Added")
        }
        ClientSubcommand::List {
            search,
            status,
            sort,
        } => {
            let view = ViewQuery {
                search,
                filter: status.map_or(Filter::All, Filter::Only),
                sort,
            };
            let clients = derive(&store.hydrate::<Client>()?.items, &view);
            list(&clients, json)
        }
        ClientSubcommand::Edit {
            id,
            name,
            email,
            company,
            notes,
        } => {
            let patch = ClientPatch {
                name,
                company,
                email,
                status: None,
                notes,
            };
            let items = mutate::<Client, _>(store, |items| client::edit_client(items, &id, patch))?;
            show_one(&pick(&items, &id)?, json, "Updated")
        }
        ClientSubcommand::Status { id, status } => {
            let items =
                mutate::<Client, _>(store, |items| client::set_status(items, &id, status))?;
            show_one(&pick(&items, &id)?, json, "Updated")
        }
        ClientSubcommand::Touch { id } => {
            let items = mutate::<Client, _>(store, |items| client::touch_client(items, &id))?;
            show_one(&pick(&items, &id)?, json, "Touched")
        }
        ClientSubcommand::Remove { id } => {
            remove::<Client>(store, &id)?;
            print_removed("client", &id, json)
        }
    }
}

fn show_one(c: &Client, json: bool, verb: &str) -> anyhow::Result<()> {
    if json {
        print_json(c)
    } else {
        println!("{verb} client [{}]: {} ({}) {}", c.id, c.name, c.status, c.email);
        Ok(())
    }
}

fn list(clients: &[Client], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&clients);
    }
    let rows = clients
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                c.name.clone(),
                c.company.clone(),
                c.status.to_string(),
                c.email.clone(),
                or_dash(c.last_contact.map(|t| t.format("%Y-%m-%d"))),
            ]
        })
        .collect();
    print_rows(
        &["ID", "NAME", "COMPANY", "STATUS", "EMAIL", "LAST CONTACT"],
        rows,
        "No clients.",
    );
    Ok(())
}
