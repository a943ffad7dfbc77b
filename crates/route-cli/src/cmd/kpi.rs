use super::{mutate, open, print_removed, remove};
use crate::output::{print_json, print_rows};
use clap::Subcommand;
use route_core::entities::kpi::{self, Kpi, KpiDraft};
use route_core::entity::NumberInput;
use std::path::Path;

#[derive(Subcommand)]
pub enum KpiSubcommand {
    /// Add a KPI; numbers that do not parse count as 0
    Add {
        name: String,
        #[arg(long, default_value = "0")]
        value: String,
        #[arg(long, default_value = "0")]
        target: String,
        #[arg(long, default_value = "")]
        unit: String,
        /// Change since last period, in percent
        #[arg(long, default_value = "0")]
        change: String,
    },
    /// List KPIs with progress to target
    List,
    /// Remove a KPI
    Remove { id: String },
}

pub fn run(root: &Path, subcmd: KpiSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = open(root)?;
    let store = &ws.store;
    match subcmd {
        KpiSubcommand::Add {
            name,
            value,
            target,
            unit,
            change,
        } => {
            let draft = KpiDraft {
                name,
                value: NumberInput::from(value.as_str()),
                target: NumberInput::from(target.as_str()),
                unit,
                change: NumberInput::from(change.as_str()),
            };
            let items = mutate::<Kpi, _>(store, |items| kpi::add_kpi(items, draft))?;
            let created = items.last().cloned();
            if json {
                print_json(&created)
            } else {
                if let Some(k) = created {
                    println!(
                        "Added KPI [{}]: {} {}/{} {}",
                        k.id, k.name, k.value, k.target, k.unit
                    );
                }
                Ok(())
            }
        }
        KpiSubcommand::List => {
            let items = store.hydrate::<Kpi>()?.items;
            if json {
                return print_json(&items);
            }
            let rows = items
                .iter()
                .map(|k| {
                    vec![
                        k.id.clone(),
                        k.name.clone(),
                        format!("{} {}", k.value, k.unit).trim().to_string(),
                        format!("{} {}", k.target, k.unit).trim().to_string(),
                        format!("{:.0}%", k.progress()),
                        format!("{:+}%", k.change),
                    ]
                })
                .collect();
            print_rows(&["ID", "KPI", "VALUE", "TARGET", "PROGRESS", "CHANGE"], rows, "No KPIs.");
            Ok(())
        }
        KpiSubcommand::Remove { id } => {
            remove::<Kpi>(store, &id)?;
            print_removed("KPI", &id, json)
        }
    }
}
