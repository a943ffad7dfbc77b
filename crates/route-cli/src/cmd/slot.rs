use super::open;
use crate::output::{print_json, print_rows};
use anyhow::Context;
use clap::Subcommand;
use route_core::workspace::hydrate_slot;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum SlotSubcommand {
    /// List stored slot keys
    List,
    /// Print a slot's data, seeding feature slots that are absent
    Show { key: String },
    /// Delete a slot; feature slots are seeded again on next read
    Clear { key: String },
    /// Dump every slot as one JSON object
    Export {
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Load slots from a JSON object written by `export`
    Import { file: PathBuf },
}

pub fn run(root: &Path, subcmd: SlotSubcommand, json: bool) -> anyhow::Result<()> {
    let ws = open(root)?;
    let store = &ws.store;
    match subcmd {
        SlotSubcommand::List => {
            let keys = store.keys()?;
            if json {
                return print_json(&keys);
            }
            let rows = keys.into_iter().map(|k| vec![k]).collect();
            print_rows(&["KEY"], rows, "No slots stored.");
            Ok(())
        }
        SlotSubcommand::Show { key } => {
            let view = hydrate_slot(store, &key)?;
            if json {
                print_json(&view)
            } else {
                print_json(&view.data)
            }
        }
        SlotSubcommand::Clear { key } => {
            let cleared = store.clear(&key)?;
            if json {
                print_json(&serde_json::json!({ "key": key, "cleared": cleared }))
            } else {
                if cleared {
                    println!("Cleared {key}");
                } else {
                    println!("{key} was not stored");
                }
                Ok(())
            }
        }
        SlotSubcommand::Export { out } => {
            let dump = store.export()?;
            match out {
                Some(path) => {
                    let text = serde_json::to_string_pretty(&dump)?;
                    std::fs::write(&path, text)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Exported {} slots to {}", dump.len(), path.display());
                    Ok(())
                }
                None => print_json(&dump),
            }
        }
        SlotSubcommand::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let dump: BTreeMap<String, Value> = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a slot export", file.display()))?;
            let count = store.import(&dump)?;
            if json {
                print_json(&serde_json::json!({ "imported": count }))
            } else {
                println!("Imported {count} slots");
                Ok(())
            }
        }
    }
}
